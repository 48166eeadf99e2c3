/// Configuration for the incremental [`Parser`](crate::Parser).
///
/// The parser passes the container options on to every array and object it
/// creates, so a parsed tree grows the same way a hand-built one would.
///
/// # Examples
///
/// ```rust
/// use jsonstack::{DuplicateKeys, MapOptions, NumberPrecision, Parser, ParserOptions};
///
/// let options = ParserOptions {
///     map: MapOptions {
///         duplicate_keys: DuplicateKeys::MoveToEnd,
///         ..Default::default()
///     },
///     number_precision: NumberPrecision::Accumulate,
///     ..Default::default()
/// };
/// let parser = Parser::new(options);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParserOptions {
    /// Growth settings for arrays built by the parser.
    pub sequence: SequenceOptions,

    /// Table settings for objects built by the parser.
    pub map: MapOptions,

    /// How number tokens are converted to `f64`.
    ///
    /// # Default
    ///
    /// [`NumberPrecision::Exact`]
    pub number_precision: NumberPrecision,
}

/// Growth settings for a [`Sequence`](crate::Sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceOptions {
    /// Capacity reserved on the first push into an empty sequence. Later
    /// growth doubles the capacity.
    ///
    /// # Default
    ///
    /// `16`
    pub initial_capacity: usize,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
        }
    }
}

/// Table settings for an [`OrderedMap`](crate::OrderedMap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapOptions {
    /// Number of bucket slots allocated on the first insertion.
    ///
    /// # Default
    ///
    /// `16`
    pub initial_capacity: usize,

    /// The table doubles once `len >= capacity * load_factor`. Values outside
    /// `(0, 1)` are clamped when the map is created.
    ///
    /// # Default
    ///
    /// `0.5`
    pub load_factor: f32,

    /// What happens to the insertion order when an existing key is set again.
    ///
    /// # Default
    ///
    /// [`DuplicateKeys::KeepPosition`]
    pub duplicate_keys: DuplicateKeys,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            load_factor: 0.5,
            duplicate_keys: DuplicateKeys::KeepPosition,
        }
    }
}

/// Order policy for re-setting a key that is already present.
///
/// In both cases the old value is dropped and replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeys {
    /// The key keeps the position of its first insertion.
    #[default]
    KeepPosition,
    /// The key moves to the end of the insertion order.
    MoveToEnd,
}

/// Number conversion strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberPrecision {
    /// Keep the validated number text and convert it with a correctly rounded
    /// decimal conversion. Serialized numbers parse back to the same `f64`.
    #[default]
    Exact,
    /// Fold digits into an `f64` as they arrive: the integer part as
    /// `value * 10 + digit`, up to 16 fractional digits through a table of
    /// negative powers of ten, then the exponent and sign. No text is
    /// retained, but the last bits of precision may differ from `Exact`.
    Accumulate,
}
