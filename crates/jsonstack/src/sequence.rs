//! Growable owning array backing JSON arrays.
use alloc::{
    alloc::{Layout, handle_alloc_error},
    vec::{self, Vec},
};
use core::{fmt, mem, slice};

use crate::{
    SequenceOptions, Value,
    error::AllocError,
    value::{NONE, drop_nested},
};

/// An owning, growable array of [`Value`]s.
///
/// Capacity is managed explicitly: the first push reserves the configured
/// seed capacity, every later growth doubles it. All growth is fallible and
/// reports [`AllocError`] instead of aborting.
///
/// ```
/// use jsonstack::{Sequence, Value};
///
/// let mut seq = Sequence::new();
/// seq.push(Value::from(1)).unwrap();
/// assert_eq!(seq.len(), 1);
/// assert_eq!(seq.capacity(), 16);
/// assert!(seq.get(1).is_none());
/// ```
#[derive(Clone, Default)]
pub struct Sequence {
    items: Vec<Value>,
    options: SequenceOptions,
}

impl Sequence {
    /// An empty sequence with zero capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SequenceOptions::default())
    }

    #[must_use]
    pub fn with_options(options: SequenceOptions) -> Self {
        Self {
            items: Vec::new(),
            options: SequenceOptions {
                initial_capacity: options.initial_capacity.max(1),
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Ensures room for at least `n` elements in total.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the allocation fails; the sequence is left
    /// unchanged.
    pub fn reserve(&mut self, n: usize) -> Result<(), AllocError> {
        if n <= self.items.capacity() {
            return Ok(());
        }
        self.items.try_reserve_exact(n - self.items.len())?;
        Ok(())
    }

    /// Appends a value, growing first when full. [`Value::None`] is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if growth fails; `value` is dropped and the
    /// sequence keeps its previous contents.
    pub fn push(&mut self, value: Value) -> Result<(), AllocError> {
        if value.is_none() {
            return Ok(());
        }
        if self.items.len() == self.items.capacity() {
            let target = match self.items.capacity() {
                0 => self.options.initial_capacity,
                cap => cap.checked_mul(2).ok_or(AllocError)?,
            };
            log::trace!("sequence growth {} -> {target}", self.items.capacity());
            self.reserve(target)?;
        }
        self.items.push(value);
        Ok(())
    }

    /// Shrinks to `n` elements, dropping the excess, or reserves room for
    /// `n` when `n >= len`.
    ///
    /// # Errors
    ///
    /// Only the growing case can fail, see [`Sequence::reserve`].
    pub fn truncate(&mut self, n: usize) -> Result<(), AllocError> {
        if n < self.items.len() {
            self.items.truncate(n);
            Ok(())
        } else {
            self.reserve(n)
        }
    }

    /// The element at `index`, or [`Value::None`] past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> &Value {
        self.items.get(index).unwrap_or(&NONE)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }

    /// Moves every element out, leaving the sequence empty.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<Value>) {
        out.append(&mut self.items);
    }
}

impl Drop for Sequence {
    fn drop(&mut self) {
        if self.items.iter().any(Value::is_container) {
            drop_nested(mem::take(&mut self.items));
        }
    }
}

/// Collects through [`Sequence::push`], skipping [`Value::None`].
///
/// Allocation failure aborts, as with the standard collections; call
/// [`Sequence::push`] directly to handle it.
///
/// ```
/// use jsonstack::{Sequence, Value};
///
/// let seq: Sequence = [Value::from(1), Value::None, Value::from("a")].into_iter().collect();
/// assert_eq!(Value::Array(seq).to_string(), r#"[1,"a"]"#);
/// ```
impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut seq = Sequence::new();
        seq.extend(iter);
        seq
    }
}

impl Extend<Value> for Sequence {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        for value in iter {
            if self.push(value).is_err() {
                handle_alloc_error(Layout::new::<Value>());
            }
        }
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = vec::IntoIter<Value>;

    fn into_iter(mut self) -> Self::IntoIter {
        mem::take(&mut self.items).into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
