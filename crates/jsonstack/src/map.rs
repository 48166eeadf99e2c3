//! Insertion-ordered hash map backing JSON objects.
//!
//! The table uses open addressing with linear probing over a slot vector.
//! A parallel `order` vector lists occupied slot indices in first-insertion
//! order, and every occupied slot records its own position in `order`, so
//! both can be rewritten in place when entries move (growth, removal).
use alloc::{
    alloc::{Layout, handle_alloc_error},
    vec::Vec,
};
use core::{fmt, iter::FusedIterator, slice};

use bstr::{BStr, BString, ByteSlice};

use crate::{
    DuplicateKeys, MapOptions, Value,
    error::AllocError,
    value::{NONE, drop_nested},
};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the raw key bytes. Insert, lookup and rehash all use this.
#[must_use]
pub fn hash_key(key: &[u8]) -> u64 {
    key.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[expect(clippy::cast_possible_truncation)]
fn home_slot(key: &[u8], capacity: usize) -> usize {
    (hash_key(key) % capacity as u64) as usize
}

/// Linear probe over at most one full cycle of `buckets`.
fn probe_slots(buckets: &[Option<Bucket>], key: &[u8]) -> Option<Result<usize, usize>> {
    let capacity = buckets.len();
    if capacity == 0 {
        return None;
    }
    let home = home_slot(key, capacity);
    for step in 0..capacity {
        let index = (home + step) % capacity;
        match &buckets[index] {
            None => return Some(Err(index)),
            // Exact-length comparison; a stored key that merely starts with
            // `key` is a different key.
            Some(bucket) if bucket.key.as_slice() == key => return Some(Ok(index)),
            Some(_) => {}
        }
    }
    None
}

#[derive(Clone)]
struct Bucket {
    key: BString,
    value: Value,
    /// Index of this slot inside `order`.
    order_pos: usize,
}

/// An insertion-ordered map from byte-string keys to [`Value`]s.
///
/// Iteration yields entries in the order their keys were first inserted,
/// including after the table grows. Setting an existing key replaces its value
/// in place; whether the key keeps its position or moves to the end is chosen
/// by [`MapOptions::duplicate_keys`].
///
/// ```
/// use jsonstack::{OrderedMap, Value};
///
/// let mut map = OrderedMap::new();
/// map.set("b", Value::from(1)).unwrap();
/// map.set("a", Value::from(2)).unwrap();
/// map.set("b", Value::from(3)).unwrap();
///
/// let keys: Vec<_> = map.keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys, ["b", "a"]);
/// assert_eq!(map.get("b"), &Value::from(3));
/// assert!(map.get("c").is_none());
/// ```
#[derive(Clone)]
pub struct OrderedMap {
    buckets: Vec<Option<Bucket>>,
    order: Vec<usize>,
    options: MapOptions,
}

impl Default for OrderedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedMap {
    /// An empty map with zero capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(MapOptions::default())
    }

    #[must_use]
    pub fn with_options(options: MapOptions) -> Self {
        let load_factor = if options.load_factor > 0.0 && options.load_factor < 1.0 {
            options.load_factor
        } else {
            MapOptions::default().load_factor
        };
        Self {
            buckets: Vec::new(),
            order: Vec::new(),
            options: MapOptions {
                initial_capacity: options.initial_capacity.max(1),
                load_factor,
                duplicate_keys: options.duplicate_keys,
            },
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of bucket slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn load_factor(&self) -> f32 {
        self.options.load_factor
    }

    /// Whether one more entry would break the load factor or fill the last
    /// vacant slot. Probing relies on a vacant slot always being present.
    fn needs_growth(&self) -> bool {
        let capacity = self.buckets.len();
        let next = self.order.len() + 1;
        #[expect(clippy::cast_precision_loss)]
        let over_load = next as f64 > capacity as f64 * f64::from(self.options.load_factor);
        next >= capacity || over_load
    }

    /// `Ok` with the slot holding `key`, `Err` with the vacant slot where it
    /// would go. `None` for a table without slots, or once a full cycle has
    /// been probed.
    fn probe(&self, key: &[u8]) -> Option<Result<usize, usize>> {
        probe_slots(&self.buckets, key)
    }

    fn find(&self, key: &[u8]) -> Option<usize> {
        self.probe(key)?.ok()
    }

    /// Grows the table to `n` slots, replaying entries in insertion order.
    ///
    /// A no-op when `n` does not exceed the current capacity.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the new table cannot be allocated; the map
    /// is left unchanged.
    pub fn reserve(&mut self, n: usize) -> Result<(), AllocError> {
        if n <= self.buckets.len() {
            return Ok(());
        }
        let mut buckets: Vec<Option<Bucket>> = Vec::new();
        buckets.try_reserve_exact(n)?;
        buckets.resize_with(n, || None);
        log::trace!("ordered map rehash {} -> {n} slots", self.buckets.len());

        // `n` exceeds the old capacity, which exceeds `len`, so every entry
        // finds a vacant slot.
        let mut old = core::mem::replace(&mut self.buckets, buckets);
        for pos in 0..self.order.len() {
            let Some(bucket) = old[self.order[pos]].take() else {
                continue;
            };
            if let Some(Ok(slot) | Err(slot)) = self.probe(&bucket.key) {
                self.order[pos] = slot;
                self.buckets[slot] = Some(bucket);
            }
        }
        Ok(())
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        while self.needs_growth() {
            let target = match self.buckets.len() {
                0 => self.options.initial_capacity,
                cap => cap.checked_mul(2).ok_or(AllocError)?,
            };
            self.reserve(target)?;
        }
        Ok(())
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// Setting [`Value::None`] is ignored: the sentinel is never stored.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if growth or copying the key fails. The map is
    /// then unchanged and `value` is dropped.
    pub fn set<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K, value: Value) -> Result<(), AllocError> {
        if value.is_none() {
            return Ok(());
        }
        let key = key.as_ref();
        if let Some(slot) = self.find(key) {
            self.replace_at(slot, value);
            return Ok(());
        }
        self.insert_new(key, value)
    }

    /// Like [`OrderedMap::set`], but takes an owned key and reuses its buffer.
    ///
    /// # Errors
    ///
    /// See [`OrderedMap::set`].
    pub fn set_owned(&mut self, key: BString, value: Value) -> Result<(), AllocError> {
        if value.is_none() {
            return Ok(());
        }
        if let Some(slot) = self.find(&key) {
            self.replace_at(slot, value);
            return Ok(());
        }
        self.order.try_reserve(1)?;
        self.grow()?;
        match self.probe(&key) {
            Some(Ok(slot)) => self.replace_at(slot, value),
            Some(Err(slot)) => self.occupy(slot, key, value),
            None => return Err(AllocError),
        }
        Ok(())
    }

    fn insert_new(&mut self, key: &[u8], value: Value) -> Result<(), AllocError> {
        let mut owned = Vec::new();
        owned.try_reserve_exact(key.len())?;
        owned.extend_from_slice(key);
        self.set_owned(BString::from(owned), value)
    }

    fn occupy(&mut self, slot: usize, key: BString, value: Value) {
        self.buckets[slot] = Some(Bucket {
            key,
            value,
            order_pos: self.order.len(),
        });
        self.order.push(slot);
    }

    fn replace_at(&mut self, slot: usize, value: Value) {
        let Some(bucket) = self.buckets[slot].as_mut() else {
            return;
        };
        bucket.value = value;
        if self.options.duplicate_keys == DuplicateKeys::MoveToEnd {
            let pos = bucket.order_pos;
            self.remove_order_entry(pos);
            if let Some(bucket) = self.buckets[slot].as_mut() {
                bucket.order_pos = self.order.len();
            }
            self.order.push(slot);
        }
    }

    /// Deletes `order[pos]` and renumbers the entries that followed it.
    fn remove_order_entry(&mut self, pos: usize) {
        self.order.remove(pos);
        for &slot in &self.order[pos..] {
            if let Some(bucket) = self.buckets[slot].as_mut() {
                bucket.order_pos -= 1;
            }
        }
    }

    /// The value for `key`, or [`Value::None`] when absent.
    #[must_use]
    pub fn get<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> &Value {
        self.find(key.as_ref())
            .and_then(|slot| self.buckets[slot].as_ref())
            .map_or(&NONE, |bucket| &bucket.value)
    }

    pub fn get_mut<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K) -> Option<&mut Value> {
        let slot = self.find(key.as_ref())?;
        self.buckets[slot].as_mut().map(|bucket| &mut bucket.value)
    }

    #[must_use]
    pub fn contains_key<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> bool {
        self.find(key.as_ref()).is_some()
    }

    /// Removes `key`, returning its value. The remaining entries keep their
    /// relative order.
    pub fn remove<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K) -> Option<Value> {
        let slot = self.find(key.as_ref())?;
        let bucket = self.buckets[slot].take()?;
        self.remove_order_entry(bucket.order_pos);
        self.backward_shift(slot);
        Some(bucket.value)
    }

    /// Closes the gap left at `hole` so every remaining key stays reachable
    /// from its home slot.
    fn backward_shift(&mut self, mut hole: usize) {
        let capacity = self.buckets.len();
        let mut index = hole;
        loop {
            index = (index + 1) % capacity;
            let Some(bucket) = &self.buckets[index] else {
                return;
            };
            let home = home_slot(&bucket.key, capacity);
            // The entry may stay if its home lies cyclically in (hole, index].
            let stays = if hole <= index {
                hole < home && home <= index
            } else {
                hole < home || home <= index
            };
            if stays {
                continue;
            }
            let moved = self.buckets[index].take();
            if let Some(pos) = moved.as_ref().map(|b| b.order_pos) {
                self.order[pos] = hole;
            }
            self.buckets[hole] = moved;
            hole = index;
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            order: self.order.iter(),
            buckets: &self.buckets,
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &BStr> + ExactSizeIterator {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &Value> + ExactSizeIterator {
        self.iter().map(|(_, v)| v)
    }

    /// Moves every value out, leaving the map empty.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<Value>) {
        self.order.clear();
        out.extend(self.buckets.drain(..).flatten().map(|bucket| bucket.value));
    }
}

impl Drop for OrderedMap {
    fn drop(&mut self) {
        if self.values().any(Value::is_container) {
            let mut pending = Vec::new();
            self.drain_into(&mut pending);
            drop_nested(pending);
        }
    }
}

/// Collects through [`OrderedMap::set`], so later duplicates replace earlier
/// values and [`Value::None`] is skipped.
///
/// Allocation failure aborts, as with the standard collections; call
/// [`OrderedMap::set`] directly to handle it.
///
/// ```
/// use jsonstack::{OrderedMap, Sequence, Value};
///
/// let map: OrderedMap = [
///     ("name", Value::from("draft")),
///     ("tags", [Value::from("a"), Value::from("b")].into_iter().collect::<Sequence>().into()),
///     ("name", Value::from("jsonstack")),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(Value::Object(map).to_string(), r#"{"name":"jsonstack","tags":["a","b"]}"#);
/// ```
impl<K: AsRef<[u8]>> FromIterator<(K, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<[u8]>> Extend<(K, Value)> for OrderedMap {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if self.set(&key, value).is_err() {
                handle_alloc_error(Layout::new::<Bucket>());
            }
        }
    }
}

/// Iterator over `(key, value)` pairs in insertion order.
pub struct Iter<'a> {
    order: slice::Iter<'a, usize>,
    buckets: &'a [Option<Bucket>],
}

impl<'a> Iter<'a> {
    fn project(&self, slot: usize) -> Option<(&'a BStr, &'a Value)> {
        let buckets: &'a [Option<Bucket>] = self.buckets;
        buckets[slot]
            .as_ref()
            .map(|bucket| (bucket.key.as_bstr(), &bucket.value))
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a BStr, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = *self.order.next()?;
        self.project(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slot = *self.order.next_back()?;
        self.project(slot)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a OrderedMap {
    type Item = (&'a BStr, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for OrderedMap {
    /// Maps are equal when they hold the same entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl fmt::Debug for OrderedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
