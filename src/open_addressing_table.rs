use std::{fmt, mem};

use log::{debug, trace};

use crate::{
    error::ResizeError, hash_functions::HashFunction, prime::next_prime, utils::HashTable,
};

/// A key-value pair stored in a bucket
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// The three states a bucket can be in
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never used since the last rebuild or clear; ends every probe sequence
    Empty,
    /// Held an entry that was removed; probes continue past it
    Tombstone,
    /// Holds a live entry
    Occupied(Entry<V>),
}

impl<V> Slot<V> {
    /// Returns the entry if the slot is live
    fn entry(&self) -> Option<&Entry<V>> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Empty | Self::Tombstone => None,
        }
    }

    /// Returns true if the slot holds the live entry for `key`
    fn holds(&self, key: &str) -> bool {
        self.entry().is_some_and(|entry| entry.key == key)
    }
}

/// The quadratic probe sequence `(start + j²) mod capacity` for `j` in `0..capacity`.
///
/// After `capacity` steps the squares repeat modulo the capacity, so no further positions
/// can be reached.
#[derive(Debug, Clone, Copy)]
struct QuadraticProbe {
    /// Home bucket, already reduced modulo the capacity
    start: usize,
    /// `j² mod capacity` for the current step
    offset: usize,
    /// Current value of `j`
    step: usize,
    /// Number of buckets being probed
    capacity: usize,
}

impl QuadraticProbe {
    /// Starts a probe sequence for `hash` over `capacity` buckets
    #[allow(clippy::arithmetic_side_effects)]
    fn new(hash: usize, capacity: usize) -> Self {
        Self { start: hash % capacity.max(1), offset: 0, step: 0, capacity }
    }
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.capacity {
            return None;
        }

        let index = (self.start + self.offset) % self.capacity;
        // (j + 1)² = j² + 2j + 1
        self.offset = (self.offset + 2 * self.step + 1) % self.capacity;
        self.step += 1;

        Some(index)
    }
}

/// A hash table resolving collisions by quadratic probing.
///
/// Capacity is always prime and the load factor never exceeds one half once a `put` returns:
/// the table grows to the next prime past twice its capacity whenever the ceiling is reached.
/// Removal leaves a tombstone in the bucket so that later probes keep walking past it;
/// tombstones are dropped whenever the table is rebuilt.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingTable<V> {
    /// The buckets, always a prime number of them
    buckets: Vec<Slot<V>>,
    /// Current number of live entries
    size: usize,
    /// Maps a key to its home bucket (before reduction modulo the capacity)
    hash_fn: HashFunction,
}

impl<V> OpenAddressingTable<V> {
    /// Ceiling on the load factor maintained by `put`.
    pub const MAX_LOAD_FACTOR: f64 = 0.5;
    /// Multiplier applied to the capacity when growing.
    pub const GROWTH_FACTOR: usize = 2;

    /// Creates a table with `capacity` rounded up to the next prime.
    #[must_use]
    pub fn new(capacity: usize, hash_fn: HashFunction) -> Self {
        Self { buckets: Self::vacant_buckets(next_prime(capacity)), size: 0, hash_fn }
    }

    /// Allocates `capacity` never-used buckets
    fn vacant_buckets(capacity: usize) -> Vec<Slot<V>> {
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, || Slot::Empty);
        buckets
    }

    /// Probe sequence for `key` over the current buckets
    fn probe(&self, key: &str) -> QuadraticProbe {
        QuadraticProbe::new((self.hash_fn)(key), self.buckets.len())
    }

    /// Index of the live entry for `key`.
    ///
    /// Stops at the first never-used bucket; tombstones and other keys are walked past.
    fn find(&self, key: &str) -> Option<usize> {
        if self.size == 0 {
            return None;
        }

        for index in self.probe(key) {
            match self.buckets.get(index) {
                None | Some(Slot::Empty) => return None,
                Some(slot) if slot.holds(key) => return Some(index),
                Some(_) => {}
            }
        }

        None
    }

    /// Index of the first bucket along the probe sequence for `key` that holds no live entry
    fn find_vacant(&self, key: &str) -> Option<usize> {
        self.probe(key)
            .find(|&index| self.buckets.get(index).is_some_and(|slot| slot.entry().is_none()))
    }

    /// Returns true if one more live entry would push the load factor past the ceiling
    #[allow(clippy::cast_precision_loss)]
    fn would_overload(&self) -> bool {
        self.size.saturating_add(1) as f64 / self.buckets.len() as f64 > Self::MAX_LOAD_FACTOR
    }

    /// Inserts or updates an entry for an owned key
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        if self.table_load() >= Self::MAX_LOAD_FACTOR {
            self.rehash(self.grown_capacity());
        }

        if let Some(Slot::Occupied(entry)) =
            self.find(&key).and_then(|index| self.buckets.get_mut(index))
        {
            return Some(mem::replace(&mut entry.value, value));
        }

        if self.would_overload() {
            self.rehash(self.grown_capacity());
        }

        loop {
            // Below half load a prime capacity always has a vacant bucket within the first
            // (capacity + 1) / 2 probes, so this only repeats for a hash function that does
            // not depend on the key alone.
            if let Some(slot) = self.find_vacant(&key).and_then(|index| self.buckets.get_mut(index))
            {
                *slot = Slot::Occupied(Entry { key, value });
                self.size = self.size.saturating_add(1);
                return None;
            }
            self.rehash(self.grown_capacity());
        }
    }

    /// Capacity requested when the load factor ceiling is reached
    fn grown_capacity(&self) -> usize {
        self.buckets.len().saturating_mul(Self::GROWTH_FACTOR)
    }

    /// Rebuilds the table with `new_capacity` buckets rounded up to a prime, reinserting every
    /// live entry through the normal insertion path
    fn rehash(&mut self, new_capacity: usize) {
        let new_capacity = next_prime(new_capacity);
        let old_buckets = mem::replace(&mut self.buckets, Self::vacant_buckets(new_capacity));
        let old_capacity = old_buckets.len();
        let live = self.size;
        self.size = 0;

        for slot in old_buckets {
            if let Slot::Occupied(Entry { key, value }) = slot {
                self.insert(key, value);
            }
        }

        debug!("rehashed {live} entries from {old_capacity} to {} buckets", self.buckets.len());
    }

    /// Insert a key-value pair, returning the previous value if the key was present.
    ///
    /// Grows the table first when the load factor has reached one half, or when a new key
    /// would take it past one half.
    pub fn put(&mut self, key: &str, value: V) -> Option<V> {
        self.insert(key.to_owned(), value)
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key)
            .and_then(|index| self.buckets.get(index))
            .and_then(Slot::entry)
            .map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.find(key).and_then(|index| self.buckets.get_mut(index)) {
            Some(Slot::Occupied(entry)) => Some(&mut entry.value),
            _ => None,
        }
    }

    /// Returns true if the key is stored in the table
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes a key, leaving a tombstone in its bucket
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find(key)?;
        let slot = self.buckets.get_mut(index)?;

        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                trace!("tombstoned bucket {index} for key {key:?}");
                Some(entry.value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Rebuilds the table at `new_capacity` rounded up to a prime.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::BelowSize`] when `new_capacity` is smaller than the number of
    /// live entries. The table is not modified in that case.
    pub fn try_resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        if new_capacity < self.size {
            return Err(ResizeError::BelowSize { requested: new_capacity, size: self.size });
        }

        self.rehash(new_capacity);
        Ok(())
    }

    /// Rebuilds the table at `new_capacity` rounded up to a prime; requests below the current
    /// size are ignored
    pub fn resize_table(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_resize_table(new_capacity) {
            debug!("ignored resize: {err}");
        }
    }

    /// Returns the current load factor
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Number of buckets that are never-used or tombstoned
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|slot| slot.entry().is_none()).count()
    }

    /// Clears the table, keeping its capacity
    pub fn clear(&mut self) {
        for slot in &mut self.buckets {
            *slot = Slot::Empty;
        }
        self.size = 0;
    }

    /// Copies out every live key-value pair in bucket order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_owned(), value.clone())).collect()
    }

    /// Returns an iterator over the live key-value pairs in bucket order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter() }
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }
}

impl<V> HashTable<V> for OpenAddressingTable<V> {
    fn with_hash_function(capacity: usize, hash_fn: HashFunction) -> Self {
        Self::new(capacity, hash_fn)
    }

    fn put(&mut self, key: &str, value: V) -> Option<V> {
        Self::put(self, key, value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        Self::contains_key(self, key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        Self::remove(self, key)
    }

    fn try_resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        Self::try_resize_table(self, new_capacity)
    }

    fn resize_table(&mut self, new_capacity: usize) {
        Self::resize_table(self, new_capacity);
    }

    fn table_load(&self) -> f64 {
        Self::table_load(self)
    }

    fn empty_buckets(&self) -> usize {
        Self::empty_buckets(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        Self::get_keys_and_values(self)
    }

    fn size(&self) -> usize {
        Self::size(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }
}

impl<V> Extend<(String, V)> for OpenAddressingTable<V> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V: fmt::Display> fmt::Display for OpenAddressingTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.buckets.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Tombstone => writeln!(f, "{index}: <deleted>")?,
                Slot::Occupied(entry) => {
                    writeln!(f, "{index}: K: {} V: {}", entry.key, entry.value)?;
                }
            }
        }
        Ok(())
    }
}

/// Iterator over the live key-value pairs of an [`OpenAddressingTable`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Remaining buckets to visit
    buckets: std::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.buckets
            .by_ref()
            .find_map(Slot::entry)
            .map(|entry| (entry.key.as_str(), &entry.value))
    }
}
