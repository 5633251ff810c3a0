use std::{fmt, mem};

use log::debug;

use crate::{
    error::ResizeError,
    hash_functions::{HashFunction, additive_hash},
    prime::next_prime,
    utils::HashTable,
};

/// A key-value pair stored in a chain
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// The entries that hash to one bucket.
///
/// Logically a list with insertion at the front. The newest entry is kept at the end of the
/// vector so that inserting never shifts the others; every traversal walks it in reverse.
#[derive(Debug, Clone)]
struct Chain<V> {
    /// Entries, oldest first
    entries: Vec<Entry<V>>,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> Chain<V> {
    /// Entries from the front of the chain (newest) to the back (oldest)
    fn iter(&self) -> impl Iterator<Item = &Entry<V>> {
        self.entries.iter().rev()
    }

    /// Adds an entry at the front
    fn push_front(&mut self, key: String, value: V) {
        self.entries.push(Entry { key, value });
    }

    /// The entry for `key`
    fn find(&self, key: &str) -> Option<&Entry<V>> {
        self.iter().find(|entry| entry.key == key)
    }

    /// The entry for `key`, mutably
    fn find_mut(&mut self, key: &str) -> Option<&mut Entry<V>> {
        self.entries.iter_mut().rev().find(|entry| entry.key == key)
    }

    /// Unlinks the entry for `key`, keeping the order of the rest
    fn remove(&mut self, key: &str) -> Option<V> {
        let position = self.entries.iter().position(|entry| entry.key == key)?;
        Some(self.entries.remove(position).value)
    }

    /// Returns true if the chain has no entries
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unlinks every entry
    fn clear(&mut self) {
        self.entries.clear();
    }

    /// Takes the entries out in front-to-back order
    fn drain(self) -> impl Iterator<Item = Entry<V>> {
        self.entries.into_iter().rev()
    }
}

impl<V: fmt::Display> fmt::Display for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SLL [")?;
        for (position, entry) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "({}: {})", entry.key, entry.value)?;
        }
        f.write_str("]")
    }
}

/// A hash table resolving collisions by separate chaining.
///
/// Each bucket owns the chain of entries hashing to it. The table never grows on its own;
/// chains simply get longer as the load factor rises. Capacity is always prime.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct ChainedTable<V> {
    /// The buckets, always a prime number of them
    buckets: Vec<Chain<V>>,
    /// Current number of entries across all chains
    size: usize,
    /// Maps a key to its bucket (before reduction modulo the capacity)
    hash_fn: HashFunction,
}

impl<V> Default for ChainedTable<V> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, additive_hash)
    }
}

impl<V> ChainedTable<V> {
    /// Capacity used by [`ChainedTable::default`].
    pub const DEFAULT_CAPACITY: usize = 11;

    /// Creates a table with `capacity` rounded up to the next prime.
    #[must_use]
    pub fn new(capacity: usize, hash_fn: HashFunction) -> Self {
        Self { buckets: Self::empty_chains(next_prime(capacity)), size: 0, hash_fn }
    }

    /// Allocates `capacity` empty chains
    fn empty_chains(capacity: usize) -> Vec<Chain<V>> {
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Chain::default);
        buckets
    }

    /// Gets the index of the bucket for a key
    #[allow(clippy::arithmetic_side_effects)]
    fn bucket_index(&self, key: &str) -> usize {
        (self.hash_fn)(key) % self.buckets.len()
    }

    /// The chain `key` belongs to
    fn chain(&self, key: &str) -> Option<&Chain<V>> {
        self.buckets.get(self.bucket_index(key))
    }

    /// The chain `key` belongs to, mutably
    fn chain_mut(&mut self, key: &str) -> Option<&mut Chain<V>> {
        let index = self.bucket_index(key);
        self.buckets.get_mut(index)
    }

    /// Inserts or updates an entry for an owned key
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        let chain = self.chain_mut(&key)?;

        if let Some(entry) = chain.find_mut(&key) {
            return Some(mem::replace(&mut entry.value, value));
        }

        chain.push_front(key, value);
        self.size = self.size.saturating_add(1);
        None
    }

    /// Insert a key-value pair, returning the previous value if the key was present.
    ///
    /// A new key goes to the front of its chain; an existing key is updated in place.
    pub fn put(&mut self, key: &str, value: V) -> Option<V> {
        if let Some(entry) = self.chain_mut(key).and_then(|chain| chain.find_mut(key)) {
            return Some(mem::replace(&mut entry.value, value));
        }
        self.insert(key.to_owned(), value)
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.chain(key).and_then(|chain| chain.find(key)).map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.chain_mut(key).and_then(|chain| chain.find_mut(key)).map(|entry| &mut entry.value)
    }

    /// Returns true if the key is stored in the table
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.size != 0 && self.get(key).is_some()
    }

    /// Unlinks the entry for a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.chain_mut(key)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(value)
    }

    /// Rebuilds the table at `new_capacity` rounded up to a prime.
    ///
    /// Shrinking below the number of entries is allowed; chains just get longer.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::BelowMinimum`] when `new_capacity` is zero. The table is not
    /// modified in that case.
    pub fn try_resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        if new_capacity < 1 {
            return Err(ResizeError::BelowMinimum { requested: new_capacity });
        }

        let new_capacity = next_prime(new_capacity);
        let old_buckets = mem::replace(&mut self.buckets, Self::empty_chains(new_capacity));
        let old_capacity = old_buckets.len();
        let live = self.size;
        self.size = 0;

        for chain in old_buckets {
            for Entry { key, value } in chain.drain() {
                self.insert(key, value);
            }
        }

        debug!("rehashed {live} entries from {old_capacity} to {new_capacity} buckets");
        Ok(())
    }

    /// Rebuilds the table at `new_capacity` rounded up to a prime; a request for zero buckets
    /// is ignored
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

    /// Number of buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Clears the table, keeping its capacity
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Chain::clear);
        self.size = 0;
    }

    /// Copies out every key-value pair, bucket by bucket, newest first within a bucket
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_owned(), value.clone())).collect()
    }

    /// Returns an iterator over the key-value pairs in the same order as
    /// [`ChainedTable::get_keys_and_values`]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter())
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Returns the number of entries
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no entries
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

impl<V> HashTable<V> for ChainedTable<V> {
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

impl<V> Extend<(String, V)> for ChainedTable<V> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V: fmt::Display> fmt::Display for ChainedTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{index}: {chain}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_functions::positional_hash;

    #[test]
    fn test_put_and_get() {
        let mut table = ChainedTable::new(31, additive_hash);
        assert_eq!(table.get("key"), None);
        table.put("key1", 10);

        assert_eq!(table.get("key1"), Some(&10));
        assert_eq!(table.size(), 1);
        assert_eq!(table.capacity(), 31);
    }

    #[test]
    fn test_update_in_place() {
        let mut table = ChainedTable::new(7, |_| 0);
        table.put("a", 1);
        table.put("b", 2);
        assert_eq!(table.put("a", 10), Some(1));

        assert_eq!(table.size(), 2);
        // "b" was inserted last so it stays at the front
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![("b", &2), ("a", &10)]);
    }

    #[test]
    fn test_new_keys_go_to_front() {
        let mut table = ChainedTable::new(7, |_| 2);
        table.put("a", 1);
        table.put("b", 2);
        table.put("c", 3);

        assert_eq!(table.to_string().lines().nth(2), Some("2: SLL [(c: 3) -> (b: 2) -> (a: 1)]"));
        assert_eq!(table.to_string().lines().next(), Some("0: SLL []"));
        assert_eq!(table.empty_buckets(), 6);
    }

    #[test]
    fn test_load_may_exceed_half() {
        let mut table = ChainedTable::new(3, additive_hash);
        for i in 0..30 {
            table.put(&format!("key{i}"), i);
        }

        assert_eq!(table.capacity(), 3);
        assert_eq!(table.size(), 30);
        assert!((table.table_load() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contains_key_and_remove() {
        let mut table = ChainedTable::new(53, additive_hash);
        assert!(!table.contains_key("key1"));
        table.put("key1", 10);
        table.put("key2", 20);
        table.put("key3", 30);

        assert!(table.contains_key("key1"));
        assert!(!table.contains_key("key4"));
        assert_eq!(table.remove("key3"), Some(30));
        assert!(!table.contains_key("key3"));
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut table = ChainedTable::new(53, additive_hash);
        table.put("key1", 10);

        assert_eq!(table.remove("key4"), None);
        assert_eq!(table.size(), 1);
        assert_eq!(table.get("key1"), Some(&10));
    }

    #[test]
    fn test_remove_keeps_chain_order() {
        let mut table = ChainedTable::new(5, |_| 0);
        for key in ["a", "b", "c", "d"] {
            table.put(key, key.len());
        }
        table.remove("c");

        let keys: Vec<_> = table.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["d", "b", "a"]);
    }

    #[test]
    fn test_resize_can_shrink_below_size() {
        let mut table = ChainedTable::new(11, positional_hash);
        for i in 1..6 {
            table.put(&i.to_string(), (i * 10).to_string());
        }
        assert_eq!(table.get_keys_and_values().len(), 5);

        table.resize_table(1);
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.size(), 5);

        let mut pairs = table.get_keys_and_values();
        pairs.sort();
        let expected: Vec<_> = (1..6).map(|i| (i.to_string(), (i * 10).to_string())).collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_resize_to_zero_is_rejected() {
        let mut table = ChainedTable::new(11, additive_hash);
        table.put("key1", 1);

        assert_eq!(table.try_resize_table(0), Err(ResizeError::BelowMinimum { requested: 0 }));
        table.resize_table(0);
        assert_eq!(table.capacity(), 11);
        assert_eq!(table.get("key1"), Some(&1));
    }

    #[test]
    fn test_resize_rehashes_every_entry() {
        let mut table = ChainedTable::new(79, positional_hash);
        let keys: Vec<usize> = (1..1000).step_by(13).collect();
        for &key in &keys {
            table.put(&key.to_string(), key * 42);
        }

        for capacity in (111..1000).step_by(117) {
            table.resize_table(capacity);
            assert_eq!(table.capacity(), next_prime(capacity));
            assert_eq!(table.size(), keys.len());
            for &key in &keys {
                assert_eq!(table.get(&key.to_string()), Some(&(key * 42)));
                assert!(!table.contains_key(&(key + 1).to_string()));
            }
        }
    }

    #[test]
    fn test_clear() {
        let mut table = ChainedTable::new(53, additive_hash);
        table.put("key1", 10);
        table.put("key2", 20);
        table.resize_table(100);
        assert_eq!(table.capacity(), 101);

        table.clear();
        assert_eq!(table.size(), 0);
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 101);
        assert_eq!(table.empty_buckets(), 101);
    }

    #[test]
    fn test_default_table() {
        let table: ChainedTable<u32> = ChainedTable::default();
        assert_eq!(table.capacity(), ChainedTable::<u32>::DEFAULT_CAPACITY);
        assert!(table.is_empty());
    }

    #[test]
    fn test_get_mut_and_extend() {
        let mut table = ChainedTable::new(5, additive_hash);
        table.extend([("x".to_string(), 1), ("y".to_string(), 2), ("x".to_string(), 3)]);

        if let Some(value) = table.get_mut("y") {
            *value *= 10;
        }

        assert_eq!(table.size(), 2);
        assert_eq!(table.get("x"), Some(&3));
        assert_eq!(table.get("y"), Some(&20));
    }
}
