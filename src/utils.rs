//! The contract shared by both table variants, plus helpers written against it

use crate::{error::ResizeError, hash_functions::HashFunction};

/// Operations every table in this crate supports.
///
/// Keys are strings; the hash function is supplied at construction and never changes.
pub trait HashTable<V> {
    /// Creates a table with at least `capacity` buckets, rounded up to a prime.
    fn with_hash_function(capacity: usize, hash_fn: HashFunction) -> Self
    where
        Self: Sized;

    /// Inserts `value` under `key`, returning the previous value if the key was present.
    fn put(&mut self, key: &str, value: V) -> Option<V>;

    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<&V>;

    /// Returns true if `key` is stored in the table.
    fn contains_key(&self, key: &str) -> bool;

    /// Removes `key`, returning its value. Absent keys leave the table unchanged.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Rebuilds the bucket array at `new_capacity` (rounded up to a prime), reporting
    /// why the request was refused if the variant does not accept it.
    ///
    /// # Errors
    ///
    /// Returns a [`ResizeError`] when the requested capacity is invalid for the variant.
    fn try_resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError>;

    /// Like [`HashTable::try_resize_table`], but an invalid request is silently ignored.
    fn resize_table(&mut self, new_capacity: usize);

    /// Ratio of live entries to buckets.
    fn table_load(&self) -> f64;

    /// Number of buckets holding no live entry.
    fn empty_buckets(&self) -> usize;

    /// Removes every entry, keeping the current capacity.
    fn clear(&mut self);

    /// Copies out every live `(key, value)` pair in bucket order.
    fn get_keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone;

    /// Number of live entries.
    fn size(&self) -> usize;

    /// Number of buckets.
    fn capacity(&self) -> usize;
}

/// Builds a table of type `T` from an iterator of key-value pairs.
///
/// Later pairs overwrite earlier ones with the same key.
pub fn from_pairs<T, V, K, I>(capacity: usize, hash_fn: HashFunction, pairs: I) -> T
where
    T: HashTable<V>,
    K: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut table = T::with_hash_function(capacity, hash_fn);

    for (key, value) in pairs {
        table.put(key.as_ref(), value);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainedTable, OpenAddressingTable, hash_functions::additive_hash};

    fn exercise_contract<T: HashTable<i32>>() {
        let mut table: T = from_pairs(5, additive_hash, [("a", 1), ("b", 2), ("c", 3), ("a", 4)]);

        assert_eq!(table.size(), 3);
        assert_eq!(table.get("a"), Some(&4));
        assert!(table.contains_key("b"));
        assert_eq!(table.remove("b"), Some(2));
        assert!(!table.contains_key("b"));
        assert_eq!(table.remove("b"), None);

        let mut pairs = table.get_keys_and_values();
        pairs.sort();
        assert_eq!(pairs, vec![("a".to_string(), 4), ("c".to_string(), 3)]);

        table.clear();
        assert_eq!(table.size(), 0);
        assert_eq!(table.empty_buckets(), table.capacity());
    }

    #[test]
    fn test_from_pairs_open_addressing() {
        exercise_contract::<OpenAddressingTable<i32>>();
    }

    #[test]
    fn test_from_pairs_chained() {
        exercise_contract::<ChainedTable<i32>>();
    }

    #[test]
    fn test_from_pairs_accepts_owned_keys() {
        let pairs = (0..10).map(|i| (format!("key{i}"), i));
        let table: ChainedTable<i32> = from_pairs(3, additive_hash, pairs);

        assert_eq!(table.size(), 10);
        assert_eq!(table.get("key7"), Some(&7));
    }
}
