//! Hash functions that can be handed to the tables.
//!
//! A table never owns or mutates its hash function; it only calls it. Any pure
//! `fn(&str) -> usize` works, including non-capturing closures.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// The hash function contract shared by both tables.
pub type HashFunction = fn(&str) -> usize;

/// Sums the code points of every character in the key.
///
/// Anagrams collide, which makes this handy for exercising collision paths.
#[must_use]
pub fn additive_hash(key: &str) -> usize {
    key.chars().fold(0_usize, |hash, c| hash.wrapping_add(c as usize))
}

/// Sums each character's code point weighted by its one-based position.
#[must_use]
pub fn positional_hash(key: &str) -> usize {
    key.chars().enumerate().fold(0_usize, |hash, (index, c)| {
        hash.wrapping_add(index.wrapping_add(1).wrapping_mul(c as usize))
    })
}

/// Hashes the key with the standard library's `DefaultHasher`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn default_hash(key: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_hash() {
        assert_eq!(additive_hash(""), 0);
        assert_eq!(additive_hash("a"), 97);
        assert_eq!(additive_hash("key1"), 107 + 101 + 121 + 49);
        assert_eq!(additive_hash("ab"), additive_hash("ba"));
    }

    #[test]
    fn test_positional_hash() {
        assert_eq!(positional_hash(""), 0);
        assert_eq!(positional_hash("a"), 97);
        assert_eq!(positional_hash("ab"), 97 + 2 * 98);
        assert_ne!(positional_hash("ab"), positional_hash("ba"));
    }

    #[test]
    fn test_default_hash_is_stable_within_process() {
        assert_eq!(default_hash("apple"), default_hash("apple"));
    }

    #[test]
    fn test_closure_coerces_to_hash_function() {
        let constant: HashFunction = |_| 7;
        assert_eq!(constant("anything"), 7);
    }
}
