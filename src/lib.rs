//! # Quadchain
//!
//! Two hash tables built from first principles over string keys, each taking the hash
//! function it should use at construction:
//!
//! - `OpenAddressingTable`: a single bucket array probed quadratically, with tombstones for
//!   removed entries and automatic growth that keeps the load factor at or below one half
//! - `ChainedTable`: a bucket array of chains that absorbs any load without growing
//!
//! Both keep their capacity prime and rebuild the whole bucket array on resize. They share
//! the [`HashTable`] trait, so code can be written once against either.
//!
//! ## Basic Usage
//!
//! ```rust
//! use quadchain::{OpenAddressingTable, hash_functions::additive_hash};
//!
//! // Requested capacities are rounded up to a prime
//! let mut table = OpenAddressingTable::new(23, additive_hash);
//!
//! table.put("key1", 10);
//! assert_eq!(table.get("key1"), Some(&10));
//! assert!(table.contains_key("key1"));
//!
//! table.resize_table(30);
//! assert_eq!(table.capacity(), 31);
//! assert_eq!(table.get("key1"), Some(&10));
//!
//! table.remove("key1");
//! assert_eq!(table.get("key1"), None);
//! ```
//!
//! ## Chaining
//!
//! ```rust
//! use quadchain::{ChainedTable, hash_functions::positional_hash};
//!
//! let mut table = ChainedTable::new(11, positional_hash);
//! for i in 1..6 {
//!     table.put(&i.to_string(), i * 10);
//! }
//!
//! // Chained tables may shrink below their size
//! table.resize_table(1);
//! assert_eq!(table.capacity(), 2);
//! assert_eq!(table.get_keys_and_values().len(), 5);
//! ```

/// Module implementing the separate chaining table
mod chained_table;
/// Errors reported by checked resizes
pub mod error;
/// Hash functions accepted by the tables
pub mod hash_functions;
/// Mode finding on top of the chained table
mod mode;
/// Module implementing the quadratic probing table
mod open_addressing_table;
/// Prime capacity helpers
pub mod prime;
/// The shared table contract and helpers built on it
mod utils;

pub use chained_table::ChainedTable;
pub use error::ResizeError;
pub use mode::find_mode;
pub use open_addressing_table::{Iter, OpenAddressingTable};
pub use utils::{HashTable, from_pairs};
