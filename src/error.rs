//! Errors reported by the checked resize operations.

use thiserror::Error;

/// Why a requested resize was refused. The table is left untouched in every case.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    /// Open addressing cannot hold more live entries than it has buckets.
    #[error("requested capacity {requested} is below the {size} live entries")]
    BelowSize {
        /// Capacity the caller asked for
        requested: usize,
        /// Live entries at the time of the request
        size: usize,
    },
    /// A chained table needs at least one bucket.
    #[error("requested capacity {requested} is below the minimum of one bucket")]
    BelowMinimum {
        /// Capacity the caller asked for
        requested: usize,
    },
}
