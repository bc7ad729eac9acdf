//! Error types for dyeplex-core.

use thiserror::Error;

/// Result type alias for dyeplex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for dyeplex operations.
///
/// The computation itself never fails; these errors come from building
/// inputs out of user-supplied values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A filter order that is not a permutation of `0..len`.
    #[error("invalid filter order {indices:?}: not a permutation of 0..{len}")]
    InvalidPermutation { indices: Vec<usize>, len: usize },

    /// A filter order whose length does not match the number of columns.
    #[error("filter order has {len} positions but the matrix has {expected} columns")]
    OrderLength { len: usize, expected: usize },

    /// Bandpass bounds that are not finite or not ordered.
    #[error("invalid bandpass: {lo} nm to {hi} nm")]
    InvalidBand { lo: f64, hi: f64 },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
