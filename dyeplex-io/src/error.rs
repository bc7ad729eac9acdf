//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record with an unexpected layout.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// Curve sample that is neither `[wl, value]` nor `{x, y}` with numeric coordinates.
    #[error("unrecognized spectral point at index {index}: {value}")]
    UnrecognizedPoint { index: usize, value: String },

    /// No record with this id in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] dyeplex_core::Error),
}
