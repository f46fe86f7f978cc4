//! Error types for store operations.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Empty collection name or key passed to an operation. Raised before
    /// any filesystem access; always a caller bug.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A `put` targeted a collection whose directory does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a caller-supplied codec hook.
    #[error("codec error: {0}")]
    Codec(String),
}
