//! Error types for history operations

use thiserror::Error;

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur while reading or writing the history
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Underlying storage could not be read or written
    #[error("Failed to access history storage: {0}")]
    Io(#[from] std::io::Error),

    /// History could not be encoded as JSON
    #[error("Failed to serialize history: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store task has stopped
    #[error("History store is no longer running")]
    StoreClosed,
}
