//! Error types for the upload client

use std::path::PathBuf;

use common_types::ValidationError;
use thiserror::Error;
use upload_history::HistoryError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur during an upload
#[derive(Error, Debug)]
pub enum ClientError {
    /// File was refused before anything was sent; the message is shown as-is
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Upload endpoint answered with an error status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the error body
        message: String,
    },

    /// Object storage refused the PUT
    #[error("Upload failed")]
    UploadRejected {
        /// HTTP status code returned by storage
        status: u16,
    },

    /// Request could not be completed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// History could not be updated
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Another upload is still running on this uploader
    #[error("An upload is already in progress")]
    UploadInProgress,
}
