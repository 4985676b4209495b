//! Types shared between the upload backend and its clients

pub mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use validation::{
    validate_image_file, FileDescriptor, ValidationError, ValidationResult, ALLOWED_TYPES,
    MAX_FILE_SIZE,
};

/// Multipart form field that carries the uploaded file
pub const UPLOAD_FIELD_NAME: &str = "image";

/// Message returned for every failed upload-URL request
pub const GENERIC_UPLOAD_ERROR: &str = "Failed to generate upload URL. Please try again.";

/// Successful response of `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always `true` for a successful response
    pub success: bool,
    /// Short-lived, write-capable URL the file bytes are PUT to
    pub upload_url: String,
    /// Storage key of the object, also used as the history id
    pub key: String,
    /// Long-lived public read URL
    pub url: String,
    /// RFC 3339 timestamp when `upload_url` stops working
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Error body returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

/// Upload limits advertised to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfigResponse {
    /// Accepted MIME types
    pub allowed_types: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size_bytes: u64,
}

impl Default for MediaConfigResponse {
    fn default() -> Self {
        Self {
            allowed_types: ALLOWED_TYPES.iter().map(ToString::to_string).collect(),
            max_file_size_bytes: MAX_FILE_SIZE,
        }
    }
}
