//! Upload validation rules

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted image MIME types, compared verbatim against the declared type
pub const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Maximum accepted file size (10 MiB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// What the validator knows about a candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Caller-declared content type
    pub content_type: String,
    /// Size in bytes
    pub size: u64,
}

impl FileDescriptor {
    #[must_use]
    pub fn new(content_type: impl Into<String>, size: u64) -> Self {
        Self {
            content_type: content_type.into(),
            size,
        }
    }
}

/// Reasons a file is refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Declared type is not in [`ALLOWED_TYPES`]
    #[error("Invalid file type. Only JPG, PNG, and GIF are allowed.")]
    InvalidType,

    /// File is larger than [`MAX_FILE_SIZE`]
    #[error("File too large. Maximum size is 10MB.")]
    TooLarge,
}

/// Checks a file against the allow-list and the size limit.
///
/// The type is checked first, so a disallowed type is reported even when the
/// file is also too large. The declared content type is trusted as-is.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidType`] or [`ValidationError::TooLarge`].
pub fn validate_image_file(file: &FileDescriptor) -> Result<(), ValidationError> {
    if !ALLOWED_TYPES.contains(&file.content_type.as_str()) {
        return Err(ValidationError::InvalidType);
    }

    if file.size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge);
    }

    Ok(())
}

/// Serializable `{valid, error?}` view of a validation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                error: None,
            },
            Err(e) => Self {
                valid: false,
                error: Some(e.to_string()),
            },
        }
    }
}
