//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common_types::{ErrorResponse, ValidationError, GENERIC_UPLOAD_ERROR};

use crate::media_storage::BucketError;

/// Application error type rendered as `{ "error": <message> }`
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// Machine-readable code, only logged
    code: &'static str,
    message: &'static str,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, code: &'static str, message: &'static str) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Generic failure of an upload-URL request.
    ///
    /// Every upload failure looks the same to the caller; `code` only shows up in logs.
    #[must_use]
    pub const fn upload_failed(code: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, GENERIC_UPLOAD_ERROR)
    }

    /// Unknown route
    #[must_use]
    pub const fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "Not found")
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.code, self.message),
            500..=599 => tracing::error!("Server error: {} - {}", self.code, self.message),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.message.to_string(),
        };

        (self.status, Json(body)).into_response()
    }
}

/// Validation failures are logged with their message and reported generically
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        tracing::warn!("Upload rejected by validator: {err}");
        match err {
            ValidationError::InvalidType => Self::upload_failed("invalid_file_type"),
            ValidationError::TooLarge => Self::upload_failed("file_too_large"),
        }
    }
}

/// Convert bucket errors to application errors
impl From<BucketError> for AppError {
    fn from(err: BucketError) -> Self {
        match &err {
            BucketError::S3Error(msg) => {
                tracing::error!("S3 error: {msg}");
                Self::upload_failed("storage_error")
            }
            BucketError::ConfigError(msg) => {
                tracing::error!("Configuration error: {msg}");
                Self::upload_failed("storage_config_error")
            }
        }
    }
}

impl OperationOutput for AppError {
    type Inner = ErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ErrorResponse>::operation_response(ctx, operation)
    }
}
