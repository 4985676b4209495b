//! Custom extractors for request validation

use aide::operation::OperationInput;
use axum::extract::{FromRequest, Multipart, Request};
use common_types::{FileDescriptor, UPLOAD_FIELD_NAME};

use crate::types::error::AppError;

/// The `image` field of a `multipart/form-data` upload request.
///
/// The file body is streamed and counted, never buffered, so only its declared
/// content type and its size are kept.
#[derive(Debug)]
pub struct ImageUpload {
    /// Declared content type and size of the file
    pub file: FileDescriptor,
    /// File name sent by the client, if any
    pub file_name: Option<String>,
}

impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(|err| {
            tracing::warn!("Rejected non-multipart upload request: {err}");
            AppError::upload_failed("invalid_multipart")
        })?;

        while let Some(mut field) = multipart.next_field().await.map_err(|err| {
            tracing::warn!("Failed to read multipart field: {err}");
            AppError::upload_failed("invalid_multipart")
        })? {
            if field.name() != Some(UPLOAD_FIELD_NAME) {
                continue;
            }

            let content_type = field.content_type().unwrap_or_default().to_string();
            let file_name = field.file_name().map(ToString::to_string);

            let mut size: u64 = 0;
            while let Some(chunk) = field.chunk().await.map_err(|err| {
                tracing::warn!("Failed to read uploaded file: {err}");
                AppError::upload_failed("invalid_multipart")
            })? {
                size += chunk.len() as u64;
            }

            tracing::debug!(%content_type, size, ?file_name, "Received image field");

            return Ok(Self {
                file: FileDescriptor { content_type, size },
                file_name,
            });
        }

        tracing::warn!("Upload request has no `{UPLOAD_FIELD_NAME}` field");
        Err(AppError::upload_failed("missing_image_field"))
    }
}

impl OperationInput for ImageUpload {}
