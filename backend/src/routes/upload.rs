use std::sync::Arc;

use axum::{Extension, Json};
use common_types::{validate_image_file, FileDescriptor, UploadResponse, MAX_FILE_SIZE};
use tracing::instrument;

use crate::{
    media_storage::{generate_key, PresignedUploader},
    types::{AppError, ImageUpload},
};

/// Request body limit for the upload route.
///
/// Twice the file limit, so oversize files still reach the validator instead of
/// failing while the body is read.
pub const MAX_UPLOAD_BODY_BYTES: usize = 2 * MAX_FILE_SIZE as usize;

/// Issues a presigned upload URL for an image
///
/// Expects `multipart/form-data` with the file in the `image` field. The file is
/// validated again here; the bytes themselves go straight to object storage
/// through the returned `uploadUrl`.
///
/// # Errors
///
/// Every failure (malformed request, rejected file, storage error) is reported
/// as `500 { "error": "Failed to generate upload URL. Please try again." }`.
#[instrument(skip(uploader, upload), fields(file_name = ?upload.file_name))]
pub async fn create_upload_url(
    Extension(uploader): Extension<Arc<dyn PresignedUploader>>,
    upload: ImageUpload,
) -> Result<Json<UploadResponse>, AppError> {
    issue_upload_url(uploader.as_ref(), &upload.file)
        .await
        .map(Json)
}

/// Validates `file`, picks a fresh key and asks storage for a presigned upload.
///
/// Storage is never called for a file the validator rejects.
///
/// # Errors
///
/// Returns the `AppError` for a validation or storage failure
pub async fn issue_upload_url(
    uploader: &dyn PresignedUploader,
    file: &FileDescriptor,
) -> Result<UploadResponse, AppError> {
    validate_image_file(file)?;

    let key = generate_key();
    let presigned = uploader
        .issue_presigned_upload(&key, &file.content_type)
        .await?;

    tracing::info!(
        key = %presigned.key,
        content_type = %file.content_type,
        size = file.size,
        expires_at = %presigned.expires_at,
        "Issued presigned upload URL"
    );

    Ok(UploadResponse {
        success: true,
        upload_url: presigned.upload_url,
        key: presigned.key,
        url: presigned.public_url,
        expires_at: Some(presigned.expires_at.to_rfc3339()),
    })
}
