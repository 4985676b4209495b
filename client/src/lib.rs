//! Podu upload client
//!
//! Drives one upload end to end: local validation, presigned URL request,
//! direct PUT to object storage and the local history update.

pub mod api;
mod error;
mod local_image;
pub mod uploader;

pub use api::{HttpUploadApi, UploadApi};
pub use error::{ClientError, ClientResult};
pub use local_image::{content_type_for_path, LocalImage};
pub use uploader::{UploadState, Uploader};
