//! S3-compatible image storage operations
mod error;
mod key;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, Utc};

pub use error::{BucketError, BucketResult};
pub use key::{generate_key, KEY_LENGTH};

/// A presigned upload issued for one object key
#[derive(Debug, Clone)]
pub struct PresignedUpload {
    /// Storage key of the object
    pub key: String,
    /// The presigned URL for the PUT request
    pub upload_url: String,
    /// Public read URL of the object once uploaded
    pub public_url: String,
    /// UTC timestamp when `upload_url` expires
    pub expires_at: DateTime<Utc>,
}

/// Object storage capability used by the upload route
#[async_trait::async_trait]
pub trait PresignedUploader: Send + Sync {
    /// Issues a short-lived URL that accepts a PUT of `content_type` data at `key`
    async fn issue_presigned_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> BucketResult<PresignedUpload>;
}

/// Image storage client for S3 operations
pub struct MediaStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
    public_base_url: String,
    presigned_url_expiry_secs: u64,
}

impl MediaStorage {
    /// Creates a new media storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for image storage
    /// * `public_base_url` - Base URL public links are built from
    /// * `presigned_url_expiry_secs` - Expiry time for presigned URLs in seconds
    #[must_use]
    pub fn new(
        s3_client: Arc<S3Client>,
        bucket_name: String,
        public_base_url: String,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            bucket_name,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            presigned_url_expiry_secs,
        }
    }

    /// Public read URL for `key`
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

#[async_trait::async_trait]
impl PresignedUploader for MediaStorage {
    /// Generates a presigned URL for PUT operations
    ///
    /// The content type is part of the signature, so the upload must send the
    /// same `Content-Type` header.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` if presigned URL generation fails
    /// Returns `BucketError::ConfigError` if presigning config creation fails
    async fn issue_presigned_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> BucketResult<PresignedUpload> {
        tracing::debug!("Generating presigned URL for object: {key} ({content_type})");

        let presigned_config =
            PresigningConfig::expires_in(Duration::from_secs(self.presigned_url_expiry_secs))
                .map_err(|e| {
                    BucketError::ConfigError(format!("Failed to create presigning config: {e}"))
                })?;

        let presigned_url = self
            .s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .presigned(presigned_config)
            .await
            .map_err(|e| BucketError::S3Error(format!("Failed to generate presigned URL: {e}")))?;

        let expires_at: DateTime<Utc> =
            Utc::now() + Duration::from_secs(self.presigned_url_expiry_secs);

        Ok(PresignedUpload {
            key: key.to_string(),
            upload_url: presigned_url.uri().to_string(),
            public_url: self.public_url(key),
            expires_at,
        })
    }
}


#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::{Mutex, PoisonError};

    use chrono::Utc;

    use super::{BucketError, BucketResult, PresignedUpload, PresignedUploader};

    /// Base of the public URLs handed out by the mock
    pub const MOCK_PUBLIC_BASE_URL: &str = "https://i.podu.test";

    /// One call made to the mock
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct IssuedUpload {
        pub key: String,
        pub content_type: String,
    }

    /// In-memory uploader that records every call
    #[derive(Default)]
    pub struct MockPresignedUploader {
        fail: bool,
        calls: Mutex<Vec<IssuedUpload>>,
    }

    impl MockPresignedUploader {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Uploader whose every call fails like an unreachable provider
        #[must_use]
        pub fn failing() -> Self {
            Self {
                fail: true,
                calls: Mutex::default(),
            }
        }

        #[must_use]
        pub fn calls(&self) -> Vec<IssuedUpload> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        #[must_use]
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
        }
    }

    #[async_trait::async_trait]
    impl PresignedUploader for MockPresignedUploader {
        async fn issue_presigned_upload(
            &self,
            key: &str,
            content_type: &str,
        ) -> BucketResult<PresignedUpload> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(IssuedUpload {
                    key: key.to_string(),
                    content_type: content_type.to_string(),
                });

            if self.fail {
                return Err(BucketError::S3Error("mock storage unavailable".to_string()));
            }

            Ok(PresignedUpload {
                key: key.to_string(),
                upload_url: format!("https://storage.podu.test/{key}?X-Amz-Signature=mock"),
                public_url: format!("{MOCK_PUBLIC_BASE_URL}/{key}"),
                expires_at: Utc::now() + chrono::Duration::minutes(3),
            })
        }
    }
}
