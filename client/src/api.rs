use std::time::Duration;

use common_types::{ErrorResponse, UploadResponse, UPLOAD_FIELD_NAME};
use reqwest::{header, multipart, Client};

use crate::{ClientError, ClientResult, LocalImage};

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;
/// Shown when the error body carries no message
const FALLBACK_API_ERROR: &str = "Failed to get upload URL";

/// The two network calls an upload needs
#[async_trait::async_trait]
pub trait UploadApi: Send + Sync {
    /// Asks the upload service for a presigned URL for `image`
    async fn request_upload_url(&self, image: &LocalImage) -> ClientResult<UploadResponse>;

    /// Sends the image bytes to the presigned URL
    async fn put_object(&self, upload_url: &str, image: &LocalImage) -> ClientResult<()>;
}

/// HTTP client for the Podu upload service
///
/// The PUT goes straight to object storage; only the URL request hits the service.
pub struct HttpUploadApi {
    api_url: String,
    http_client: Client,
}

impl HttpUploadApi {
    /// Creates a new client for the service at `api_url`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client cannot be built
    pub fn new(api_url: impl Into<String>) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .build()?;

        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }
}

#[async_trait::async_trait]
impl UploadApi for HttpUploadApi {
    #[tracing::instrument(skip(self, image), fields(file_name = %image.file_name))]
    async fn request_upload_url(&self, image: &LocalImage) -> ClientResult<UploadResponse> {
        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let url = format!("{}/api/upload", self.api_url);
        let response = self.http_client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map_or_else(|_| FALLBACK_API_ERROR.to_string(), |body| body.error);

            tracing::warn!(status = status.as_u16(), %message, "Upload URL request failed");

            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<UploadResponse>().await?)
    }

    #[tracing::instrument(skip(self, upload_url, image), fields(size = image.bytes.len()))]
    async fn put_object(&self, upload_url: &str, image: &LocalImage) -> ClientResult<()> {
        let response = self
            .http_client
            .put(upload_url)
            .header(header::CONTENT_TYPE, &image.content_type)
            .body(image.bytes.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Storage rejected upload");
            return Err(ClientError::UploadRejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::{Arc, Mutex};

    use common_types::UploadResponse;
    use tokio::sync::Notify;

    use super::UploadApi;
    use crate::{ClientError, ClientResult, LocalImage};

    pub const MOCK_PUBLIC_BASE_URL: &str = "https://i.podu.test";

    /// Calls seen by the mock, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ApiCall {
        RequestUploadUrl { content_type: String, size: usize },
        PutObject { upload_url: String, content_type: String },
    }

    #[derive(Default)]
    pub struct MockUploadApi {
        request_error: Option<(u16, String)>,
        put_error: Option<u16>,
        gate: Option<Arc<Notify>>,
        issued: Mutex<usize>,
        calls: Mutex<Vec<ApiCall>>,
    }

    impl MockUploadApi {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// URL requests fail with `status` and `message`
        #[must_use]
        pub fn failing_request(status: u16, message: impl Into<String>) -> Self {
            Self {
                request_error: Some((status, message.into())),
                ..Self::default()
            }
        }

        /// Storage PUTs fail with `status`
        #[must_use]
        pub fn failing_put(status: u16) -> Self {
            Self {
                put_error: Some(status),
                ..Self::default()
            }
        }

        /// URL requests wait until `gate` is notified
        #[must_use]
        pub fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }

        /// # Panics
        ///
        /// If the calls mutex is poisoned
        pub fn calls(&self) -> Vec<ApiCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: ApiCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait::async_trait]
    impl UploadApi for MockUploadApi {
        async fn request_upload_url(&self, image: &LocalImage) -> ClientResult<UploadResponse> {
            self.record(ApiCall::RequestUploadUrl {
                content_type: image.content_type.clone(),
                size: image.bytes.len(),
            });

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            if let Some((status, message)) = &self.request_error {
                return Err(ClientError::Api {
                    status: *status,
                    message: message.clone(),
                });
            }

            let key = {
                let mut issued = self.issued.lock().unwrap();
                *issued += 1;
                format!("mockkey{:03}", *issued)
            };

            Ok(UploadResponse {
                success: true,
                upload_url: format!("https://storage.podu.test/{key}?X-Amz-Signature=mock"),
                url: format!("{MOCK_PUBLIC_BASE_URL}/{key}"),
                key,
                expires_at: None,
            })
        }

        async fn put_object(&self, upload_url: &str, image: &LocalImage) -> ClientResult<()> {
            self.record(ApiCall::PutObject {
                upload_url: upload_url.to_string(),
                content_type: image.content_type.clone(),
            });

            match self.put_error {
                Some(status) => Err(ClientError::UploadRejected { status }),
                None => Ok(()),
            }
        }
    }
}
