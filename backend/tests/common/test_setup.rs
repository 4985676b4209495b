use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use podu_backend::{
    media_storage::{mock::MockPresignedUploader, PresignedUploader},
    server,
    types::Environment,
};
use tower::ServiceExt;

use super::{multipart_body, MultipartFile};

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    dotenvy::from_path(".env.example").ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to an in-memory presigned uploader
pub struct TestSetup {
    pub router: Router,
    pub environment: Environment,
    pub uploader: Arc<MockPresignedUploader>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_uploader(
            Environment::Development {
                presign_expiry_override: None,
            },
            MockPresignedUploader::new(),
        )
    }

    pub fn with_uploader(environment: Environment, uploader: MockPresignedUploader) -> Self {
        setup_test_env();

        let uploader = Arc::new(uploader);
        let dyn_uploader: Arc<dyn PresignedUploader> = uploader.clone();
        let router = server::build_router(environment.clone(), dyn_uploader);

        Self {
            router,
            environment,
            uploader,
        }
    }

    pub async fn send_upload(
        &self,
        files: &[MultipartFile],
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let (content_type, body) = multipart_body(files);
        let request = Request::builder()
            .uri("/api/upload")
            .method("POST")
            .header("Content-Type", content_type)
            .body(Body::from(body))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}
