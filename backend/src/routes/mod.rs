mod config;
mod docs;
mod health;
pub mod upload;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};
use axum::extract::DefaultBodyLimit;

use crate::types::AppError;

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .api_route("/api/config", get(config::get_config))
        .api_route("/api/upload", post(upload::create_upload_url))
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BODY_BYTES))
}

/// Fallback for unknown routes
#[allow(clippy::unused_async)]
pub async fn not_found() -> AppError {
    AppError::not_found()
}
