use std::sync::Arc;
use std::time::Duration;

use aide::openapi::OpenApi;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Extension, Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::routes;
use crate::{
    media_storage::PresignedUploader,
    types::{AppError, Environment},
};

/// Requests taking longer than this are aborted
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the application router with its dependencies attached
pub fn build_router(environment: Environment, uploader: Arc<dyn PresignedUploader>) -> Router {
    let mut openapi = OpenApi::default();

    let router = routes::handler()
        .finish_api(&mut openapi)
        .fallback(routes::not_found)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(uploader))
        .layer(TraceLayer::new_for_http());

    with_request_timeout(router, REQUEST_TIMEOUT)
}

/// Aborts requests running longer than `timeout` with the usual JSON error body
fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::map_response(timeout_as_app_error))
}

/// `TimeoutLayer` answers with an empty 408
async fn timeout_as_app_error(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::upload_failed("request_timeout").into_response();
    }
    response
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    uploader: Arc<dyn PresignedUploader>,
) -> anyhow::Result<()> {
    let router = build_router(environment, uploader);

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Podu upload backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
