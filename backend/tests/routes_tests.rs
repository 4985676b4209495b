mod common;

use common::*;

use http::StatusCode;
use podu_backend::media_storage::mock::MockPresignedUploader;
use podu_backend::types::Environment;

#[tokio::test]
async fn test_health() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/health")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["semver"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_media_config() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/api/config")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(
        body,
        serde_json::json!({
            "allowedTypes": ["image/jpeg", "image/png", "image/gif"],
            "maxFileSizeBytes": 10_485_760
        })
    );
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/does-not-exist")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        parse_response_body(response).await,
        serde_json::json!({ "error": "Not found" })
    );
}

#[tokio::test]
async fn test_openapi_available_in_development() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/openapi.json")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["paths"]["/api/upload"].is_object());
}

#[tokio::test]
async fn test_openapi_hidden_in_production() {
    let setup = TestSetup::with_uploader(Environment::Production, MockPresignedUploader::new());

    let response = setup
        .send_get_request("/openapi.json")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
