use axum::Json;
use common_types::MediaConfigResponse;

/// Upload limits, so clients can validate before sending anything
pub async fn get_config() -> Json<MediaConfigResponse> {
    Json(MediaConfigResponse::default())
}
