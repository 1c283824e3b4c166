use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::app::{errors, AppState};
use crate::cookie;

const RECENT_LIMIT: usize = 5;

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(stats))
        .route("/recent", get(recent))
}

/// Per-status equipment counts.
pub async fn stats(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state.gateway.dashboard_stats(token.as_ref()).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}

/// The most recently purchased items.
pub async fn recent(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .recent_equipment(token.as_ref(), RECENT_LIMIT)
        .await
    {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}
