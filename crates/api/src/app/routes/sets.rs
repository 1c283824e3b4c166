use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use assetgate_core::SetId;
use assetgate_equipment::SetDraft;
use assetgate_gateway::MutationRequest;

use crate::app::{dto, errors, AppState};
use crate::cookie;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create).get(list))
        .route("/:id", axum::routing::put(update).delete(delete_one))
}

fn parse_id(raw: &str) -> Result<SetId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid set id"))
}

pub async fn create(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(body): Json<SetDraft>,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(token.as_ref(), MutationRequest::CreateSet(body))
        .await
    {
        Ok(outcome) => dto::outcome_to_response(outcome, StatusCode::CREATED),
        Err(e) => errors::core_error_to_response(e),
    }
}

/// Sets with their member items, ordered by name.
pub async fn list(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state.gateway.set_overview(token.as_ref()).await {
        Ok(sets) => (StatusCode::OK, Json(json!({ "sets": sets }))).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn update(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<SetDraft>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(token.as_ref(), MutationRequest::UpdateSet { id, draft: body })
        .await
    {
        Ok(outcome) => dto::outcome_to_response(outcome, StatusCode::OK),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn delete_one(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(token.as_ref(), MutationRequest::DeleteSet { id })
        .await
    {
        Ok(outcome) => dto::outcome_to_response(outcome, StatusCode::OK),
        Err(e) => errors::core_error_to_response(e),
    }
}
