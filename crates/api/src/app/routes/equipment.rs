use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use assetgate_core::EquipmentId;
use assetgate_equipment::EquipmentDraft;
use assetgate_gateway::MutationRequest;

use crate::app::{dto, errors, AppState};
use crate::cookie;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create).get(list))
        .route("/:id", get(get_one).put(update).delete(delete_one))
        .route("/:id/status", post(change_status))
        .route("/:id/history", get(history))
}

fn parse_id(raw: &str) -> Result<EquipmentId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid equipment id")
    })
}

pub async fn create(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(body): Json<EquipmentDraft>,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(token.as_ref(), MutationRequest::CreateEquipment(body))
        .await
    {
        Ok(outcome) => dto::outcome_to_response(outcome, StatusCode::CREATED),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn list(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state.gateway.list_equipment(token.as_ref()).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn get_one(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state.gateway.get_equipment(token.as_ref(), id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}

/// The QR-scan read. No session required; serves exactly one item.
pub async fn scan(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match state.gateway.scan_lookup(id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn update(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<EquipmentDraft>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(
            token.as_ref(),
            MutationRequest::UpdateEquipment { id, draft: body },
        )
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
        .execute(token.as_ref(), MutationRequest::DeleteEquipment { id })
        .await
    {
        Ok(outcome) => dto::outcome_to_response(outcome, StatusCode::OK),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn change_status(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<dto::StatusChangeRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(
            token.as_ref(),
            MutationRequest::ChangeEquipmentStatus {
                id,
                status: body.status,
            },
        )
        .await
    {
        Ok(outcome) => dto::outcome_to_response(outcome, StatusCode::OK),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn history(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state.gateway.equipment_history(token.as_ref(), id).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "entries": entries }))).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}
