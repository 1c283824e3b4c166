use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use assetgate_core::UserId;
use assetgate_gateway::MutationRequest;

use crate::app::{dto, errors, AppState};
use crate::cookie;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/:id/role", axum::routing::put(change_role))
        .route("/:id", axum::routing::delete(delete_one))
}

fn parse_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"))
}

pub async fn list(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state.gateway.list_users(token.as_ref()).await {
        Ok(users) => (StatusCode::OK, Json(json!({ "users": users }))).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn change_role(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<dto::RoleChangeRequest>,
) -> axum::response::Response {
    let user_id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(
            token.as_ref(),
            MutationRequest::ChangeUserRole {
                user_id,
                role: body.role,
            },
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
    let user_id = match parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let token = cookie::session_token(&headers);
    match state
        .gateway
        .execute(token.as_ref(), MutationRequest::DeleteUser { user_id })
        .await
    {
        Ok(outcome) => dto::outcome_to_response(outcome, StatusCode::OK),
        Err(e) => errors::core_error_to_response(e),
    }
}
