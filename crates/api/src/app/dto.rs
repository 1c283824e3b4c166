//! Request DTOs and response mapping helpers.
//!
//! Most payloads deserialize straight into the domain draft types
//! (`NewAccount`, `EquipmentDraft`, `SetDraft`); only the shapes with
//! no domain counterpart live here.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use assetgate_auth::Role;
use assetgate_equipment::EquipmentStatus;
use assetgate_gateway::MutationOutcome;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: EquipmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct RoleChangeRequest {
    pub role: Role,
}

/// Render a successful mutation. Deletions have no body.
pub fn outcome_to_response(outcome: MutationOutcome, status: StatusCode) -> axum::response::Response {
    match outcome {
        MutationOutcome::Equipment(item) => (status, Json(item)).into_response(),
        MutationOutcome::Set(set) => (status, Json(set)).into_response(),
        MutationOutcome::User(principal) => (status, Json(principal)).into_response(),
        MutationOutcome::Deleted => StatusCode::NO_CONTENT.into_response(),
    }
}
