use axum::{
    extract::Extension,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use assetgate_auth::NewAccount;

use crate::app::{dto, errors, AppState};
use crate::cookie;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

pub async fn register(
    Extension(state): Extension<AppState>,
    Json(body): Json<NewAccount>,
) -> axum::response::Response {
    match state.gateway.register(body).await {
        Ok(principal) => (StatusCode::CREATED, Json(principal)).into_response(),
        Err(e) => errors::core_error_to_response(e),
    }
}

pub async fn login(
    Extension(state): Extension<AppState>,
    Json(body): Json<dto::SignInRequest>,
) -> axum::response::Response {
    match state.gateway.sign_in(&body.email, &body.password).await {
        Ok((session, principal)) => {
            let ttl = state.gateway.sessions().ttl();
            let set_cookie = cookie::issue(&session.token, ttl, state.cookies);
            (
                StatusCode::OK,
                [(header::SET_COOKIE, set_cookie)],
                Json(principal),
            )
                .into_response()
        }
        Err(e) => errors::core_error_to_response(e),
    }
}

/// Idempotent: logging out without a session still clears the cookie.
pub async fn logout(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> axum::response::Response {
    if let Some(token) = cookie::session_token(&headers) {
        if let Err(e) = state.gateway.sign_out(&token).await {
            return errors::core_error_to_response(e);
        }
    }
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cookie::clear(state.cookies))],
    )
        .into_response()
}

pub async fn me(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> axum::response::Response {
    let token = cookie::session_token(&headers);
    match state.gateway.current_principal(token.as_ref()).await {
        Ok(Some(principal)) => (StatusCode::OK, Json(principal)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "sign in required",
        ),
        Err(e) => errors::core_error_to_response(e),
    }
}
