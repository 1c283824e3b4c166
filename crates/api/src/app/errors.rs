use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use assetgate_core::CoreError;

/// Map the shared error taxonomy onto HTTP. Storage details never leave
/// the process; everything else carries its message.
pub fn core_error_to_response(err: CoreError) -> axum::response::Response {
    match err {
        CoreError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in required")
        }
        CoreError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        CoreError::Validation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
        }
        CoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        CoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        CoreError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_details_are_not_leaked() {
        let res = core_error_to_response(CoreError::storage("connection refused to 10.0.0.5"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthenticated_and_forbidden_stay_distinct() {
        assert_eq!(
            core_error_to_response(CoreError::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            core_error_to_response(CoreError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
    }
}
