use axum::{routing::get, Router};

pub mod auth;
pub mod dashboard;
pub mod equipment;
pub mod sets;
pub mod system;
pub mod users;

/// The full route table. Authorization is not expressed here; every
/// handler hands its (possibly absent) session token to the gateway and
/// lets the policy decide.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/scan/:id", get(equipment::scan))
        .nest("/auth", auth::router())
        .nest("/equipment", equipment::router())
        .nest("/sets", sets::router())
        .nest("/users", users::router())
        .nest("/dashboard", dashboard::router())
}
