//! HTTP application wiring (Axum router + gateway wiring).
//!
//! - `services.rs`: store wiring (in-memory by default, Postgres behind
//!   the `postgres` feature)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and response mapping helpers
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router};
use tower::ServiceBuilder;

use assetgate_gateway::MutationGateway;

use crate::config::AppConfig;
use crate::cookie::CookieOptions;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Shared per-request state: the gateway is the only collaborator the
/// handlers talk to.
#[derive(Clone)]
pub struct AppState {
    pub gateway: MutationGateway,
    pub cookies: CookieOptions,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and
/// the black-box tests).
pub async fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let gateway = services::build_gateway(&config).await?;

    if let Some(account) = config.bootstrap_admin.clone() {
        gateway.bootstrap_admin(account).await?;
    }

    let state = AppState {
        gateway,
        cookies: CookieOptions {
            secure: config.cookie_secure,
        },
    };

    Ok(routes::router()
        .layer(ServiceBuilder::new().layer(Extension(state))))
}
