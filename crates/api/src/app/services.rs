//! Store wiring behind the gateway.

use std::sync::Arc;

use assetgate_gateway::MutationGateway;
use assetgate_infra::{InMemoryEquipmentStore, InMemoryIdentityStore, InMemorySetStore};
use assetgate_sessions::{InMemorySessionStore, SessionManager};

use crate::config::AppConfig;

/// Wire a gateway from the configuration. Sessions always live in
/// process memory; a restart signs everyone out.
pub async fn build_gateway(config: &AppConfig) -> anyhow::Result<MutationGateway> {
    let sessions = SessionManager::new(Arc::new(InMemorySessionStore::new()));

    #[cfg(feature = "postgres")]
    if let Some(url) = &config.database_url {
        return postgres_gateway(url, sessions).await;
    }

    let _ = config;
    Ok(MutationGateway::new(
        Arc::new(InMemoryIdentityStore::new()),
        Arc::new(InMemoryEquipmentStore::new()),
        Arc::new(InMemorySetStore::new()),
        sessions,
    ))
}

#[cfg(feature = "postgres")]
async fn postgres_gateway(
    url: &str,
    sessions: SessionManager,
) -> anyhow::Result<MutationGateway> {
    use assetgate_infra::store::postgres::SCHEMA;
    use assetgate_infra::{PostgresEquipmentStore, PostgresIdentityStore, PostgresSetStore};

    let pool = sqlx::PgPool::connect(url).await?;
    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    tracing::info!("connected to postgres");

    Ok(MutationGateway::new(
        Arc::new(PostgresIdentityStore::new(pool.clone())),
        Arc::new(PostgresEquipmentStore::new(pool.clone())),
        Arc::new(PostgresSetStore::new(pool)),
        sessions,
    ))
}
