//! Session issuance, resolution, and invalidation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use assetgate_core::{CoreError, CoreResult, UserId};

use crate::{Session, SessionStore, SessionToken};

/// Default session lifetime, matching the cookie `Max-Age` the
/// transport layer sets.
pub fn default_ttl() -> Duration {
    Duration::days(5)
}

/// Issues and resolves sessions against a [`SessionStore`].
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_ttl(store, default_ttl())
    }

    pub fn with_ttl(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new session for `user_id`.
    ///
    /// The caller has already verified the identity exists; the token is
    /// generated here (256 bits from the OS) and returned inside the
    /// session record for the transport layer to hand out.
    pub async fn create(&self, user_id: UserId) -> CoreResult<Session> {
        let now = Utc::now();
        let session = Session {
            token: SessionToken::generate(),
            user_id,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        self.store
            .insert(session.clone())
            .await
            .map_err(|e| CoreError::storage(e.to_string()))?;
        tracing::info!(user_id = %user_id, "session issued");
        Ok(session)
    }

    /// Resolve a presented token to its session.
    ///
    /// Absent and expired both resolve to `Ok(None)` — "not logged in"
    /// is an expected condition, never an error. An expired record is
    /// removed on the way out. Malformed tokens never get this far;
    /// they fail at [`SessionToken::parse`].
    pub async fn resolve(&self, token: &SessionToken) -> CoreResult<Option<Session>> {
        self.resolve_at(token, Utc::now()).await
    }

    /// [`Self::resolve`] against an explicit clock, for expiry tests.
    pub async fn resolve_at(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> CoreResult<Option<Session>> {
        let session = self
            .store
            .get(token)
            .await
            .map_err(|e| CoreError::storage(e.to_string()))?;

        match session {
            Some(session) if session.is_expired_at(now) => {
                self.store
                    .remove(token)
                    .await
                    .map_err(|e| CoreError::storage(e.to_string()))?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Invalidate a session. Idempotent: invalidating a session that is
    /// already gone succeeds quietly.
    pub async fn invalidate(&self, token: &SessionToken) -> CoreResult<()> {
        self.store
            .remove(token)
            .await
            .map_err(|e| CoreError::storage(e.to_string()))
    }
}
