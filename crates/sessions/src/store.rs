//! Session persistence boundary.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::{Session, SessionToken};

/// Session store operation error. Infrastructure failures only — "no
/// such session" is an `Ok(None)`, not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("session store backend failure: {0}")]
    Backend(String),
}

/// Storage-agnostic session table.
///
/// Implementations must treat the token as an opaque key and must not
/// log it. Removal is idempotent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError>;

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError>;

    /// Remove a session. Removing a session that is already gone is not
    /// an error.
    async fn remove(&self, token: &SessionToken) -> Result<(), SessionStoreError>;
}

/// In-memory session table for development and tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<HashMap<SessionToken, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| SessionStoreError::Backend("poisoned lock".into()))?;
        map.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError> {
        let map = self
            .inner
            .lock()
            .map_err(|_| SessionStoreError::Backend("poisoned lock".into()))?;
        Ok(map.get(token).cloned())
    }

    async fn remove(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| SessionStoreError::Backend("poisoned lock".into()))?;
        map.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use assetgate_core::UserId;

    use super::*;

    fn session() -> Session {
        let now = Utc::now();
        Session {
            token: SessionToken::generate(),
            user_id: UserId::new(),
            issued_at: now,
            expires_at: now + Duration::days(5),
        }
    }

    #[tokio::test]
    async fn insert_get_remove_round_trip() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.insert(s.clone()).await.unwrap();
        assert_eq!(store.get(&s.token).await.unwrap(), Some(s.clone()));

        store.remove(&s.token).await.unwrap();
        assert_eq!(store.get(&s.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.insert(s.clone()).await.unwrap();
        store.remove(&s.token).await.unwrap();
        store.remove(&s.token).await.unwrap();
        assert_eq!(store.len(), 0);
    }
}
