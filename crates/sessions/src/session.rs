use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assetgate_core::UserId;

use crate::SessionToken;

/// A stored session record.
///
/// Invariant: `user_id` referenced an existing identity at issuance
/// time. The record does not snapshot the role; resolution re-reads the
/// identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn expiry_boundary_is_exclusive_of_the_last_instant() {
        let issued = Utc::now();
        let session = Session {
            token: SessionToken::generate(),
            user_id: UserId::new(),
            issued_at: issued,
            expires_at: issued + Duration::days(5),
        };
        assert!(!session.is_expired_at(issued));
        assert!(!session.is_expired_at(issued + Duration::days(5) - Duration::seconds(1)));
        assert!(session.is_expired_at(issued + Duration::days(5)));
    }
}
