//! Identity records and principal snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assetgate_core::{CoreError, UserId};

use crate::Role;

/// A stored identity record, exclusively owned by the identity store.
///
/// # Invariants
/// - `email` is trimmed and lowercased before storage.
/// - `password_hash` is a salted one-way hash (see [`crate::password`]);
///   the raw secret never appears in this type.
/// - `role` changes only through an explicit role-change operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Immutable snapshot used for authorization decisions. Built from
    /// the stored record only, never from client-supplied fields.
    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id,
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// An authenticated identity with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

/// Validated registration input. New accounts always start as `STAFF`;
/// promotion is a separate, admin-only operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    /// Normalize and validate the sign-up payload.
    pub fn validate(self) -> Result<Self, CoreError> {
        let display_name = self.display_name.trim().to_string();
        if display_name.chars().count() < 2 {
            return Err(CoreError::validation(
                "display name must be at least 2 characters",
            ));
        }

        let email = normalize_email(&self.email)?;

        if self.password.chars().count() < 6 {
            return Err(CoreError::validation(
                "password must be at least 6 characters",
            ));
        }

        Ok(Self {
            display_name,
            email,
            password: self.password,
        })
    }
}

/// Trim, lowercase, and sanity-check an email address. Deliberately a
/// shallow check; deliverability is not this layer's problem.
pub fn normalize_email(raw: &str) -> Result<String, CoreError> {
    let email = raw.trim().to_lowercase();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !well_formed {
        return Err(CoreError::validation("invalid email address"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, email: &str, password: &str) -> NewAccount {
        NewAccount {
            display_name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn registration_normalizes_fields() {
        let ok = account("  Alice  ", " Alice@Example.COM ", "secret1")
            .validate()
            .unwrap();
        assert_eq!(ok.display_name, "Alice");
        assert_eq!(ok.email, "alice@example.com");
    }

    #[test]
    fn registration_rejects_bad_input() {
        assert!(account("A", "a@example.com", "secret1").validate().is_err());
        assert!(account("Alice", "not-an-email", "secret1").validate().is_err());
        assert!(account("Alice", "a@nodot", "secret1").validate().is_err());
        assert!(account("Alice", "a@example.com", "short").validate().is_err());
    }

    #[test]
    fn principal_snapshot_mirrors_the_record() {
        let identity = Identity {
            id: UserId::new(),
            display_name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            role: Role::Staff,
            created_at: Utc::now(),
        };
        let principal = identity.to_principal();
        assert_eq!(principal.id, identity.id);
        assert_eq!(principal.role, Role::Staff);
    }
}
