//! Credential verification.
//!
//! Pure with respect to storage: the caller looks the identity up by
//! (normalized) email and hands the result in. A missing identity and a
//! wrong password are indistinguishable to the caller — same error, and
//! the hash comparison runs either way so the two paths cost the same.

use std::sync::OnceLock;

use thiserror::Error;

use crate::identity::{Identity, Principal};
use crate::password::{self, PasswordError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately one variant for
    /// both, so responses cannot be used to probe which emails exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The stored identity record is unusable (corrupt hash).
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Placeholder hash verified against when no identity matched, so the
/// miss path performs the same hashing work as the hit path.
fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| {
        password::hash_password("decoy-password").unwrap_or_else(|_| String::new())
    })
}

/// Verify a password credential against a looked-up identity record.
///
/// On success returns a [`Principal`] snapshot built from the stored
/// record. The raw secret is dropped here and never logged.
pub fn verify_credentials(
    identity: Option<&Identity>,
    password: &str,
) -> Result<Principal, AuthError> {
    match identity {
        Some(identity) => {
            if password::verify_password_hash(password, &identity.password_hash)? {
                Ok(identity.to_principal())
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }
        None => {
            // Burn the same work as a real comparison, then refuse.
            let _ = password::verify_password_hash(password, decoy_hash());
            Err(AuthError::InvalidCredentials)
        }
    }
}
