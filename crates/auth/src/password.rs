//! Password hashing (Argon2id, salted).
//!
//! Raw secrets pass through this module and nowhere else; they are never
//! stored, returned, or logged.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The stored hash string could not be parsed. Indicates a corrupt
    /// identity record, not a bad credential.
    #[error("malformed password hash")]
    MalformedHash,

    /// Hashing itself failed (parameter or backend error).
    #[error("password hashing failed")]
    HashingFailed,
}

/// Hash a password with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash string.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is
/// unusable. The comparison runs inside the Argon2 backend.
pub fn verify_password_hash(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::MalformedHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
