//! Shared error taxonomy.

use thiserror::Error;

/// Result type used across the core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Failure classes surfaced to callers of the core.
///
/// `Unauthenticated` and `Forbidden` are distinct on purpose: the first
/// means "no acting principal" (remediation: sign in again), the second
/// "principal known but not allowed". Presentation layers may render
/// them identically; internal logic never conflates them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No session, or the session has expired.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The acting principal is not allowed to perform the operation.
    /// Deliberately carries no detail about *why*.
    #[error("forbidden")]
    Forbidden,

    /// A payload failed validation (malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A concurrent write won the race (e.g. compare-and-set mismatch).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist.
    #[error("not found")]
    NotFound,

    /// The persistence collaborator failed. The only class a caller may
    /// reasonably retry with backoff; everything else is terminal for
    /// the request.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether a caller may retry the failed request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
