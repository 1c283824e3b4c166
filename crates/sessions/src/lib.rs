//! `assetgate-sessions` — time-bounded, revocable proof of identity.
//!
//! A session ties an opaque, unguessable token to a user id for a fixed
//! TTL. Deliberately *only* the user id: the acting principal's role is
//! re-resolved from the identity store on every request, so a role
//! change or account deletion takes effect immediately instead of
//! lingering in a snapshot until the session expires.
//!
//! The underlying token scheme (server-side table, here) is hidden
//! behind [`SessionManager`]; callers see an opaque [`SessionToken`].

pub mod manager;
pub mod session;
pub mod store;
pub mod token;

pub use manager::{default_ttl, SessionManager};
pub use session::Session;
pub use store::{InMemorySessionStore, SessionStore, SessionStoreError};
pub use token::{SessionToken, TokenParseError};
