//! `assetgate-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows
//! roles, actions, the permission table, identity records, and how to
//! verify a password against a stored hash. Looking identities up and
//! carrying sessions around is someone else's job.

pub mod action;
pub mod identity;
pub mod password;
pub mod policy;
pub mod role;
pub mod verify;

pub use action::Action;
pub use identity::{normalize_email, Identity, NewAccount, Principal};
pub use password::{hash_password, verify_password_hash, PasswordError};
pub use policy::{allowed_actions, is_allowed, role_allows};
pub use role::Role;
pub use verify::{verify_credentials, AuthError};
