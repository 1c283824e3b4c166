//! `assetgate-core` — shared foundation for the access-control core.
//!
//! This crate contains **pure** building blocks (ids, the error taxonomy);
//! no storage, transport, or policy logic lives here.

pub mod error;
pub mod id;

pub use error::{CoreError, CoreResult};
pub use id::{AuditEntryId, EquipmentId, SetId, UserId};
