//! Storage-agnostic persistence traits.
//!
//! Three logical collections (identities, equipment, sets) plus the
//! append-only status audit log, keyed by typed ids. Implementations
//! must provide at least read-committed consistency per record and an
//! atomic compare-and-set for status transitions.

use async_trait::async_trait;
use thiserror::Error;

use assetgate_auth::{Identity, Role};
use assetgate_core::{CoreError, EquipmentId, SetId, UserId};
use assetgate_equipment::{EquipmentItem, EquipmentSet, EquipmentStatus, StatusAuditEntry};

mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::{InMemoryEquipmentStore, InMemoryIdentityStore, InMemorySetStore};

/// Store operation error.
///
/// Infrastructure failures and record-level conflicts; domain
/// validation happens before a record ever reaches a store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// A uniqueness or compare-and-set condition failed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend itself failed (connection, IO, corrupt row).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CoreError::NotFound,
            StoreError::Conflict(msg) => CoreError::Conflict(msg),
            StoreError::Backend(msg) => CoreError::Storage(msg),
        }
    }
}

/// The identity collection. Owns identity records exclusively; everyone
/// else sees snapshots.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a new identity. Fails with `Conflict` when the (already
    /// normalized) email is taken.
    async fn insert(&self, identity: Identity) -> Result<(), StoreError>;

    async fn get(&self, id: UserId) -> Result<Option<Identity>, StoreError>;

    /// Lookup by normalized email (see `assetgate_auth::normalize_email`).
    async fn get_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    /// All identities, newest account first.
    async fn list(&self) -> Result<Vec<Identity>, StoreError>;

    async fn update_role(&self, id: UserId, role: Role) -> Result<Identity, StoreError>;

    async fn delete(&self, id: UserId) -> Result<(), StoreError>;
}

/// The equipment collection, including the status audit log.
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// Insert a new item. Fails with `Conflict` on a duplicate asset tag.
    async fn insert(&self, item: EquipmentItem) -> Result<(), StoreError>;

    async fn get(&self, id: EquipmentId) -> Result<Option<EquipmentItem>, StoreError>;

    /// All items, most recent purchase first.
    async fn list(&self) -> Result<Vec<EquipmentItem>, StoreError>;

    async fn count_by_status(&self, status: EquipmentStatus) -> Result<u64, StoreError>;

    /// Replace an item's non-status fields. The stored status always
    /// wins: plain updates cannot change it (that is what
    /// [`Self::transition_status`] is for).
    async fn update(&self, item: EquipmentItem) -> Result<EquipmentItem, StoreError>;

    async fn delete(&self, id: EquipmentId) -> Result<(), StoreError>;

    /// Atomically set the status to `entry.to_status` *iff* the stored
    /// status still equals `entry.from_status`, appending `entry` to the
    /// audit log in the same atomic step.
    ///
    /// A concurrent transition that got there first surfaces as
    /// `Conflict`; the stored record is left untouched and no audit
    /// entry is written. There is no path on which the status changes
    /// without its entry.
    async fn transition_status(
        &self,
        id: EquipmentId,
        entry: StatusAuditEntry,
    ) -> Result<EquipmentItem, StoreError>;

    /// Audit entries for one item, oldest first.
    async fn history(&self, id: EquipmentId) -> Result<Vec<StatusAuditEntry>, StoreError>;
}

/// The equipment-set collection.
#[async_trait]
pub trait SetStore: Send + Sync {
    async fn insert(&self, set: EquipmentSet) -> Result<(), StoreError>;

    async fn get(&self, id: SetId) -> Result<Option<EquipmentSet>, StoreError>;

    /// All sets, by name.
    async fn list(&self) -> Result<Vec<EquipmentSet>, StoreError>;

    async fn update(&self, set: EquipmentSet) -> Result<EquipmentSet, StoreError>;

    /// Delete a set. Items keep their (now dangling) `set_id`; readers
    /// resolve it to "unknown set".
    async fn delete(&self, id: SetId) -> Result<(), StoreError>;
}
