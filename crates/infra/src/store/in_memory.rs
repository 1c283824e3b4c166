//! In-memory stores for development and tests.
//!
//! Each store is a mutex-guarded map; the equipment store keeps items
//! and the audit log under one lock so the compare-and-set transition
//! and its audit append are a single atomic step.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use assetgate_auth::{Identity, Role};
use assetgate_core::{EquipmentId, SetId, UserId};
use assetgate_equipment::{EquipmentItem, EquipmentSet, EquipmentStatus, StatusAuditEntry};

use super::{EquipmentStore, IdentityStore, SetStore, StoreError};

fn poisoned() -> StoreError {
    StoreError::Backend("poisoned lock".into())
}

// ─────────────────────────────────────────────────────────────────────────────
// Identities
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: Mutex<HashMap<UserId, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn insert(&self, identity: Identity) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| poisoned())?;
        if map.values().any(|i| i.email == identity.email) {
            return Err(StoreError::Conflict(format!(
                "email already registered: {}",
                identity.email
            )));
        }
        map.insert(identity.id, identity);
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let map = self.inner.lock().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let map = self.inner.lock().map_err(|_| poisoned())?;
        Ok(map.values().find(|i| i.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<Identity>, StoreError> {
        let map = self.inner.lock().map_err(|_| poisoned())?;
        let mut identities: Vec<Identity> = map.values().cloned().collect();
        identities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(identities)
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<Identity, StoreError> {
        let mut map = self.inner.lock().map_err(|_| poisoned())?;
        let identity = map.get_mut(&id).ok_or(StoreError::NotFound)?;
        identity.role = role;
        Ok(identity.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Equipment (+ audit log)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct EquipmentState {
    items: HashMap<EquipmentId, EquipmentItem>,
    audit: Vec<StatusAuditEntry>,
}

#[derive(Debug, Default)]
pub struct InMemoryEquipmentStore {
    inner: Mutex<EquipmentState>,
}

impl InMemoryEquipmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of audit entries across all items (test support).
    pub fn audit_len(&self) -> usize {
        self.inner.lock().map(|s| s.audit.len()).unwrap_or(0)
    }
}

#[async_trait]
impl EquipmentStore for InMemoryEquipmentStore {
    async fn insert(&self, item: EquipmentItem) -> Result<(), StoreError> {
        let mut state = self.inner.lock().map_err(|_| poisoned())?;
        if state.items.values().any(|i| i.asset_tag == item.asset_tag) {
            return Err(StoreError::Conflict(format!(
                "asset tag already in use: {}",
                item.asset_tag
            )));
        }
        state.items.insert(item.id, item);
        Ok(())
    }

    async fn get(&self, id: EquipmentId) -> Result<Option<EquipmentItem>, StoreError> {
        let state = self.inner.lock().map_err(|_| poisoned())?;
        Ok(state.items.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<EquipmentItem>, StoreError> {
        let state = self.inner.lock().map_err(|_| poisoned())?;
        let mut items: Vec<EquipmentItem> = state.items.values().cloned().collect();
        items.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(items)
    }

    async fn count_by_status(&self, status: EquipmentStatus) -> Result<u64, StoreError> {
        let state = self.inner.lock().map_err(|_| poisoned())?;
        Ok(state.items.values().filter(|i| i.status == status).count() as u64)
    }

    async fn update(&self, item: EquipmentItem) -> Result<EquipmentItem, StoreError> {
        let mut state = self.inner.lock().map_err(|_| poisoned())?;
        // Same uniqueness rule as insert; the Postgres backend gets
        // this from its UNIQUE constraint.
        if state
            .items
            .values()
            .any(|i| i.id != item.id && i.asset_tag == item.asset_tag)
        {
            return Err(StoreError::Conflict(format!(
                "asset tag already in use: {}",
                item.asset_tag
            )));
        }
        let stored = state.items.get_mut(&item.id).ok_or(StoreError::NotFound)?;
        // Stored status wins; plain updates never touch it.
        let merged = EquipmentItem {
            status: stored.status,
            ..item
        };
        *stored = merged.clone();
        Ok(merged)
    }

    async fn delete(&self, id: EquipmentId) -> Result<(), StoreError> {
        let mut state = self.inner.lock().map_err(|_| poisoned())?;
        state.items.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn transition_status(
        &self,
        id: EquipmentId,
        entry: StatusAuditEntry,
    ) -> Result<EquipmentItem, StoreError> {
        let mut state = self.inner.lock().map_err(|_| poisoned())?;
        let stored = state.items.get_mut(&id).ok_or(StoreError::NotFound)?;

        if stored.status != entry.from_status {
            return Err(StoreError::Conflict(format!(
                "status changed concurrently: expected {}, found {}",
                entry.from_status, stored.status
            )));
        }

        stored.status = entry.to_status;
        stored.updated_at = entry.occurred_at;
        let updated = stored.clone();
        state.audit.push(entry);
        Ok(updated)
    }

    async fn history(&self, id: EquipmentId) -> Result<Vec<StatusAuditEntry>, StoreError> {
        let state = self.inner.lock().map_err(|_| poisoned())?;
        Ok(state
            .audit
            .iter()
            .filter(|e| e.equipment_id == id)
            .cloned()
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sets
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemorySetStore {
    inner: Mutex<HashMap<SetId, EquipmentSet>>,
}

impl InMemorySetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SetStore for InMemorySetStore {
    async fn insert(&self, set: EquipmentSet) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| poisoned())?;
        map.insert(set.id, set);
        Ok(())
    }

    async fn get(&self, id: SetId) -> Result<Option<EquipmentSet>, StoreError> {
        let map = self.inner.lock().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<EquipmentSet>, StoreError> {
        let map = self.inner.lock().map_err(|_| poisoned())?;
        let mut sets: Vec<EquipmentSet> = map.values().cloned().collect();
        sets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sets)
    }

    async fn update(&self, set: EquipmentSet) -> Result<EquipmentSet, StoreError> {
        let mut map = self.inner.lock().map_err(|_| poisoned())?;
        let stored = map.get_mut(&set.id).ok_or(StoreError::NotFound)?;
        *stored = set.clone();
        Ok(set)
    }

    async fn delete(&self, id: SetId) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
