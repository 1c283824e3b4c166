use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assetgate_core::{AuditEntryId, EquipmentId, UserId};

use crate::EquipmentStatus;

/// One status change, recorded append-only.
///
/// Written atomically with the status itself: a transition that cannot
/// record its entry does not happen, so the lifecycle history of every
/// item is reconstructable from these entries alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAuditEntry {
    pub id: AuditEntryId,
    pub equipment_id: EquipmentId,
    pub from_status: EquipmentStatus,
    pub to_status: EquipmentStatus,
    /// The principal that performed the transition.
    pub changed_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

impl StatusAuditEntry {
    pub fn record(
        equipment_id: EquipmentId,
        from_status: EquipmentStatus,
        to_status: EquipmentStatus,
        changed_by: UserId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            equipment_id,
            from_status,
            to_status,
            changed_by,
            occurred_at,
        }
    }
}
