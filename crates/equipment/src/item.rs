use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use assetgate_core::{CoreError, EquipmentId, SetId};

/// Lifecycle status of an equipment item. Closed enumeration.
///
/// The transition graph is deliberately complete (any status to any
/// other, `Lost` included — a lost item can be found again); callers go
/// through [`crate::lifecycle`] so a future version could restrict it
/// in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    #[default]
    Usable,
    Broken,
    Lost,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 3] = [
        EquipmentStatus::Usable,
        EquipmentStatus::Broken,
        EquipmentStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Usable => "USABLE",
            EquipmentStatus::Broken => "BROKEN",
            EquipmentStatus::Lost => "LOST",
        }
    }
}

impl core::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USABLE" => Ok(EquipmentStatus::Usable),
            "BROKEN" => Ok(EquipmentStatus::Broken),
            "LOST" => Ok(EquipmentStatus::Lost),
            other => Err(CoreError::validation(format!("unknown status: {other}"))),
        }
    }
}

/// A tracked equipment item.
///
/// Invariant: `status` is only ever written through a lifecycle
/// transition (see [`crate::lifecycle`]); no plain update path touches
/// it. `set_id` is a weak reference — the set may be renamed or deleted
/// independently, and a dangling reference resolves to "unknown set"
/// rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: EquipmentId,
    /// The externally printed asset tag (on the QR label).
    pub asset_tag: String,
    pub name: String,
    pub model: String,
    pub status: EquipmentStatus,
    pub location: String,
    pub purchase_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub set_id: Option<SetId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated create/update payload for an equipment item. `status` is
/// accepted only at creation time (defaulting to `Usable`); updates
/// cannot smuggle a status change past the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EquipmentDraft {
    pub asset_tag: String,
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub status: EquipmentStatus,
    pub location: String,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub set_id: Option<SetId>,
}

impl EquipmentDraft {
    pub fn validate(self) -> Result<Self, CoreError> {
        let asset_tag = self.asset_tag.trim().to_string();
        if asset_tag.is_empty() {
            return Err(CoreError::validation("asset tag must not be empty"));
        }
        let name = self.name.trim().to_string();
        if name.chars().count() < 2 {
            return Err(CoreError::validation("name must be at least 2 characters"));
        }
        let model = self.model.trim().to_string();
        if model.chars().count() < 2 {
            return Err(CoreError::validation("model must be at least 2 characters"));
        }
        let location = self.location.trim().to_string();
        if location.chars().count() < 2 {
            return Err(CoreError::validation("location must not be empty"));
        }

        Ok(Self {
            asset_tag,
            name,
            model,
            status: self.status,
            location,
            purchase_date: self.purchase_date,
            notes: self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            set_id: self.set_id,
        })
    }

    /// Materialize a new item from a validated draft.
    pub fn into_item(self, id: EquipmentId, now: DateTime<Utc>) -> EquipmentItem {
        EquipmentItem {
            id,
            asset_tag: self.asset_tag,
            name: self.name,
            model: self.model,
            status: self.status,
            location: self.location,
            purchase_date: self.purchase_date,
            notes: self.notes,
            set_id: self.set_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the draft to an existing item, preserving its status and
    /// creation timestamp. Status changes go through the lifecycle
    /// engine only.
    pub fn apply_to(self, item: &EquipmentItem, now: DateTime<Utc>) -> EquipmentItem {
        EquipmentItem {
            id: item.id,
            asset_tag: self.asset_tag,
            name: self.name,
            model: self.model,
            status: item.status,
            location: self.location,
            purchase_date: self.purchase_date,
            notes: self.notes,
            set_id: self.set_id,
            created_at: item.created_at,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EquipmentDraft {
        EquipmentDraft {
            asset_tag: " EQ-0001 ".into(),
            name: "Projector".into(),
            model: "PX-500".into(),
            status: EquipmentStatus::default(),
            location: "Room 204".into(),
            purchase_date: Utc::now(),
            notes: Some("  ".into()),
            set_id: None,
        }
    }

    #[test]
    fn draft_normalizes_and_defaults_status_to_usable() {
        let valid = draft().validate().unwrap();
        assert_eq!(valid.asset_tag, "EQ-0001");
        assert_eq!(valid.status, EquipmentStatus::Usable);
        assert_eq!(valid.notes, None);
    }

    #[test]
    fn draft_rejects_short_fields() {
        let mut bad = draft();
        bad.asset_tag = "  ".into();
        assert!(bad.validate().is_err());

        let mut bad = draft();
        bad.name = "P".into();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn update_never_touches_status_or_created_at() {
        let now = Utc::now();
        let item = draft().validate().unwrap().into_item(EquipmentId::new(), now);
        let mut changed = draft().validate().unwrap();
        changed.status = EquipmentStatus::Lost;
        changed.location = "Storage".into();

        let updated = changed.apply_to(&item, Utc::now());
        assert_eq!(updated.status, EquipmentStatus::Usable);
        assert_eq!(updated.created_at, item.created_at);
        assert_eq!(updated.location, "Storage");
    }

    #[test]
    fn status_round_trips_through_stored_representation() {
        for status in EquipmentStatus::ALL {
            assert_eq!(status.as_str().parse::<EquipmentStatus>().unwrap(), status);
        }
        assert!("FINE".parse::<EquipmentStatus>().is_err());
    }
}
