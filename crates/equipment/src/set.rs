use serde::{Deserialize, Serialize};

use assetgate_core::{CoreError, SetId};

/// A named group of equipment items sharing a location.
///
/// Items point at a set via their `set_id`; the reference is weak, so
/// deleting a set never touches its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSet {
    pub id: SetId,
    pub name: String,
    pub location: String,
}

/// Display name used when an item's `set_id` no longer resolves.
pub const UNKNOWN_SET_NAME: &str = "unknown set";

/// Validated create/update payload for a set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetDraft {
    pub name: String,
    pub location: String,
}

impl SetDraft {
    pub fn validate(self) -> Result<Self, CoreError> {
        let name = self.name.trim().to_string();
        if name.chars().count() < 2 {
            return Err(CoreError::validation("name must be at least 2 characters"));
        }
        let location = self.location.trim().to_string();
        if location.chars().count() < 2 {
            return Err(CoreError::validation("location must not be empty"));
        }
        Ok(Self { name, location })
    }

    pub fn into_set(self, id: SetId) -> EquipmentSet {
        EquipmentSet {
            id,
            name: self.name,
            location: self.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_and_validates() {
        let set = SetDraft {
            name: "  Lecture Hall Kit ".into(),
            location: " Building A ".into(),
        }
        .validate()
        .unwrap()
        .into_set(SetId::new());
        assert_eq!(set.name, "Lecture Hall Kit");
        assert_eq!(set.location, "Building A");
    }

    #[test]
    fn draft_rejects_short_names() {
        let bad = SetDraft {
            name: "x".into(),
            location: "Building A".into(),
        };
        assert!(bad.validate().is_err());
    }
}
