use serde::{Deserialize, Serialize};

/// An operation subject to authorization. Closed set; the policy table
/// in [`crate::policy`] is total over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    ViewEquipment,
    CreateEquipment,
    UpdateEquipment,
    DeleteEquipment,
    ManageUsers,
    ManageSets,
    ViewReports,
    /// Read a single equipment item without a session (the QR scan
    /// flow). This is the one deliberate public exception, modeled as
    /// its own action rather than as `ViewEquipment` for an anonymous
    /// caller.
    ScanLookup,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::ViewEquipment,
        Action::CreateEquipment,
        Action::UpdateEquipment,
        Action::DeleteEquipment,
        Action::ManageUsers,
        Action::ManageSets,
        Action::ViewReports,
        Action::ScanLookup,
    ];

    /// Whether the action is reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Action::ScanLookup)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewEquipment => "VIEW_EQUIPMENT",
            Action::CreateEquipment => "CREATE_EQUIPMENT",
            Action::UpdateEquipment => "UPDATE_EQUIPMENT",
            Action::DeleteEquipment => "DELETE_EQUIPMENT",
            Action::ManageUsers => "MANAGE_USERS",
            Action::ManageSets => "MANAGE_SETS",
            Action::ViewReports => "VIEW_REPORTS",
            Action::ScanLookup => "SCAN_LOOKUP",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_lookup_is_the_only_public_action() {
        let public: Vec<Action> = Action::ALL.into_iter().filter(Action::is_public).collect();
        assert_eq!(public, vec![Action::ScanLookup]);
    }
}
