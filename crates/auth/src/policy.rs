//! Role → action permission policy.
//!
//! A static table over two closed enumerations. Pure:
//! - No IO
//! - No panics
//! - No business logic beyond the table itself
//!
//! Anything not explicitly granted is denied (fail-closed).

use crate::{Action, Role};

const ADMIN_ACTIONS: &[Action] = &[
    Action::ViewEquipment,
    Action::CreateEquipment,
    Action::UpdateEquipment,
    Action::DeleteEquipment,
    Action::ManageUsers,
    Action::ManageSets,
    Action::ViewReports,
    Action::ScanLookup,
];

const STAFF_ACTIONS: &[Action] = &[
    Action::ViewEquipment,
    Action::CreateEquipment,
    Action::UpdateEquipment,
    Action::ManageSets,
    Action::ViewReports,
    Action::ScanLookup,
];

/// The actions granted to a role.
pub fn allowed_actions(role: Role) -> &'static [Action] {
    match role {
        Role::Admin => ADMIN_ACTIONS,
        Role::Staff => STAFF_ACTIONS,
    }
}

/// Whether `role` may perform `action`. Total and deterministic.
pub fn is_allowed(role: Role, action: Action) -> bool {
    allowed_actions(role).contains(&action)
}

/// Fail-closed check for callers that may not have a role at all
/// (unauthenticated, or a record with no resolvable role).
pub fn role_allows(role: Option<Role>, action: Action) -> bool {
    match role {
        Some(role) => is_allowed(role, action),
        None => false,
    }
}
