use assetgate_auth::{Action, Principal, Role};
use assetgate_core::{EquipmentId, SetId, UserId};
use assetgate_equipment::{EquipmentDraft, EquipmentItem, EquipmentSet, EquipmentStatus, SetDraft};

/// A mutation submitted to the gateway. Each variant maps to exactly
/// one [`Action`] for the policy check. Built in process from already
/// deserialized payloads; the drafts inside carry their own `serde`
/// derives.
#[derive(Debug, Clone)]
pub enum MutationRequest {
    CreateEquipment(EquipmentDraft),
    UpdateEquipment {
        id: EquipmentId,
        draft: EquipmentDraft,
    },
    DeleteEquipment {
        id: EquipmentId,
    },
    /// A lifecycle transition; authorization is decided by the
    /// lifecycle engine (no-op first, then policy).
    ChangeEquipmentStatus {
        id: EquipmentId,
        status: EquipmentStatus,
    },
    CreateSet(SetDraft),
    UpdateSet {
        id: SetId,
        draft: SetDraft,
    },
    DeleteSet {
        id: SetId,
    },
    ChangeUserRole {
        user_id: UserId,
        role: Role,
    },
    DeleteUser {
        user_id: UserId,
    },
}

impl MutationRequest {
    /// The action this request is authorized against.
    pub fn action(&self) -> Action {
        match self {
            MutationRequest::CreateEquipment(_) => Action::CreateEquipment,
            MutationRequest::UpdateEquipment { .. } => Action::UpdateEquipment,
            MutationRequest::DeleteEquipment { .. } => Action::DeleteEquipment,
            MutationRequest::ChangeEquipmentStatus { .. } => Action::UpdateEquipment,
            MutationRequest::CreateSet(_) => Action::ManageSets,
            MutationRequest::UpdateSet { .. } => Action::ManageSets,
            MutationRequest::DeleteSet { .. } => Action::ManageSets,
            MutationRequest::ChangeUserRole { .. } => Action::ManageUsers,
            MutationRequest::DeleteUser { .. } => Action::ManageUsers,
        }
    }
}

/// What a successful mutation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Equipment(EquipmentItem),
    Set(EquipmentSet),
    User(Principal),
    Deleted,
}

impl MutationOutcome {
    /// Unwrap an equipment outcome (test support).
    pub fn into_equipment(self) -> Option<EquipmentItem> {
        match self {
            MutationOutcome::Equipment(item) => Some(item),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_mutation_maps_to_a_public_action() {
        let requests = [
            MutationRequest::DeleteEquipment {
                id: EquipmentId::new(),
            },
            MutationRequest::DeleteSet { id: SetId::new() },
            MutationRequest::DeleteUser {
                user_id: UserId::new(),
            },
        ];
        for request in requests {
            assert!(!request.action().is_public());
        }
    }
}
