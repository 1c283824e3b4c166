//! Status lifecycle engine.
//!
//! Decides whether a requested status change may happen. Pure:
//! - No IO
//! - No panics
//! - No clock
//!
//! The resulting [`TransitionPlan`] is applied by the equipment store as
//! an atomic compare-and-set on the `from` status, with the audit entry
//! written in the same step. A plan is therefore a *promise to attempt*,
//! not a guarantee — a concurrent transition may still win the race at
//! the store, which surfaces as a conflict rather than an overwrite.

use assetgate_auth::{policy, Action, Role};
use assetgate_core::{CoreError, CoreResult};

use crate::{EquipmentItem, EquipmentStatus};

/// Outcome of planning a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Requested status equals the current one: nothing to write, no
    /// audit entry, and no permission consumed.
    NoOp,
    /// Write `to` expecting the stored status to still be `from`.
    Apply {
        from: EquipmentStatus,
        to: EquipmentStatus,
    },
}

/// Plan a status transition for `item` on behalf of a principal with
/// `role` (`None` for a caller with no resolvable role).
///
/// The no-op check comes first: re-submitting the current status is
/// idempotent for *any* caller, because a transition that changes
/// nothing uses no permission. Only a real change consults the policy,
/// fail-closed. The transition graph itself is complete — any status
/// may move to any other, including `Lost` back to `Usable`.
pub fn plan_transition(
    item: &EquipmentItem,
    requested: EquipmentStatus,
    role: Option<Role>,
) -> CoreResult<TransitionPlan> {
    if requested == item.status {
        return Ok(TransitionPlan::NoOp);
    }

    if !policy::role_allows(role, Action::UpdateEquipment) {
        return Err(CoreError::Forbidden);
    }

    Ok(TransitionPlan::Apply {
        from: item.status,
        to: requested,
    })
}
