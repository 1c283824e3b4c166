//! `assetgate-equipment` — the tracked-equipment domain.
//!
//! Pure records and decisions: items, sets, the status lifecycle, and
//! audit entries. Persistence and authorization wiring live elsewhere;
//! the lifecycle engine here only *plans* a transition, the store
//! applies it atomically.

pub mod audit;
pub mod item;
pub mod lifecycle;
pub mod set;

pub use audit::StatusAuditEntry;
pub use item::{EquipmentDraft, EquipmentItem, EquipmentStatus};
pub use lifecycle::{plan_transition, TransitionPlan};
pub use set::{EquipmentSet, SetDraft};
