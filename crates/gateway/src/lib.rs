//! `assetgate-gateway` — the single choke point for every mutation.
//!
//! Every create/update/delete/status-change in the system goes through
//! [`MutationGateway::execute`]: resolve the acting principal (fresh,
//! per call), consult the permission policy, then delegate to the
//! lifecycle engine or plain CRUD on the stores. Read queries and the
//! sign-in/sign-out/registration flows live on the same object so there
//! is exactly one enforcement point.

pub mod gateway;
pub mod queries;
pub mod request;

#[cfg(test)]
mod integration_tests;

pub use gateway::MutationGateway;
pub use queries::{DashboardStats, EquipmentDetail, SetOverview};
pub use request::{MutationOutcome, MutationRequest};
