//! Infrastructure layer: persistence collaborators for identities,
//! equipment, and sets.
//!
//! The traits in [`store`] are the only way the rest of the system
//! touches storage. In-memory implementations back development and
//! tests; a Postgres backend is available behind the `postgres`
//! feature.

pub mod store;

pub use store::{
    EquipmentStore, IdentityStore, InMemoryEquipmentStore, InMemoryIdentityStore, InMemorySetStore,
    SetStore, StoreError,
};

#[cfg(feature = "postgres")]
pub use store::postgres::{PostgresEquipmentStore, PostgresIdentityStore, PostgresSetStore};
