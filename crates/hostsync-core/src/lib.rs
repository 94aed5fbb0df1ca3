// hostsync-core: Keeps a VM's host record in a Tower inventory up to date.

pub mod config;
pub mod error;
pub mod model;
pub mod reconciler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::TowerConfig;
pub use error::CoreError;
pub use model::{
    HostIdentity, HostPayload, InventoryRef, Reconciled, ResourceId, UpsertAction, Vm,
};
pub use reconciler::HostReconciler;
