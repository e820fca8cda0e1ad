//! State Registry - DN-keyed configuration tree with alert aggregation
//!
//! Ingests a flat, order-independent list of snapshot items keyed by DN
//! (`root/ns-[kube-system]/app-[dns]`), indexes them into a tree, and derives
//! a one-shot bundle carrying per-node alert totals rolled up from each
//! subtree.
//!
//! ## Core Principles
//!
//! 1. **Derived tree**: parent/child edges come from the DN string only
//! 2. **Order independence**: any arrival order of the same items yields the
//!    same state
//! 3. **One bundle per state**: a second `build_bundle` is an error
//!
//! ## Usage
//!
//! ```rust,ignore
//! use state_registry::{RegistryState, SnapshotInfo};
//!
//! let snapshot = SnapshotInfo::from_file("snapshot.json")?;
//! let mut state = RegistryState::new(snapshot);
//!
//! // Query
//! let apps = state.scope_by_kind("root/ns-[kube-system]", "app");
//!
//! // Post-process, then bundle once
//! state.raise_marker("root/ns-[kube-system]", "system");
//! let bundle = state.build_bundle()?;
//! let root = bundle.get_node("root").unwrap();
//! println!("errors under root: {}", root.alert_count.error);
//! ```

pub mod bundle;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod shared;
pub mod state;
pub mod store;

pub use error::{ErrorKind, RegistryError, Result};

// Domain re-exports
pub use domain::{
    Alert, AlertCounter, AlertSource, AlertSourceKind, ItemConfig, ItemProperties, NodeConfig,
    PropsConfig, Severity, SnapshotConfigKind, SnapshotInfo, SnapshotItem,
};

pub use bundle::{BundledNodeConfig, RegistryBundleNode, RegistryBundleState};
pub use config::{ConfigError, RegistryConfig};
pub use export::{DebugExporter, ExportSummary};
pub use state::{NodeView, RegistryAccessor, RegistryState};
pub use store::{ItemStore, TreeIndex};
