//! Domain models: snapshot wire format and per-node payloads
//!
//! - `NodeConfig`: the node record (`kind`, `rn`, optional `name`)
//! - `PropsConfig`: one property set, keyed by its own `id`
//! - `Alert` / `AlertCounter`: alerts and error/warn tallies
//! - `SnapshotInfo` / `SnapshotItem`: the flat, order-independent item list

pub mod alert;
pub mod configs;
pub mod snapshot;

pub use alert::{Alert, AlertCounter, AlertSource, AlertSourceKind, Severity};
pub use configs::{ItemProperties, NodeConfig, NodeKind, PropsConfig, PropsId};
pub use snapshot::{ItemConfig, SnapshotConfigKind, SnapshotInfo, SnapshotItem};
