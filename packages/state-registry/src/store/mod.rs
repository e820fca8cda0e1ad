//! Ingestion target: the per-DN item tables and the indexes derived from them

pub mod item_store;
pub mod tree_index;

pub use item_store::{ItemStore, RegistryStateNode};
pub use tree_index::TreeIndex;
