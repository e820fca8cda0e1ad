//! Read contract shared by the registry state and the bundle
//!
//! Rule and validator engines depend on this trait only, never on the
//! index layout behind it.

use crate::domain::{ItemProperties, NodeConfig, PropsConfig};

/// Returned by `get_all_properties` for DNs without property sets
pub(crate) static EMPTY_PROPERTIES: ItemProperties = ItemProperties::new();

pub trait RegistryAccessor {
    /// Node record at `dn`
    fn get_node(&self, dn: &str) -> Option<&NodeConfig>;

    /// All property sets of `dn` (empty if none)
    fn get_all_properties(&self, dn: &str) -> &ItemProperties;

    /// One property set of `dn`
    fn get_property(&self, dn: &str, id: &str) -> Option<&PropsConfig> {
        self.get_all_properties(dn).get(id)
    }

    /// Direct children of `parent_dn` whose kind is `kind`
    fn children_by_kind(&self, parent_dn: &str, kind: &str) -> Vec<&str>;

    /// Nodes of `kind` whose DN starts with `ancestor_dn` (string prefix)
    fn scope_by_kind(&self, ancestor_dn: &str, kind: &str) -> Vec<&str>;
}
