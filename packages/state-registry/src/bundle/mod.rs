//! Registry Bundle - aggregation-enriched copy of a registry state
//!
//! A bundle is produced once per [`RegistryState`] by
//! [`RegistryState::build_bundle`]. It owns copies of the node records, the
//! tree index and the property tables as they were at that instant, so later
//! alerts or markers raised on the state never show up here.
//!
//! Each node carries:
//! - `selfAlertCount`: its own `error` / `warn` alerts
//! - `alertCount`: self count plus every descendant's self count
//! - hierarchy alerts: the alert lists of itself and every descendant, keyed
//!   by originating DN
//!
//! [`RegistryState`]: crate::state::RegistryState
//! [`RegistryState::build_bundle`]: crate::state::RegistryState::build_bundle

mod aggregate;
pub mod node;

pub use node::{BundledNodeConfig, RegistryBundleNode};

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{ItemProperties, NodeConfig};
use crate::shared::InternedString;
use crate::state::accessor::EMPTY_PROPERTIES;
use crate::state::{RegistryAccessor, RegistryState};
use crate::store::TreeIndex;

#[derive(Debug)]
pub struct RegistryBundleState {
    date: DateTime<Utc>,
    root_dn: InternedString,
    nodes: AHashMap<InternedString, RegistryBundleNode>,
    index: TreeIndex,
    properties: AHashMap<InternedString, ItemProperties>,
}

impl RegistryBundleState {
    pub(crate) fn build(state: &RegistryState) -> Self {
        let mut nodes = AHashMap::with_capacity(state.get_count());
        for view in state.get_nodes() {
            let node = RegistryBundleNode::from_view(&view);
            nodes.insert(node.dn_key().clone(), node);
        }

        let root_dn = crate::shared::intern(state.root_dn());
        let visited = aggregate::roll_up(&mut nodes, state.tree_index(), &root_dn);

        let properties = state
            .item_store()
            .all_properties()
            .into_iter()
            .map(|(dn, props)| (dn.clone(), props.clone()))
            .collect();

        let bundle = Self {
            date: state.date(),
            root_dn,
            nodes,
            index: state.tree_index().clone(),
            properties,
        };

        let root_totals = bundle
            .get_node_item(&bundle.root_dn)
            .map(|root| root.alert_count())
            .unwrap_or_default();
        info!(
            nodes = bundle.get_count(),
            visited,
            errors = root_totals.error,
            warnings = root_totals.warn,
            "Registry bundle built"
        );

        bundle
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn root_dn(&self) -> &str {
        &self.root_dn
    }

    pub fn get_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get_node_item(&self, dn: &str) -> Option<&RegistryBundleNode> {
        self.nodes.get(dn)
    }

    /// Enriched config of the node at `dn`
    pub fn get_node(&self, dn: &str) -> Option<&BundledNodeConfig> {
        self.get_node_item(dn).map(|node| node.config())
    }

    /// Enriched configs of the direct children of `parent_dn`, in DN order
    pub fn get_children(&self, parent_dn: &str) -> Vec<&BundledNodeConfig> {
        self.index
            .children(parent_dn)
            .iter()
            .filter_map(|child| self.get_node(child))
            .collect()
    }

    pub fn get_children_dns(&self, parent_dn: &str) -> &[InternedString] {
        self.index.children(parent_dn)
    }

    /// All bundle nodes, sorted by DN
    pub fn node_items(&self) -> Vec<&RegistryBundleNode> {
        let mut items: Vec<_> = self.nodes.values().collect();
        items.sort_by(|a, b| a.dn().cmp(b.dn()));
        items
    }

    pub fn tree_index(&self) -> &TreeIndex {
        &self.index
    }
}

impl RegistryAccessor for RegistryBundleState {
    /// Plain node config (without the bundle counters)
    fn get_node(&self, dn: &str) -> Option<&NodeConfig> {
        self.get_node_item(dn).map(|node| &node.config().node)
    }

    fn get_all_properties(&self, dn: &str) -> &ItemProperties {
        self.properties.get(dn).unwrap_or(&EMPTY_PROPERTIES)
    }

    fn children_by_kind(&self, parent_dn: &str, kind: &str) -> Vec<&str> {
        self.index
            .children(parent_dn)
            .iter()
            .filter(|child| {
                self.get_node_item(child)
                    .map_or(false, |node| node.kind() == kind)
            })
            .map(|child| child.as_ref())
            .collect()
    }

    fn scope_by_kind(&self, ancestor_dn: &str, kind: &str) -> Vec<&str> {
        self.index
            .scope_of_kind(ancestor_dn, kind)
            .into_iter()
            .map(|dn| dn.as_ref())
            .collect()
    }
}
