//! Registry State - facade over the item store and the tree index
//!
//! ## Lifecycle
//!
//! 1. Ingestion: `add_item` in any order (node items register themselves in
//!    the kind index and under their derived parent in the same call)
//! 2. Queries: lookups, children, kind filters, string-prefix scopes
//! 3. Post-processing: `raise_alert` / `raise_marker` (append-only)
//! 4. `build_bundle`: at most once per state
//!
//! ## Concurrency
//!
//! The state is built by a single writer. It is `Send + Sync`, so once
//! ingestion finishes it can be shared behind `&` or `Arc`; any concurrent
//! ingestion must wrap the whole state in one lock, since node insertion and
//! index registration are two separate table writes.
//!
//! Alerts and markers raised after `build_bundle` stay in the state and are
//! not reflected in the bundle, which is a point-in-time copy.

pub mod accessor;
pub mod node_view;

pub use accessor::RegistryAccessor;
pub use node_view::NodeView;

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info, trace};

use crate::bundle::RegistryBundleState;
use crate::config::RegistryConfig;
use crate::domain::{
    Alert, ItemConfig, ItemProperties, NodeConfig, PropsConfig, SnapshotInfo, SnapshotItem,
};
use crate::error::{RegistryError, Result};
use crate::export::{DebugExporter, ExportSummary};
use crate::shared::{intern, InternedString};
use crate::store::{ItemStore, TreeIndex};
use accessor::EMPTY_PROPERTIES;

#[derive(Debug)]
pub struct RegistryState {
    date: DateTime<Utc>,
    root_dn: InternedString,
    store: ItemStore,
    index: TreeIndex,
    bundled: bool,
}

impl RegistryState {
    /// Build a state from a snapshot with the default configuration
    pub fn new(snapshot: SnapshotInfo) -> Self {
        Self::with_config(snapshot, &RegistryConfig::default())
    }

    pub fn with_config(snapshot: SnapshotInfo, config: &RegistryConfig) -> Self {
        let mut state = Self {
            date: snapshot.date,
            root_dn: intern(&config.root_dn),
            store: ItemStore::new(),
            index: TreeIndex::new(),
            bundled: false,
        };

        let item_count = snapshot.items.len();
        state.add_items(snapshot.items);

        info!(
            items = item_count,
            nodes = state.get_count(),
            date = %state.date,
            "Registry state loaded"
        );
        state
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// DN at which the bundle's bottom-up pass starts
    pub fn root_dn(&self) -> &str {
        &self.root_dn
    }

    pub fn get_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn item_store(&self) -> &ItemStore {
        &self.store
    }

    pub fn tree_index(&self) -> &TreeIndex {
        &self.index
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Ingestion
    // ═══════════════════════════════════════════════════════════════════════

    pub fn add_item(&mut self, item: SnapshotItem) {
        trace!(dn = %item.dn, config_kind = ?item.config_kind(), "Adding item");

        let SnapshotItem { dn, config, .. } = item;
        match config {
            ItemConfig::Node(node) => self.add_tree_node(&dn, node),
            ItemConfig::Props(props) => self.store.upsert_property(&dn, props),
            ItemConfig::Alerts(alerts) => self.store.append_alerts(&dn, alerts),
        }
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = SnapshotItem>) {
        for item in items {
            self.add_item(item);
        }
    }

    fn add_tree_node(&mut self, dn: &str, config: NodeConfig) {
        let kind = config.kind.clone();
        let (key, previous) = self.store.insert_node(dn, config);
        if previous.is_some() {
            debug!(dn = %dn, "Replacing node");
        }
        self.index
            .register_node(&key, &kind, previous.as_ref().map(|p| p.kind.as_str()));
    }

    /// Append an alert to `dn` (the DN does not need a node record)
    pub fn raise_alert(&mut self, dn: &str, alert: Alert) {
        self.store.append_alerts(dn, std::iter::once(alert));
    }

    /// Add a marker to the node at `dn`; unknown DNs are ignored
    pub fn raise_marker(&mut self, dn: &str, name: &str) {
        if !self.store.raise_marker(dn, name) {
            trace!(dn = %dn, marker = %name, "Marker for unknown node ignored");
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    pub fn get_all_properties(&self, dn: &str) -> &ItemProperties {
        self.store.properties(dn).unwrap_or(&EMPTY_PROPERTIES)
    }

    pub fn get_property(&self, dn: &str, id: &str) -> Option<&PropsConfig> {
        self.get_all_properties(dn).get(id)
    }

    pub fn get_alerts(&self, dn: &str) -> &[Alert] {
        self.store.alerts(dn)
    }

    pub fn get_node(&self, dn: &str) -> Option<&NodeConfig> {
        self.store.node(dn).map(|node| &node.config)
    }

    pub fn find_by_dn(&self, dn: &str) -> Option<NodeView<'_>> {
        self.store.node(dn).map(|node| NodeView::new(node, self))
    }

    /// Nodes of `kind` in DN order (kind index lookup, no scan)
    pub fn find_by_kind(&self, kind: &str) -> Vec<NodeView<'_>> {
        self.index
            .dns_of_kind(kind)
            .filter_map(|dn| self.find_by_dn(dn))
            .collect()
    }

    pub fn count_by_kind(&self, kind: &str) -> usize {
        self.index.count_of_kind(kind)
    }

    /// All nodes in DN order
    pub fn get_nodes(&self) -> Vec<NodeView<'_>> {
        self.store
            .nodes()
            .into_iter()
            .map(|node| NodeView::new(node, self))
            .collect()
    }

    /// All node DNs in sorted order
    pub fn get_node_dns(&self) -> Vec<&str> {
        self.store
            .nodes()
            .into_iter()
            .map(|node| node.dn.as_ref())
            .collect()
    }

    /// Direct children of `dn` (empty for leaves and unknown DNs)
    pub fn get_children_dns(&self, dn: &str) -> &[InternedString] {
        self.index.children(dn)
    }

    pub fn children_by_kind(&self, parent_dn: &str, kind: &str) -> Vec<&str> {
        self.index
            .children(parent_dn)
            .iter()
            .filter(|child| {
                self.store
                    .node(child)
                    .map_or(false, |node| node.config.kind == kind)
            })
            .map(|child| child.as_ref())
            .collect()
    }

    /// Nodes of `kind` whose DN starts with `ancestor_dn`.
    ///
    /// String-prefix semantics: `root/ns-[kube]` also matches nodes under
    /// `root/ns-[kube-system]`.
    pub fn scope_by_kind(&self, ancestor_dn: &str, kind: &str) -> Vec<&str> {
        self.index
            .scope_of_kind(ancestor_dn, kind)
            .into_iter()
            .map(|dn| dn.as_ref())
            .collect()
    }

    pub fn count_scope_by_kind(&self, ancestor_dn: &str, kind: &str) -> usize {
        self.index.scope_of_kind(ancestor_dn, kind).len()
    }

    /// Nodes of any kind whose DN starts with `ancestor_dn`
    pub fn scope_flat(&self, ancestor_dn: &str) -> Vec<NodeView<'_>> {
        self.get_nodes()
            .into_iter()
            .filter(|node| node.dn().starts_with(ancestor_dn))
            .collect()
    }

    /// Visit every `(dn, alerts)` sequence in DN order, including DNs that
    /// have no node record
    pub fn post_process_alerts<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &[Alert]),
    {
        for (dn, alerts) in self.store.all_alerts() {
            visitor(dn, alerts);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Snapshot / bundle / export
    // ═══════════════════════════════════════════════════════════════════════

    /// Serialize the state back into the flat item list: per node, one node
    /// item, one props item per property set and one alerts item when the
    /// node has alerts.
    pub fn extract_snapshot_info(&self) -> SnapshotInfo {
        let mut items = Vec::new();

        for node in self.get_nodes() {
            items.push(SnapshotItem::node(node.dn(), node.config().clone()));

            for props in node.properties().values() {
                items.push(SnapshotItem::props(node.dn(), node.kind(), props.clone()));
            }

            let alerts = node.self_alerts();
            if !alerts.is_empty() {
                items.push(SnapshotItem::alerts(node.dn(), node.kind(), alerts.to_vec()));
            }
        }

        SnapshotInfo::with_date(self.date, items)
    }

    /// Produce the bundle for this state.
    ///
    /// # Errors
    ///
    /// `ErrorKind::AlreadyBundled` on every call after the first one.
    pub fn build_bundle(&mut self) -> Result<RegistryBundleState> {
        if self.bundled {
            return Err(RegistryError::already_bundled());
        }
        self.bundled = true;

        Ok(RegistryBundleState::build(self))
    }

    pub fn is_bundled(&self) -> bool {
        self.bundled
    }

    /// Write the debug export tree under `dir`
    pub fn debug_output_to_dir(&self, dir: impl AsRef<Path>, pretty: bool) -> Result<ExportSummary> {
        DebugExporter::new(dir.as_ref(), pretty).export(self)
    }
}

impl RegistryAccessor for RegistryState {
    fn get_node(&self, dn: &str) -> Option<&NodeConfig> {
        RegistryState::get_node(self, dn)
    }

    fn get_all_properties(&self, dn: &str) -> &ItemProperties {
        RegistryState::get_all_properties(self, dn)
    }

    fn children_by_kind(&self, parent_dn: &str, kind: &str) -> Vec<&str> {
        RegistryState::children_by_kind(self, parent_dn, kind)
    }

    fn scope_by_kind(&self, ancestor_dn: &str, kind: &str) -> Vec<&str> {
        RegistryState::scope_by_kind(self, ancestor_dn, kind)
    }
}
