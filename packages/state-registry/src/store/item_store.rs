// Item Store - per-DN tables for nodes, property sets and alerts
//
// Property sets and alert lists are keyed by DN independently of the node
// table: a `props` or `alerts` item may arrive before its `node` item, and
// the node picks them up by DN once it is inserted.

use ahash::AHashMap;
use std::collections::BTreeSet;

use crate::domain::{Alert, ItemProperties, NodeConfig, PropsConfig};
use crate::shared::{intern, InternedString};

/// Node record owned by the item store
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryStateNode {
    pub dn: InternedString,
    pub config: NodeConfig,
    pub markers: BTreeSet<String>,
}

impl RegistryStateNode {
    fn new(dn: InternedString, config: NodeConfig) -> Self {
        Self {
            dn,
            config,
            markers: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    nodes: AHashMap<InternedString, RegistryStateNode>,
    properties: AHashMap<InternedString, ItemProperties>,
    alerts: AHashMap<InternedString, Vec<Alert>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the node at `dn`.
    ///
    /// Returns the interned DN and the config of the replaced record. Markers
    /// raised on a replaced record are carried over.
    pub fn insert_node(
        &mut self,
        dn: &str,
        config: NodeConfig,
    ) -> (InternedString, Option<NodeConfig>) {
        match self.nodes.get_mut(dn) {
            Some(existing) => {
                let previous = std::mem::replace(&mut existing.config, config);
                (existing.dn.clone(), Some(previous))
            }
            None => {
                let key = intern(dn);
                self.nodes
                    .insert(key.clone(), RegistryStateNode::new(key.clone(), config));
                (key, None)
            }
        }
    }

    /// Upsert one property set; the last write for a given id wins
    pub fn upsert_property(&mut self, dn: &str, props: PropsConfig) {
        self.fetch_properties(dn).insert(props.id.clone(), props);
    }

    /// Append alerts to the DN's sequence, preserving arrival order
    pub fn append_alerts(&mut self, dn: &str, alerts: impl IntoIterator<Item = Alert>) {
        self.fetch_alerts(dn).extend(alerts);
    }

    /// Add a marker to an existing node. Returns false if the DN is unknown.
    pub fn raise_marker(&mut self, dn: &str, name: &str) -> bool {
        match self.nodes.get_mut(dn) {
            Some(node) => {
                node.markers.insert(name.to_string());
                true
            }
            None => false,
        }
    }

    fn fetch_properties(&mut self, dn: &str) -> &mut ItemProperties {
        self.properties.entry(intern(dn)).or_default()
    }

    fn fetch_alerts(&mut self, dn: &str) -> &mut Vec<Alert> {
        self.alerts.entry(intern(dn)).or_insert_with(Vec::new)
    }

    pub fn node(&self, dn: &str) -> Option<&RegistryStateNode> {
        self.nodes.get(dn)
    }

    pub fn contains_node(&self, dn: &str) -> bool {
        self.nodes.contains_key(dn)
    }

    pub fn properties(&self, dn: &str) -> Option<&ItemProperties> {
        self.properties.get(dn)
    }

    pub fn alerts(&self, dn: &str) -> &[Alert] {
        self.alerts.get(dn).map(|v| v.as_slice()).unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes, sorted by DN
    pub fn nodes(&self) -> Vec<&RegistryStateNode> {
        let mut nodes: Vec<_> = self.nodes.values().collect();
        nodes.sort_by(|a, b| a.dn.cmp(&b.dn));
        nodes
    }

    /// Every materialized property table, sorted by DN (includes DNs
    /// without a node record)
    pub fn all_properties(&self) -> Vec<(&InternedString, &ItemProperties)> {
        let mut entries: Vec<_> = self.properties.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Every materialized alert sequence, sorted by DN (includes DNs
    /// without a node record)
    pub fn all_alerts(&self) -> Vec<(&InternedString, &[Alert])> {
        let mut entries: Vec<_> = self
            .alerts
            .iter()
            .map(|(dn, alerts)| (dn, alerts.as_slice()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
