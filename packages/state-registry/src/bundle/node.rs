//! Enriched node records produced by the bundle pass

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{Alert, AlertCounter, NodeConfig};
use crate::shared::InternedString;
use crate::state::NodeView;

/// Node config plus the counters computed at bundling.
///
/// Serializes flat: the node fields followed by `childrenCount`, `markers`,
/// `selfAlertCount` and `alertCount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundledNodeConfig {
    #[serde(flatten)]
    pub node: NodeConfig,
    pub children_count: usize,
    pub markers: Vec<String>,
    pub self_alert_count: AlertCounter,
    /// Self count plus the counts of every descendant
    pub alert_count: AlertCounter,
}

/// One node of the bundle
#[derive(Debug, Clone)]
pub struct RegistryBundleNode {
    dn: InternedString,
    config: BundledNodeConfig,
    self_alerts: Arc<[Alert]>,
    hierarchy_alerts: BTreeMap<InternedString, Arc<[Alert]>>,
}

impl RegistryBundleNode {
    /// Copy a state node and run the self pass over its own alerts
    pub(crate) fn from_view(view: &NodeView<'_>) -> Self {
        let dn = view.dn_key().clone();

        let mut self_count = AlertCounter::default();
        for alert in view.self_alerts() {
            self_count.record(&alert.severity);
        }

        let self_alerts: Arc<[Alert]> = Arc::from(view.self_alerts());
        let mut hierarchy_alerts = BTreeMap::new();
        if !self_alerts.is_empty() {
            hierarchy_alerts.insert(dn.clone(), Arc::clone(&self_alerts));
        }

        Self {
            dn,
            config: BundledNodeConfig {
                node: view.config().clone(),
                children_count: view.children_count(),
                markers: view.markers().iter().cloned().collect(),
                self_alert_count: self_count,
                alert_count: self_count,
            },
            self_alerts,
            hierarchy_alerts,
        }
    }

    /// Fold a visited child's cumulative data into this node
    pub(crate) fn absorb(
        &mut self,
        alert_count: AlertCounter,
        alerts: &BTreeMap<InternedString, Arc<[Alert]>>,
    ) {
        self.config.alert_count += alert_count;
        for (dn, list) in alerts {
            self.hierarchy_alerts
                .entry(dn.clone())
                .or_insert_with(|| Arc::clone(list));
        }
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    pub(crate) fn dn_key(&self) -> &InternedString {
        &self.dn
    }

    pub fn kind(&self) -> &str {
        &self.config.node.kind
    }

    pub fn config(&self) -> &BundledNodeConfig {
        &self.config
    }

    pub fn self_alerts(&self) -> &[Alert] {
        &self.self_alerts
    }

    pub fn self_alert_count(&self) -> AlertCounter {
        self.config.self_alert_count
    }

    pub fn alert_count(&self) -> AlertCounter {
        self.config.alert_count
    }

    pub fn children_count(&self) -> usize {
        self.config.children_count
    }

    pub fn markers(&self) -> &[String] {
        &self.config.markers
    }

    /// Alerts of this node and of every descendant, keyed by originating DN
    pub fn hierarchy_alerts(&self) -> &BTreeMap<InternedString, Arc<[Alert]>> {
        &self.hierarchy_alerts
    }
}
