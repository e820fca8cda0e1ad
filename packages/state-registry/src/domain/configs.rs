//! Node and property-set payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Open-ended node category (`ns`, `app`, `launcher`, ...)
pub type NodeKind = String;

/// Property-set id (`labels`, `annotations`, `config`, ...)
pub type PropsId = String;

/// Node record carried by `node` items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub kind: NodeKind,
    pub rn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NodeConfig {
    pub fn new(kind: impl Into<NodeKind>, rn: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            rn: rn.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One property set carried by `props` items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropsConfig {
    pub kind: String,
    pub id: PropsId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl PropsConfig {
    pub fn new(
        kind: impl Into<String>,
        id: impl Into<PropsId>,
        title: impl Into<String>,
        config: serde_json::Value,
    ) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            title: title.into(),
            order: None,
            config,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// Property sets of one DN, keyed by property id
pub type ItemProperties = BTreeMap<PropsId, PropsConfig>;
