//! Snapshot wire format
//!
//! A snapshot is a flat list of items, each tagged with a DN and a
//! `config_kind` that selects the payload type:
//!
//! ```json
//! {
//!   "date": "2021-03-01T10:00:00Z",
//!   "items": [
//!     { "dn": "root/ns-[default]", "kind": "ns", "config_kind": "node",
//!       "config": { "kind": "ns", "rn": "ns-[default]" } },
//!     { "dn": "root/ns-[default]", "kind": "ns", "config_kind": "alerts",
//!       "config": [ { "id": "x", "severity": "warn", "msg": "..." } ] }
//!   ]
//! }
//! ```
//!
//! Items with an unrecognized `config_kind` (and legacy `children` items) are
//! dropped while decoding.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::alert::Alert;
use super::configs::{NodeConfig, PropsConfig};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotConfigKind {
    Node,
    Props,
    Alerts,
    /// Legacy: children are always derived from DNs
    Children,
    #[serde(other)]
    Unknown,
}

/// Typed payload of a snapshot item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemConfig {
    Node(NodeConfig),
    Props(PropsConfig),
    Alerts(Vec<Alert>),
}

impl ItemConfig {
    pub fn config_kind(&self) -> SnapshotConfigKind {
        match self {
            ItemConfig::Node(_) => SnapshotConfigKind::Node,
            ItemConfig::Props(_) => SnapshotConfigKind::Props,
            ItemConfig::Alerts(_) => SnapshotConfigKind::Alerts,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotItem {
    pub dn: String,
    /// Kind of the owning node (repeated on every item of that DN)
    pub kind: String,
    pub config: ItemConfig,
}

impl SnapshotItem {
    pub fn node(dn: impl Into<String>, config: NodeConfig) -> Self {
        Self {
            dn: dn.into(),
            kind: config.kind.clone(),
            config: ItemConfig::Node(config),
        }
    }

    pub fn props(dn: impl Into<String>, kind: impl Into<String>, config: PropsConfig) -> Self {
        Self {
            dn: dn.into(),
            kind: kind.into(),
            config: ItemConfig::Props(config),
        }
    }

    pub fn alerts(dn: impl Into<String>, kind: impl Into<String>, alerts: Vec<Alert>) -> Self {
        Self {
            dn: dn.into(),
            kind: kind.into(),
            config: ItemConfig::Alerts(alerts),
        }
    }

    pub fn config_kind(&self) -> SnapshotConfigKind {
        self.config.config_kind()
    }
}

impl Serialize for SnapshotItem {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SnapshotItem", 4)?;
        state.serialize_field("dn", &self.dn)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("config_kind", &self.config_kind())?;
        match &self.config {
            ItemConfig::Node(config) => state.serialize_field("config", config)?,
            ItemConfig::Props(config) => state.serialize_field("config", config)?,
            ItemConfig::Alerts(alerts) => state.serialize_field("config", alerts)?,
        }
        state.end()
    }
}

/// Item as it appears on the wire, before payload decoding
#[derive(Debug, Deserialize)]
struct RawSnapshotItem {
    dn: String,
    #[serde(default)]
    kind: String,
    config_kind: SnapshotConfigKind,
    #[serde(default)]
    config: serde_json::Value,
}

impl RawSnapshotItem {
    fn decode(self) -> std::result::Result<Option<SnapshotItem>, serde_json::Error> {
        let config = match self.config_kind {
            SnapshotConfigKind::Node => ItemConfig::Node(serde_json::from_value(self.config)?),
            SnapshotConfigKind::Props => ItemConfig::Props(serde_json::from_value(self.config)?),
            SnapshotConfigKind::Alerts => {
                ItemConfig::Alerts(serde_json::from_value(self.config)?)
            }
            SnapshotConfigKind::Children | SnapshotConfigKind::Unknown => {
                debug!(dn = %self.dn, config_kind = ?self.config_kind, "Ignoring snapshot item");
                return Ok(None);
            }
        };

        Ok(Some(SnapshotItem {
            dn: self.dn,
            kind: self.kind,
            config,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawItems {
    List(Vec<RawSnapshotItem>),
    /// Items keyed by an arbitrary id; only the values matter
    Map(BTreeMap<String, RawSnapshotItem>),
}

impl Default for RawItems {
    fn default() -> Self {
        RawItems::List(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct RawSnapshotInfo {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    items: RawItems,
}

/// Full snapshot: ingestion timestamp plus the flat item list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshotInfo")]
pub struct SnapshotInfo {
    pub date: DateTime<Utc>,
    pub items: Vec<SnapshotItem>,
}

impl TryFrom<RawSnapshotInfo> for SnapshotInfo {
    type Error = serde_json::Error;

    fn try_from(raw: RawSnapshotInfo) -> std::result::Result<Self, Self::Error> {
        let raw_items: Vec<RawSnapshotItem> = match raw.items {
            RawItems::List(items) => items,
            RawItems::Map(items) => items.into_values().collect(),
        };

        let mut items = Vec::with_capacity(raw_items.len());
        for raw_item in raw_items {
            if let Some(item) = raw_item.decode()? {
                items.push(item);
            }
        }

        Ok(Self {
            date: raw.date.unwrap_or_else(Utc::now),
            items,
        })
    }
}

impl SnapshotInfo {
    pub fn new(items: Vec<SnapshotItem>) -> Self {
        Self {
            date: Utc::now(),
            items,
        }
    }

    pub fn with_date(date: DateTime<Utc>, items: Vec<SnapshotItem>) -> Self {
        Self { date, items }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
