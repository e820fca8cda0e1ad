//! Debug export: dump a registry state as a directory tree
//!
//! Layout (one directory per DN, path-unsafe characters replaced by `_`):
//! - `{dir}/{dn}/node.json`: node config
//! - `{dir}/{dn}/children.json`: direct child DNs (parents only)
//! - `{dir}/{dn}/props-{id}.json`: one file per property set
//! - `{dir}/{dn}/alerts.json`: alerts (only when non-empty)
//!
//! DNs without a node record are exported too: parents derived from a child
//! DN get `children.json`, DNs that only carry property sets or alerts get
//! those files. Every path stays below `{dir}`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{RegistryError, Result};
use crate::shared::dn::{dn_path_segments, sanitize_dn_path};
use crate::shared::InternedString;
use crate::state::RegistryState;

/// Totals of one export run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub dns_exported: usize,
    pub files_written: usize,
}

#[derive(Debug, Clone)]
pub struct DebugExporter {
    dir: PathBuf,
    pretty: bool,
}

impl DebugExporter {
    pub fn new(dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            dir: dir.into(),
            pretty,
        }
    }

    pub fn export(&self, state: &RegistryState) -> Result<ExportSummary> {
        let store = state.item_store();
        let parents: BTreeMap<&str, &[InternedString]> = state
            .tree_index()
            .parents()
            .into_iter()
            .map(|(parent, children)| (parent.as_ref(), children))
            .collect();

        let mut dns: BTreeSet<&str> = BTreeSet::new();
        dns.extend(state.get_node_dns());
        dns.extend(parents.keys().copied());
        dns.extend(store.all_properties().into_iter().map(|(dn, _)| dn.as_ref()));
        dns.extend(store.all_alerts().into_iter().map(|(dn, _)| dn.as_ref()));

        let mut summary = ExportSummary::default();

        for dn in dns {
            let node_dir = self.node_dir(dn);
            fs::create_dir_all(&node_dir).map_err(|e| {
                RegistryError::io(format!(
                    "Failed to create directory {}: {}",
                    node_dir.display(),
                    e
                ))
                .with_source(e)
            })?;

            if let Some(node) = state.get_node(dn) {
                self.write_json(&node_dir.join("node.json"), node)?;
                summary.files_written += 1;
            }

            if let Some(children) = parents.get(dn) {
                let children: Vec<&str> = children.iter().map(|child| child.as_ref()).collect();
                self.write_json(&node_dir.join("children.json"), &children)?;
                summary.files_written += 1;
            }

            for (id, props) in state.get_all_properties(dn) {
                let file_name = format!("props-{}.json", sanitize_dn_path(id).replace('/', "_"));
                self.write_json(&node_dir.join(file_name), props)?;
                summary.files_written += 1;
            }

            let alerts = state.get_alerts(dn);
            if !alerts.is_empty() {
                self.write_json(&node_dir.join("alerts.json"), alerts)?;
                summary.files_written += 1;
            }

            debug!(dn = %dn, dir = %node_dir.display(), "Exported DN");
            summary.dns_exported += 1;
        }

        info!(
            dir = %self.dir.display(),
            dns = summary.dns_exported,
            files = summary.files_written,
            "Debug export complete"
        );

        Ok(summary)
    }

    fn node_dir(&self, dn: &str) -> PathBuf {
        let mut path = self.dir.clone();
        path.extend(dn_path_segments(dn));
        path
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let content = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        fs::write(path, content).map_err(|e| {
            RegistryError::io(format!("Failed to write {}: {}", path.display(), e)).with_source(e)
        })
    }
}
