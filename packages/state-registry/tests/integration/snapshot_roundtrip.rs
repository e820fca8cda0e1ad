//! End-to-end: snapshot file → state → extracted snapshot → state, YAML
//! config, debug export

#[path = "../common/mod.rs"]
mod common;
use common::*;

use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

use serde_json::json;
use state_registry::{
    Alert, AlertSource, AlertSourceKind, ErrorKind, PropsConfig, RegistryAccessor, RegistryConfig,
    RegistryState, Severity, SnapshotInfo, SnapshotItem,
};

fn describe(state: &RegistryState) -> Vec<(String, String, Vec<String>, usize, usize)> {
    state
        .get_nodes()
        .iter()
        .map(|node| {
            (
                node.dn().to_string(),
                node.kind().to_string(),
                state
                    .get_children_dns(node.dn())
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
                node.properties().len(),
                node.self_alerts().len(),
            )
        })
        .collect()
}

#[test]
fn roundtrip_through_json_preserves_state() {
    let original = small_state();
    let json = original.extract_snapshot_info().to_json(true).unwrap();

    let reloaded = RegistryState::new(SnapshotInfo::from_json(&json).unwrap());

    assert_eq!(reloaded.date(), original.date());
    assert_eq!(describe(&reloaded), describe(&original));
    assert_eq!(
        reloaded.get_all_properties(DN_FLUENTD_APP),
        original.get_all_properties(DN_FLUENTD_APP)
    );
    assert_eq!(
        reloaded.get_alerts(DN_WEB_APP),
        original.get_alerts(DN_WEB_APP)
    );
}

#[test]
fn roundtrip_keeps_rule_alerts_and_property_order() {
    let mut original = small_state();
    original.raise_alert(
        DN_DEFAULT,
        Alert::new("no-limits", Severity::Warn, "Containers without limits")
            .with_source(AlertSource::rule("require-limits")),
    );
    original.add_item(SnapshotItem::props(
        DN_DEFAULT,
        "ns",
        PropsConfig::new("key-value", "labels", "Labels", json!({ "team": "web" })).with_order(3),
    ));

    let json = original.extract_snapshot_info().to_json(false).unwrap();
    let reloaded = RegistryState::new(SnapshotInfo::from_json(&json).unwrap());

    let alert = &reloaded.get_alerts(DN_DEFAULT)[0];
    let source = alert.source.as_ref().unwrap();
    assert_eq!(source.kind, Some(AlertSourceKind::Rule));
    assert_eq!(source.id.as_deref(), Some("require-limits"));
    assert_eq!(reloaded.get_alerts(DN_DEFAULT), original.get_alerts(DN_DEFAULT));

    let labels = reloaded.get_property(DN_DEFAULT, "labels").unwrap();
    assert_eq!(labels.order, Some(3));
    assert_eq!(labels.config, json!({ "team": "web" }));
}

#[test]
fn roundtrip_bundles_agree() {
    let mut original = small_state();
    let mut reloaded = RegistryState::new(original.extract_snapshot_info());

    let a = original.build_bundle().unwrap();
    let b = reloaded.build_bundle().unwrap();

    let configs_a: Vec<_> = a.node_items().iter().map(|n| n.config().clone()).collect();
    let configs_b: Vec<_> = b.node_items().iter().map(|n| n.config().clone()).collect();
    assert_eq!(configs_a, configs_b);
}

#[test]
fn snapshot_file_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snapshot.json");
    fs::write(&path, SMALL_SNAPSHOT).unwrap();

    let snapshot = SnapshotInfo::from_file(&path).unwrap();
    assert_eq!(snapshot, load_small_snapshot());

    let err = SnapshotInfo::from_file(tmp.path().join("missing.json")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IO);
}

#[test]
fn config_from_yaml_file_drives_root() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("registry.yaml");
    fs::write(
        &path,
        "version: 1\nroot_dn: root/ns-[kube-system]\ndebug_output:\n  pretty: false\n",
    )
    .unwrap();

    let config = RegistryConfig::from_yaml(path.to_str().unwrap()).unwrap();
    assert_eq!(config.root_dn, DN_KUBE_SYSTEM);
    assert!(!config.debug_output.pretty);

    let mut state = RegistryState::with_config(load_small_snapshot(), &config);
    let bundle = state.build_bundle().unwrap();
    assert_eq!(bundle.root_dn(), DN_KUBE_SYSTEM);
    assert_alert_count(&bundle, DN_KUBE_SYSTEM, 1, 1);
    // not rolled up above the configured root
    assert_alert_count(&bundle, "root", 0, 0);
}

#[test]
fn debug_export_writes_tree() {
    let tmp = TempDir::new().unwrap();
    let state = small_state();

    let summary = state.debug_output_to_dir(tmp.path(), true).unwrap();
    assert_eq!(summary.dns_exported, 8);
    // 8 nodes + 6 parents' children + 2 props + 4 alert files
    assert_eq!(summary.files_written, 20);

    let image_dir = tmp
        .path()
        .join("root/ns-[default]/app-[web]/image-[kubevious_ui]");
    assert!(image_dir.join("node.json").exists());
    assert!(image_dir.join("alerts.json").exists());
    assert!(!image_dir.join("children.json").exists());

    let labels: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(
            tmp.path()
                .join("root/ns-[kube-system]/app-[fluentd-gcp-scaler]/props-labels.json"),
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(labels["config"]["k8s-app"], "fluentd-gcp-scaler");
}

#[test]
fn extracted_snapshot_is_accessor_equivalent() {
    let original = small_state();
    let reloaded = RegistryState::new(original.extract_snapshot_info());

    let a: &dyn RegistryAccessor = &original;
    let b: &dyn RegistryAccessor = &reloaded;
    assert_eq!(a.scope_by_kind("root", "app"), b.scope_by_kind("root", "app"));
    assert_eq!(
        a.children_by_kind(DN_FLUENTD_APP, "launcher"),
        b.children_by_kind(DN_FLUENTD_APP, "launcher")
    );
    assert_eq!(
        a.get_property(DN_WEB_APP, "annotations"),
        b.get_property(DN_WEB_APP, "annotations")
    );
}
