//! Bundle tests: alert roll-up, single-bundle guard, point-in-time copy

#[path = "../common/mod.rs"]
mod common;
use common::*;

use pretty_assertions::assert_eq;
use serde_json::json;
use state_registry::{
    Alert, ErrorKind, PropsConfig, RegistryAccessor, RegistryState, Severity, SnapshotInfo,
    SnapshotItem,
};

// ═══════════════════════════════════════════════════════════════════════════
// Aggregation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn bundle_single_error_reaches_root() {
    let mut state = RegistryState::new(SnapshotInfo::new(fluentd_error_items()));
    let bundle = state.build_bundle().unwrap();

    assert_self_alert_count(&bundle, DN_FLUENTD_APP, 1, 0);
    assert_alert_count(&bundle, DN_FLUENTD_APP, 1, 0);
    assert_self_alert_count(&bundle, DN_KUBE_SYSTEM, 0, 0);
    assert_alert_count(&bundle, DN_KUBE_SYSTEM, 1, 0);
    assert_self_alert_count(&bundle, "root", 0, 0);
    assert_alert_count(&bundle, "root", 1, 0);
}

#[test]
fn bundle_single_error_reaches_root_in_any_order() {
    let mut items = fluentd_error_items();
    items.reverse();
    let mut state = RegistryState::new(SnapshotInfo::new(items));
    let bundle = state.build_bundle().unwrap();

    assert_alert_count(&bundle, DN_KUBE_SYSTEM, 1, 0);
    assert_alert_count(&bundle, "root", 1, 0);
}

#[test]
fn bundle_fixture_totals() {
    let mut state = small_state();
    let bundle = state.build_bundle().unwrap();

    assert_eq!(bundle.get_count(), 8);
    assert_alert_count(&bundle, "root", 2, 2);
    assert_alert_count(&bundle, DN_KUBE_SYSTEM, 1, 1);
    assert_alert_count(&bundle, DN_DEFAULT, 1, 1);

    // info alerts are registered but not counted
    assert_self_alert_count(&bundle, DN_WEB_APP, 0, 1);
    assert_alert_count(&bundle, DN_WEB_APP, 1, 1);
    assert_eq!(bundle.get_node_item(DN_WEB_APP).unwrap().self_alerts().len(), 2);

    assert_cumulative_law(&bundle);
}

#[test]
fn bundle_hierarchy_alerts_collect_descendants() {
    let mut state = small_state();
    let bundle = state.build_bundle().unwrap();

    let root = bundle.get_node_item("root").unwrap();
    let origins: Vec<&str> = root
        .hierarchy_alerts()
        .keys()
        .map(|dn| dn.as_ref())
        .collect();
    assert_eq!(
        origins,
        vec![DN_WEB_APP, DN_WEB_IMAGE, DN_FLUENTD_APP, DN_FLUENTD_REPLICASET]
    );

    let launcher = bundle.get_node_item(DN_FLUENTD_LAUNCHER).unwrap();
    assert_eq!(launcher.hierarchy_alerts().len(), 1);
    assert_eq!(
        launcher.hierarchy_alerts()[DN_FLUENTD_REPLICASET][0].id,
        "replicas-mismatch"
    );

    let image = bundle.get_node_item(DN_WEB_IMAGE).unwrap();
    assert!(image.hierarchy_alerts().contains_key(DN_WEB_IMAGE));
    assert_eq!(image.hierarchy_alerts().len(), 1);
}

#[test]
fn bundle_node_config_json() {
    let mut state = small_state();
    state.raise_marker(DN_KUBE_SYSTEM, "system");
    let bundle = state.build_bundle().unwrap();

    let ns = bundle.get_node(DN_KUBE_SYSTEM).unwrap();
    assert_eq!(
        serde_json::to_value(ns).unwrap(),
        json!({
            "kind": "ns",
            "rn": "ns-[kube-system]",
            "name": "kube-system",
            "childrenCount": 1,
            "markers": ["system"],
            "selfAlertCount": { "error": 0, "warn": 0 },
            "alertCount": { "error": 1, "warn": 1 }
        })
    );
}

#[test]
fn bundle_children_are_enriched() {
    let mut state = small_state();
    let bundle = state.build_bundle().unwrap();

    let children = bundle.get_children("root");
    let names: Vec<Option<&str>> = children.iter().map(|c| c.node.name.as_deref()).collect();
    assert_eq!(names, vec![Some("default"), Some("kube-system")]);
    assert!(children.iter().all(|c| c.alert_count.error == 1));
    assert!(bundle.get_children(DN_WEB_IMAGE).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Lifecycle
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn bundle_second_build_fails() {
    let mut state = small_state();
    let first = state.build_bundle();
    assert!(first.is_ok());

    let err = state.build_bundle().unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyBundled);
    assert_eq!(
        err.to_string(),
        "[already_bundled] Registry state is already bundled"
    );

    // still refused on later attempts
    assert!(state.build_bundle().is_err());
}

#[test]
fn bundle_ignores_later_mutation() {
    let mut state = small_state();
    let bundle = state.build_bundle().unwrap();

    state.raise_alert(DN_DEFAULT, Alert::new("late", Severity::Error, "after bundling"));
    state.raise_marker(DN_DEFAULT, "late");
    state.add_item(SnapshotItem::props(
        DN_DEFAULT,
        "ns",
        PropsConfig::new("key-value", "labels", "Labels", json!({ "late": "yes" })),
    ));

    assert_alert_count(&bundle, DN_DEFAULT, 1, 1);
    assert!(bundle.get_node(DN_DEFAULT).unwrap().markers.is_empty());
    assert!(bundle.get_all_properties(DN_DEFAULT).is_empty());

    assert_eq!(state.get_alerts(DN_DEFAULT).len(), 1);
    assert!(state.get_property(DN_DEFAULT, "labels").is_some());
}

#[test]
fn bundle_accessor_matches_state() {
    let mut state = small_state();
    let bundle = state.build_bundle().unwrap();

    let accessors: [&dyn RegistryAccessor; 2] = [&state, &bundle];
    for accessor in accessors {
        assert_eq!(accessor.get_node(DN_WEB_APP).unwrap().kind, "app");
        assert_eq!(
            accessor.get_property(DN_FLUENTD_APP, "labels").unwrap().title,
            "Labels"
        );
        assert_eq!(accessor.children_by_kind("root", "ns").len(), 2);
        assert_eq!(
            accessor.scope_by_kind("root", "app"),
            vec![DN_WEB_APP, DN_FLUENTD_APP]
        );
    }
}

#[test]
fn bundle_without_root_keeps_self_counts() {
    let mut state = SnapshotBuilder::new()
        .node("root/ns-[a]", "ns")
        .node("root/ns-[a]/app-[x]", "app")
        .alert("root/ns-[a]/app-[x]", "e1", Severity::Error)
        .build_state();
    let bundle = state.build_bundle().unwrap();

    assert_alert_count(&bundle, "root/ns-[a]/app-[x]", 1, 0);
    assert_alert_count(&bundle, "root/ns-[a]", 0, 0);
}
