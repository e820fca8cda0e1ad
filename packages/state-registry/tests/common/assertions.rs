//! Custom assertions for registry and bundle verification

use state_registry::{AlertCounter, RegistryBundleState, RegistryState};

/// Assert the cumulative counter of the bundle node at `dn`
pub fn assert_alert_count(bundle: &RegistryBundleState, dn: &str, error: u32, warn: u32) {
    let node = bundle
        .get_node(dn)
        .unwrap_or_else(|| panic!("Expected bundle node at '{dn}'"));
    assert_eq!(
        node.alert_count,
        AlertCounter::new(error, warn),
        "Unexpected alertCount at '{dn}'"
    );
}

/// Assert the self counter of the bundle node at `dn`
pub fn assert_self_alert_count(bundle: &RegistryBundleState, dn: &str, error: u32, warn: u32) {
    let node = bundle
        .get_node(dn)
        .unwrap_or_else(|| panic!("Expected bundle node at '{dn}'"));
    assert_eq!(
        node.self_alert_count,
        AlertCounter::new(error, warn),
        "Unexpected selfAlertCount at '{dn}'"
    );
}

/// Assert the direct children DNs of `dn`, in order
pub fn assert_children(state: &RegistryState, dn: &str, expected: &[&str]) {
    let children: Vec<&str> = state
        .get_children_dns(dn)
        .iter()
        .map(|child| child.as_ref())
        .collect();
    assert_eq!(children, expected, "Unexpected children of '{dn}'");
}

/// Sum of self counters over `dn` and every node below it in the tree
pub fn subtree_self_total(bundle: &RegistryBundleState, dn: &str) -> AlertCounter {
    let mut total = AlertCounter::default();
    let mut stack = vec![dn.to_string()];
    while let Some(current) = stack.pop() {
        if let Some(node) = bundle.get_node(&current) {
            total += node.self_alert_count;
        }
        stack.extend(
            bundle
                .get_children_dns(&current)
                .iter()
                .map(|child| child.to_string()),
        );
    }
    total
}

/// Assert that every node reachable from the bundle root carries the sum of
/// the self counters of its subtree
pub fn assert_cumulative_law(bundle: &RegistryBundleState) {
    let mut stack = vec![bundle.root_dn().to_string()];
    while let Some(dn) = stack.pop() {
        let Some(node) = bundle.get_node(&dn) else {
            continue;
        };
        assert_eq!(
            node.alert_count,
            subtree_self_total(bundle, &dn),
            "Cumulative count mismatch at '{dn}'"
        );
        stack.extend(
            bundle
                .get_children_dns(&dn)
                .iter()
                .map(|child| child.to_string()),
        );
    }
}
