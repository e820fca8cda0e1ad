//! Bottom-up alert aggregation
//!
//! # Algorithm
//! 1. Self pass (done in `RegistryBundleNode::from_view`): count the node's own
//!    `error` / `warn` alerts into both counters and register its alerts under
//!    its own DN
//! 2. Post-order walk from the root DN over the tree index
//! 3. After a node's children are done, fold its cumulative counter and its
//!    hierarchy alerts into the parent that reached it
//!
//! Every alert is therefore counted once at its own node and once at each
//! ancestor reachable from the root. Nodes that are not reachable from the
//! root (missing intermediate DNs) keep their self counts only.
//!
//! The walk uses an explicit stack, so depth is bounded by memory rather than
//! the call stack.

use ahash::AHashMap;
use tracing::{trace, warn};

use super::node::RegistryBundleNode;
use crate::shared::InternedString;
use crate::store::TreeIndex;

struct Frame {
    dn: InternedString,
    parent: Option<InternedString>,
    expanded: bool,
}

/// DNs reachable from `root_dn` in post-order, each paired with the DN that
/// reached it. Children missing from `nodes` are skipped.
fn post_order(
    nodes: &AHashMap<InternedString, RegistryBundleNode>,
    index: &TreeIndex,
    root_dn: &InternedString,
) -> Vec<(InternedString, Option<InternedString>)> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack = vec![Frame {
        dn: root_dn.clone(),
        parent: None,
        expanded: false,
    }];

    while let Some(frame) = stack.pop() {
        if frame.expanded {
            order.push((frame.dn, frame.parent));
            continue;
        }

        let Frame { dn, parent, .. } = frame;
        let children = index.children(&dn);
        stack.push(Frame {
            dn: dn.clone(),
            parent,
            expanded: true,
        });

        // Reversed so siblings complete in DN order
        for child in children.iter().rev() {
            if !nodes.contains_key(child) {
                trace!(dn = %child, parent = %dn, "Skipping unindexed child");
                continue;
            }
            stack.push(Frame {
                dn: child.clone(),
                parent: Some(dn.clone()),
                expanded: false,
            });
        }
    }

    order
}

/// Roll every node's cumulative counters and alerts up to its ancestors.
///
/// Returns the number of nodes visited from the root (0 if the root node is
/// missing).
pub(crate) fn roll_up(
    nodes: &mut AHashMap<InternedString, RegistryBundleNode>,
    index: &TreeIndex,
    root_dn: &InternedString,
) -> usize {
    if !nodes.contains_key(root_dn) {
        warn!(root_dn = %root_dn, "Root node not found, skipping alert aggregation");
        return 0;
    }

    let order = post_order(nodes, index, root_dn);

    for (dn, parent) in &order {
        let Some(parent) = parent else {
            continue;
        };
        let Some(child) = nodes.get(dn) else {
            continue;
        };
        let alert_count = child.alert_count();
        let alerts = child.hierarchy_alerts().clone();

        if let Some(parent_node) = nodes.get_mut(parent) {
            parent_node.absorb(alert_count, &alerts);
        }
    }

    order.len()
}
