// Tree Index - derived adjacency and kind indexes
//
// Parent/child edges are never stored on the nodes themselves: each node's
// parent is derived from its DN, and the edge is recorded here as
// parent DN → child DNs. Both indexes hold interned keys only; the node
// records live in the ItemStore.

use ahash::AHashMap;
use std::collections::BTreeSet;

use crate::shared::dn::parent_dn;
use crate::shared::{intern, InternedString};

/// Secondary indexes over the item store
///
/// - `children`: parent DN → direct child DNs (sorted, unique)
/// - `by_kind`: node kind → DNs of that kind
///
/// Child lists are kept sorted so the index is identical for any arrival
/// order of the same items.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    children: AHashMap<InternedString, Vec<InternedString>>,
    by_kind: AHashMap<InternedString, BTreeSet<InternedString>>,
}

impl TreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under its kind and under its derived parent.
    ///
    /// `previous_kind` is the kind of the record this node replaces, if any;
    /// the DN is moved out of that kind set when the kind changed.
    pub fn register_node(&mut self, dn: &InternedString, kind: &str, previous_kind: Option<&str>) {
        if let Some(previous) = previous_kind {
            if previous != kind {
                self.unregister_kind(dn, previous);
            }
        }

        self.by_kind
            .entry(intern(kind))
            .or_default()
            .insert(dn.clone());

        if let Some(parent) = parent_dn(dn) {
            let siblings = self.children.entry(intern(parent)).or_default();
            if let Err(pos) = siblings.binary_search(dn) {
                siblings.insert(pos, dn.clone());
            }
        }
    }

    fn unregister_kind(&mut self, dn: &str, kind: &str) {
        if let Some(dns) = self.by_kind.get_mut(kind) {
            dns.remove(dn);
            if dns.is_empty() {
                self.by_kind.remove(kind);
            }
        }
    }

    /// Direct children of `dn` (empty for leaves and unknown DNs)
    pub fn children(&self, dn: &str) -> &[InternedString] {
        self.children
            .get(dn)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// DNs of `kind`, in DN order
    pub fn dns_of_kind<'a>(&'a self, kind: &str) -> impl Iterator<Item = &'a InternedString> + 'a {
        self.by_kind.get(kind).into_iter().flatten()
    }

    pub fn count_of_kind(&self, kind: &str) -> usize {
        self.by_kind.get(kind).map_or(0, |dns| dns.len())
    }

    /// DNs of `kind` whose DN string starts with `ancestor_dn`.
    ///
    /// This is a literal string-prefix test: `root/ns-[kube]` also matches
    /// `root/ns-[kube-system]/...`.
    pub fn scope_of_kind(&self, ancestor_dn: &str, kind: &str) -> Vec<&InternedString> {
        self.dns_of_kind(kind)
            .filter(|dn| dn.starts_with(ancestor_dn))
            .collect()
    }

    /// Every `(parent DN, children)` entry, sorted by parent DN
    pub fn parents(&self) -> Vec<(&InternedString, &[InternedString])> {
        let mut entries: Vec<_> = self
            .children
            .iter()
            .map(|(parent, children)| (parent, children.as_slice()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Every `(kind, count)` entry, sorted by kind
    pub fn kinds(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .by_kind
            .iter()
            .map(|(kind, dns)| (kind.as_ref(), dns.len()))
            .collect();
        entries.sort_unstable();
        entries
    }
}
