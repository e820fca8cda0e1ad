//! Read-only handle over one node of a [`RegistryState`]

use serde_json::Value;
use std::collections::BTreeSet;

use super::accessor::EMPTY_PROPERTIES;
use super::RegistryState;
use crate::domain::{Alert, ItemProperties, NodeConfig, PropsConfig};
use crate::shared::InternedString;
use crate::store::RegistryStateNode;

/// Node plus everything the state keys by its DN
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    node: &'a RegistryStateNode,
    state: &'a RegistryState,
}

impl<'a> NodeView<'a> {
    pub(crate) fn new(node: &'a RegistryStateNode, state: &'a RegistryState) -> Self {
        Self { node, state }
    }

    pub fn dn(&self) -> &'a str {
        &self.node.dn
    }

    pub(crate) fn dn_key(&self) -> &'a InternedString {
        &self.node.dn
    }

    pub fn kind(&self) -> &'a str {
        &self.node.config.kind
    }

    pub fn rn(&self) -> &'a str {
        &self.node.config.rn
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.config.name.as_deref()
    }

    pub fn config(&self) -> &'a NodeConfig {
        &self.node.config
    }

    pub fn children_count(&self) -> usize {
        self.state.get_children_dns(self.dn()).len()
    }

    pub fn self_alerts(&self) -> &'a [Alert] {
        self.state.get_alerts(self.dn())
    }

    pub fn markers(&self) -> &'a BTreeSet<String> {
        &self.node.markers
    }

    pub fn properties(&self) -> &'a ItemProperties {
        self.state
            .item_store()
            .properties(self.dn())
            .unwrap_or(&EMPTY_PROPERTIES)
    }

    pub fn get_properties(&self, id: &str) -> Option<&'a PropsConfig> {
        self.properties().get(id)
    }

    /// Payload of property set `id`, or an empty object
    pub fn get_properties_config(&self, id: &str) -> Value {
        match self.get_properties(id) {
            Some(props) if !props.config.is_null() => props.config.clone(),
            _ => Value::Object(Default::default()),
        }
    }

    pub fn labels(&self) -> Value {
        self.get_properties_config("labels")
    }

    pub fn annotations(&self) -> Value {
        self.get_properties_config("annotations")
    }
}
