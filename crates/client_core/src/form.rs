//! In-memory state of the node configuration form.
//!
//! The form is an ordered list of node boxes. Each box is keyed by the value of
//! the node counter at the time it was created, so controller lists follow
//! their node no matter how the list grows or shrinks. Serialization walks the
//! boxes in display order.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{
        ConfigPayload, ControllerKind, NodeEntry, NodeKey, DEFAULT_PASSWORD, DEFAULT_USERNAME,
    },
    error::FormError,
};
use tracing::debug;

/// Credentials stamped onto every node when the form is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCredentials {
    pub username: String,
    pub password: String,
}

impl Default for NodeCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// Optional initial values for a new node box. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSeed {
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub management_ip: Option<String>,
    #[serde(default)]
    pub network_controllers: Vec<String>,
    #[serde(default)]
    pub storage_controllers: Vec<String>,
}

impl From<&NodeEntry> for NodeSeed {
    fn from(entry: &NodeEntry) -> Self {
        Self {
            node_id: Some(entry.node_id.clone()),
            management_ip: Some(entry.management_ip.clone()),
            network_controllers: entry.network_controllers.clone(),
            storage_controllers: entry.storage_controllers.clone(),
        }
    }
}

/// One controller dropdown. `None` means it still shows the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerSlot {
    selection: Option<String>,
}

impl ControllerSlot {
    pub fn placeholder() -> Self {
        Self { selection: None }
    }

    pub fn selected(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            selection: (!value.is_empty()).then_some(value),
        }
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBox {
    key: NodeKey,
    pub node_id: String,
    pub management_ip: String,
    network_controllers: Vec<ControllerSlot>,
    storage_controllers: Vec<ControllerSlot>,
}

impl NodeBox {
    fn new(key: NodeKey, seed: NodeSeed) -> Self {
        let node_id = non_empty(seed.node_id).unwrap_or_else(|| key.0.to_string());
        let management_ip = non_empty(seed.management_ip).unwrap_or_default();
        Self {
            key,
            node_id,
            management_ip,
            network_controllers: seed
                .network_controllers
                .into_iter()
                .map(ControllerSlot::selected)
                .collect(),
            storage_controllers: seed
                .storage_controllers
                .into_iter()
                .map(ControllerSlot::selected)
                .collect(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn controllers(&self, kind: ControllerKind) -> &[ControllerSlot] {
        match kind {
            ControllerKind::Network => &self.network_controllers,
            ControllerKind::Storage => &self.storage_controllers,
        }
    }

    fn controllers_mut(&mut self, kind: ControllerKind) -> &mut Vec<ControllerSlot> {
        match kind {
            ControllerKind::Network => &mut self.network_controllers,
            ControllerKind::Storage => &mut self.storage_controllers,
        }
    }

    /// Selected values in display order; placeholders are skipped.
    pub fn selected_controllers(&self, kind: ControllerKind) -> Vec<String> {
        self.controllers(kind)
            .iter()
            .filter_map(|slot| slot.selection().map(str::to_string))
            .collect()
    }

    pub fn to_entry(&self, credentials: &NodeCredentials) -> NodeEntry {
        NodeEntry {
            node_id: self.node_id.clone(),
            management_ip: self.management_ip.clone(),
            password: credentials.password.clone(),
            username: credentials.username.clone(),
            network_controllers: self.selected_controllers(ControllerKind::Network),
            storage_controllers: self.selected_controllers(ControllerKind::Storage),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct NodeForm {
    nodes: Vec<NodeBox>,
    next_node_number: u64,
    credentials: NodeCredentials,
}

impl Default for NodeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeForm {
    /// A form holding the single initial node box.
    pub fn new() -> Self {
        Self::with_credentials(NodeCredentials::default())
    }

    pub fn with_credentials(credentials: NodeCredentials) -> Self {
        let mut form = Self::empty(credentials);
        form.add_node_box(NodeSeed::default());
        form
    }

    /// Rebuilds a form from a previously saved payload. An empty payload still
    /// yields one node box.
    pub fn from_payload(payload: &ConfigPayload, credentials: NodeCredentials) -> Self {
        Self::from_seeds(payload.nodes.iter().map(NodeSeed::from), credentials)
    }

    pub fn from_seeds(
        seeds: impl IntoIterator<Item = NodeSeed>,
        credentials: NodeCredentials,
    ) -> Self {
        let mut form = Self::empty(credentials);
        for seed in seeds {
            form.add_node_box(seed);
        }
        if form.nodes.is_empty() {
            form.add_node_box(NodeSeed::default());
        }
        form
    }

    fn empty(credentials: NodeCredentials) -> Self {
        Self {
            nodes: Vec::new(),
            next_node_number: 1,
            credentials,
        }
    }

    pub fn nodes(&self) -> &[NodeBox] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn credentials(&self) -> &NodeCredentials {
        &self.credentials
    }

    /// Counter value the next node box will be keyed (and pre-filled) with.
    pub fn next_node_number(&self) -> u64 {
        self.next_node_number
    }

    pub fn add_node_box(&mut self, seed: NodeSeed) -> NodeKey {
        let key = NodeKey(self.next_node_number);
        self.nodes.push(NodeBox::new(key, seed));
        self.next_node_number += 1;
        debug!(node = %key, total = self.nodes.len(), "added node box");
        key
    }

    /// Drops the most recently added node box, refusing to remove the last one.
    pub fn remove_last_node(&mut self) -> Result<NodeBox, FormError> {
        if self.nodes.len() <= 1 {
            return Err(FormError::LastNodeRequired);
        }
        let removed = self.nodes.pop().ok_or(FormError::LastNodeRequired)?;
        debug!(node = %removed.key, total = self.nodes.len(), "removed node box");
        Ok(removed)
    }

    pub fn node(&self, key: NodeKey) -> Result<&NodeBox, FormError> {
        self.nodes
            .iter()
            .find(|node| node.key == key)
            .ok_or(FormError::UnknownNode(key))
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut NodeBox, FormError> {
        self.nodes
            .iter_mut()
            .find(|node| node.key == key)
            .ok_or(FormError::UnknownNode(key))
    }

    /// Appends a placeholder dropdown and returns its position.
    pub fn add_controller(
        &mut self,
        key: NodeKey,
        kind: ControllerKind,
    ) -> Result<usize, FormError> {
        let slots = self.node_mut(key)?.controllers_mut(kind);
        slots.push(ControllerSlot::placeholder());
        Ok(slots.len() - 1)
    }

    pub fn remove_controller(
        &mut self,
        key: NodeKey,
        kind: ControllerKind,
    ) -> Result<ControllerSlot, FormError> {
        self.node_mut(key)?
            .controllers_mut(kind)
            .pop()
            .ok_or(FormError::NoControllersToRemove { kind })
    }

    /// Sets a dropdown to a catalog value, or back to its placeholder with `None`.
    pub fn select_controller(
        &mut self,
        key: NodeKey,
        kind: ControllerKind,
        index: usize,
        value: Option<&str>,
    ) -> Result<(), FormError> {
        if let Some(value) = value {
            if kind.find_option(value).is_none() {
                return Err(FormError::UnknownControllerOption {
                    kind,
                    value: value.to_string(),
                });
            }
        }
        let slot = self
            .node_mut(key)?
            .controllers_mut(kind)
            .get_mut(index)
            .ok_or(FormError::UnknownControllerSlot { key, kind, index })?;
        *slot = value.map(ControllerSlot::selected).unwrap_or_default();
        Ok(())
    }

    pub fn to_payload(&self) -> ConfigPayload {
        ConfigPayload::new(
            self.nodes
                .iter()
                .map(|node| node.to_entry(&self.credentials))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
