use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_USERNAME: &str = "adminuser";
pub const DEFAULT_PASSWORD: &str = "password";

/// Stable identity of a node box inside a form. Never reused, never serialized
/// into the config payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    Network,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const NETWORK_CONTROLLERS: &[ControllerOption] = &[ControllerOption {
    value: "1af4:1041",
    label: "Ethernet controller [0200]: Red Hat, Inc. Virtio network device [1af4:1041]",
}];

pub const STORAGE_CONTROLLERS: &[ControllerOption] = &[
    ControllerOption {
        value: "1af4:1048",
        label: "SCSI storage controller [0100]: Red Hat, Inc. Virtio SCSI [1af4:1048]",
    },
    ControllerOption {
        value: "1af4:1042",
        label: "SCSI storage controller [0100]: Red Hat, Inc. Virtio block device [1af4:1042]",
    },
];

impl ControllerKind {
    pub const ALL: [ControllerKind; 2] = [ControllerKind::Network, ControllerKind::Storage];

    pub fn label(self) -> &'static str {
        match self {
            ControllerKind::Network => "Network",
            ControllerKind::Storage => "Storage",
        }
    }

    /// Text of the empty, disabled first option every selector starts on.
    pub fn placeholder(self) -> &'static str {
        match self {
            ControllerKind::Network => "Select Network Controller",
            ControllerKind::Storage => "Select Storage Controller",
        }
    }

    pub fn catalog(self) -> &'static [ControllerOption] {
        match self {
            ControllerKind::Network => NETWORK_CONTROLLERS,
            ControllerKind::Storage => STORAGE_CONTROLLERS,
        }
    }

    pub fn find_option(self, value: &str) -> Option<&'static ControllerOption> {
        self.catalog().iter().find(|option| option.value == value)
    }

    /// Class carried by selectors of this kind in the rendered form.
    pub fn css_class(self) -> &'static str {
        match self {
            ControllerKind::Network => "network-controller",
            ControllerKind::Storage => "storage-controller",
        }
    }

    pub fn container_id_prefix(self) -> &'static str {
        match self {
            ControllerKind::Network => "network-controller-container",
            ControllerKind::Storage => "storage-controller-container",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub node_id: String,
    pub management_ip: String,
    pub password: String,
    pub username: String,
    #[serde(default)]
    pub network_controllers: Vec<String>,
    #[serde(default)]
    pub storage_controllers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPayload {
    pub node_count: usize,
    pub nodes: Vec<NodeEntry>,
}

impl ConfigPayload {
    pub fn new(nodes: Vec<NodeEntry>) -> Self {
        Self {
            node_count: nodes.len(),
            nodes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciDevice {
    pub device_id: String,
    pub device_name: String,
    pub vendor_id: String,
}
