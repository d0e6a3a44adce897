use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ControllerKind, NodeKey};

/// Failure body returned by every config backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Refused form edits. The display text is what the user is shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("No {kind} Controllers to remove.")]
    NoControllersToRemove { kind: ControllerKind },
    #[error("At least one node is required!")]
    LastNodeRequired,
    #[error("Node box {0} no longer exists.")]
    UnknownNode(NodeKey),
    #[error("Node box {key} has no {kind} controller at position {index}.")]
    UnknownControllerSlot {
        key: NodeKey,
        kind: ControllerKind,
        index: usize,
    },
    #[error("'{value}' is not a known {kind} controller.")]
    UnknownControllerOption { kind: ControllerKind, value: String },
}
