//! Layout descriptors for session save/restore
//!
//! This module provides the persistence side of pane arrangements: a
//! serializable mirror of the pane tree where leaves carry the data needed
//! to restart their session (working directory, optional shell override)
//! and splits carry orientation and ratio.

pub mod restore;
pub mod storage;

use crate::error::LayoutError;
use crate::pane::SplitDirection;
use serde::{Deserialize, Serialize};

/// Recursive pane-layout descriptor.
///
/// Serialized form is the wire format consumed by the session store:
///
/// ```json
/// { "type": "leaf", "cwd": "/home/user", "shell": "/usr/bin/fish" }
/// { "type": "split", "orientation": "v", "ratio": 0.5,
///   "first": { "type": "leaf", "cwd": "/a" },
///   "second": { "type": "leaf", "cwd": "/b" } }
/// ```
///
/// `shell` is present only when the pane runs something other than the
/// configured default shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    /// A terminal pane leaf
    Leaf {
        /// Working directory of this pane
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cwd: Option<String>,
        /// Shell override, when it differs from the configured default
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shell: Option<String>,
    },
    /// A split containing two children
    Split {
        /// Split orientation
        orientation: SplitDirection,
        /// Split ratio, strictly between 0 and 1
        ratio: f32,
        /// First child (top/left)
        first: Box<LayoutNode>,
        /// Second child (bottom/right)
        second: Box<LayoutNode>,
    },
}

impl LayoutNode {
    /// Parse a descriptor from its JSON form.
    ///
    /// Any shape violation (a split missing a child, an unknown node type)
    /// is a [`LayoutError::MalformedLayout`]; nothing is constructed from a
    /// descriptor that fails here.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let node: LayoutNode =
            serde_json::from_str(json).map_err(|e| LayoutError::malformed(e.to_string()))?;
        node.validate()?;
        Ok(node)
    }

    /// Serialize the descriptor to JSON.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string(self).map_err(|e| LayoutError::malformed(e.to_string()))
    }

    /// Check structural invariants that the type system cannot express:
    /// every split ratio must be finite and strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            LayoutNode::Leaf { .. } => Ok(()),
            LayoutNode::Split {
                ratio,
                first,
                second,
                ..
            } => {
                if !ratio.is_finite() || *ratio <= 0.0 || *ratio >= 1.0 {
                    return Err(LayoutError::malformed(format!(
                        "split ratio {ratio} is outside (0, 1)"
                    )));
                }
                first.validate()?;
                second.validate()
            }
        }
    }

    /// Number of leaves in the descriptor
    pub fn leaf_count(&self) -> usize {
        match self {
            LayoutNode::Leaf { .. } => 1,
            LayoutNode::Split { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    /// Number of split nodes in the descriptor
    pub fn split_count(&self) -> usize {
        match self {
            LayoutNode::Leaf { .. } => 0,
            LayoutNode::Split { first, second, .. } => {
                1 + first.split_count() + second.split_count()
            }
        }
    }

    /// Leaf working directories in traversal order
    pub fn leaf_cwds(&self) -> Vec<Option<String>> {
        match self {
            LayoutNode::Leaf { cwd, .. } => vec![cwd.clone()],
            LayoutNode::Split { first, second, .. } => {
                let mut cwds = first.leaf_cwds();
                cwds.extend(second.leaf_cwds());
                cwds
            }
        }
    }
}
