//! Core types for the pane system
//!
//! This module defines the fundamental data structures for split panes:
//! - Binary tree structure for arbitrary nesting
//! - Per-pane state (session, working directory, shell override)
//! - Traversal helpers used for focus navigation and serialization

use crate::error::LayoutError;
use crate::terminal::{SessionFactory, SessionSpec, TerminalSession};

/// Unique identifier for a pane within its tree.
///
/// Ids are allocated from a monotonic counter and never reused, so a late
/// session-exit notification carrying the id of an already-collapsed pane
/// resolves to nothing instead of a freshly created pane.
pub type PaneId = u64;

/// Direction of a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SplitDirection {
    /// Panes are stacked vertically (split creates top/bottom panes)
    #[serde(rename = "h")]
    Horizontal,
    /// Panes are side by side (split creates left/right panes)
    #[serde(rename = "v")]
    Vertical,
}

/// A single terminal pane wrapping one session
pub struct Pane {
    /// Unique identifier for this pane
    pub id: PaneId,
    /// The terminal session this pane owns exclusively
    session: Box<dyn TerminalSession>,
    /// Working directory the session was started in (or last pointed at)
    working_directory: Option<String>,
    /// Custom shell command, if one was requested for this pane
    shell: Option<String>,
}

impl Pane {
    /// Create a new pane by starting a session for `spec`.
    pub fn new(
        id: PaneId,
        spec: SessionSpec,
        factory: &mut dyn SessionFactory,
    ) -> Result<Self, LayoutError> {
        let session = factory
            .create(&spec)
            .map_err(|source| LayoutError::SessionCreationFailed { source })?;

        log::info!(
            "Created pane {} in {}",
            id,
            spec.working_directory.as_deref().unwrap_or("<default>")
        );

        Ok(Self {
            id,
            session,
            working_directory: spec.working_directory,
            shell: spec.shell,
        })
    }

    /// Get the current working directory of this pane's shell.
    ///
    /// Prefers what the live session reports; falls back to the directory
    /// the session was started in.
    pub fn get_cwd(&self) -> Option<String> {
        self.session
            .current_working_directory()
            .or_else(|| self.working_directory.clone())
    }

    /// The custom shell command this pane was created with, if any.
    pub fn shell(&self) -> Option<&str> {
        self.shell.as_deref()
    }

    /// Point the session at a new working directory.
    ///
    /// The directory is recorded on the pane even if the session rejects it,
    /// so a later serialize captures the caller's intent.
    pub fn set_working_directory(&mut self, dir: &str) -> anyhow::Result<()> {
        self.working_directory = Some(dir.to_string());
        self.session.set_working_directory(dir)
    }

    /// Mutable access to the owned session, for per-session effects.
    pub fn session_mut(&mut self) -> &mut dyn TerminalSession {
        self.session.as_mut()
    }
}

impl Drop for Pane {
    fn drop(&mut self) {
        log::info!("Dropping pane {}", self.id);
        self.session.terminate();
    }
}

/// Tree node for pane layout
///
/// The pane tree is a binary tree where:
/// - Leaf nodes contain actual terminal panes
/// - Split nodes contain exactly two children with a direction and ratio
///
/// A tree with N panes always has exactly N leaves and N-1 split nodes.
pub enum PaneNode {
    /// A leaf node containing a terminal pane
    Leaf(Box<Pane>),
    /// A split containing two child nodes
    Split {
        /// Direction of the split
        direction: SplitDirection,
        /// Split ratio, strictly between 0 and 1 - relative size of `first`
        /// along the split axis
        ratio: f32,
        /// First child (top for horizontal, left for vertical)
        first: Box<PaneNode>,
        /// Second child (bottom for horizontal, right for vertical)
        second: Box<PaneNode>,
    },
}

impl PaneNode {
    /// Create a new leaf node with a pane
    pub fn leaf(pane: Pane) -> Self {
        PaneNode::Leaf(Box::new(pane))
    }

    /// Create a new split node
    pub fn split(direction: SplitDirection, ratio: f32, first: PaneNode, second: PaneNode) -> Self {
        PaneNode::Split {
            direction,
            ratio,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Check if this is a leaf node
    pub fn is_leaf(&self) -> bool {
        matches!(self, PaneNode::Leaf(_))
    }

    /// Find a pane by ID (recursive)
    pub fn find_pane(&self, id: PaneId) -> Option<&Pane> {
        match self {
            PaneNode::Leaf(pane) => {
                if pane.id == id {
                    Some(pane)
                } else {
                    None
                }
            }
            PaneNode::Split { first, second, .. } => {
                first.find_pane(id).or_else(|| second.find_pane(id))
            }
        }
    }

    /// Find a mutable pane by ID (recursive)
    pub fn find_pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        match self {
            PaneNode::Leaf(pane) => {
                if pane.id == id {
                    Some(pane)
                } else {
                    None
                }
            }
            PaneNode::Split { first, second, .. } => first
                .find_pane_mut(id)
                .or_else(move || second.find_pane_mut(id)),
        }
    }

    /// Get all pane IDs in this subtree, in traversal order
    ///
    /// Traversal order is the canonical in-order walk: for each split,
    /// `first` is visited before `second`, recursively down to leaves. Focus
    /// switching and serialization both rely on this ordering.
    pub fn all_pane_ids(&self) -> Vec<PaneId> {
        match self {
            PaneNode::Leaf(pane) => vec![pane.id],
            PaneNode::Split { first, second, .. } => {
                let mut ids = first.all_pane_ids();
                ids.extend(second.all_pane_ids());
                ids
            }
        }
    }

    /// Get all panes in this subtree, in traversal order
    pub fn all_panes(&self) -> Vec<&Pane> {
        match self {
            PaneNode::Leaf(pane) => vec![pane],
            PaneNode::Split { first, second, .. } => {
                let mut panes = first.all_panes();
                panes.extend(second.all_panes());
                panes
            }
        }
    }

    /// Get all mutable panes in this subtree, in traversal order
    pub fn all_panes_mut(&mut self) -> Vec<&mut Pane> {
        match self {
            PaneNode::Leaf(pane) => vec![pane],
            PaneNode::Split { first, second, .. } => {
                let mut panes = first.all_panes_mut();
                panes.extend(second.all_panes_mut());
                panes
            }
        }
    }

    /// Count total number of panes
    pub fn pane_count(&self) -> usize {
        match self {
            PaneNode::Leaf(_) => 1,
            PaneNode::Split { first, second, .. } => first.pane_count() + second.pane_count(),
        }
    }

    /// Count split nodes in this subtree
    pub fn split_count(&self) -> usize {
        match self {
            PaneNode::Leaf(_) => 0,
            PaneNode::Split { first, second, .. } => {
                1 + first.split_count() + second.split_count()
            }
        }
    }

    /// First reachable leaf of this subtree: the leftmost leaf in traversal
    /// order.
    pub fn first_leaf_id(&self) -> PaneId {
        match self {
            PaneNode::Leaf(pane) => pane.id,
            PaneNode::Split { first, .. } => first.first_leaf_id(),
        }
    }
}
