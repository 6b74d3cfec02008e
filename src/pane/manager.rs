//! Pane manager for coordinating pane operations within a tab
//!
//! The PaneManager owns the pane tree and provides operations for:
//! - Splitting panes horizontally and vertically
//! - Collapsing panes and re-flowing the remaining layout
//! - Switching focus between panes in traversal order
//! - Broadcasting zoom and preference changes to every session
//! - Serializing the arrangement for session persistence

use super::types::{Pane, PaneId, PaneNode, SplitDirection};
use crate::config::Config;
use crate::error::LayoutError;
use crate::session::{LayoutNode, restore::checked_cwd};
use crate::terminal::{SessionFactory, SessionSpec};

/// Structural notifications for the tab container hosting this tree.
///
/// The tree never talks to widgets directly; it queues these and the
/// container drains them with [`PaneManager::take_events`] after each
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// The tree shape changed; the container should re-layout its widgets.
    StructureChanged,
    /// The last pane collapsed; the container should close the tab. The
    /// tree itself never decides to destroy the owning tab.
    LastTerminalClosed,
}

/// Result of a successful [`PaneManager::collapse`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseOutcome {
    /// The leaf was removed and its sibling promoted; `focused` is the pane
    /// holding focus afterwards.
    Removed {
        /// Pane holding focus after the collapse.
        focused: PaneId,
    },
    /// The collapsed leaf was the tree's only pane; the tree is now in the
    /// zero-session state.
    LastClosed,
}

/// Outcome of removing a leaf from a subtree.
enum RemoveResult {
    /// The target leaf was found and detached. `node` is what remains of
    /// the subtree (`None` when the leaf was the subtree itself), `removed`
    /// is the detached pane, and `promoted_first` is the first reachable
    /// leaf of the sibling that took the parent's place.
    Removed {
        node: Option<PaneNode>,
        removed: Box<Pane>,
        promoted_first: Option<PaneId>,
    },
    /// The target is not in this subtree; hand the subtree back unchanged.
    NotFound(PaneNode),
}

/// Manages the pane tree within a single tab
pub struct PaneManager {
    /// Root of the pane tree (None only in the zero-session state)
    root: Option<PaneNode>,
    /// ID of the currently focused pane
    focused_pane_id: Option<PaneId>,
    /// Counter for generating unique pane IDs
    next_pane_id: PaneId,
    /// Notifications queued for the tab container
    events: Vec<TreeEvent>,
}

impl std::fmt::Debug for PaneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneManager")
            .field("focused_pane_id", &self.focused_pane_id)
            .field("next_pane_id", &self.next_pane_id)
            .field("pane_count", &self.root.as_ref().map(PaneNode::pane_count))
            .finish()
    }
}

impl PaneManager {
    /// Create a pane manager with one initial pane.
    ///
    /// The session starts in `config.working_directory` and runs the
    /// configured shell; focus lands on the new pane.
    pub fn new(config: &Config, factory: &mut dyn SessionFactory) -> Result<Self, LayoutError> {
        let mut manager = Self::empty();

        let id = manager.alloc_pane_id();
        let spec = SessionSpec {
            working_directory: config.working_directory.clone(),
            shell: config.shell.clone(),
        };
        let pane = Pane::new(id, spec, factory)?;

        manager.root = Some(PaneNode::leaf(pane));
        manager.focused_pane_id = Some(id);
        Ok(manager)
    }

    fn empty() -> Self {
        Self {
            root: None,
            focused_pane_id: None,
            next_pane_id: 1,
            events: Vec::new(),
        }
    }

    fn alloc_pane_id(&mut self) -> PaneId {
        let id = self.next_pane_id;
        self.next_pane_id += 1;
        id
    }

    /// Drain the structural notifications queued since the last call.
    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Split
    // =========================================================================

    /// Split the pane `target` in the given direction.
    ///
    /// The target leaf is replaced in place by a split whose first child is
    /// a new pane (fresh session) and whose second child is the original
    /// pane, at ratio 0.5. When `config.use_cwd` is set the new session
    /// inherits the working directory of the session that was split;
    /// otherwise it starts in the config default. Focus moves to the new
    /// pane.
    ///
    /// Returns the ID of the new pane.
    pub fn split(
        &mut self,
        target: PaneId,
        direction: SplitDirection,
        config: &Config,
        factory: &mut dyn SessionFactory,
    ) -> Result<PaneId, LayoutError> {
        let working_dir = match self.get_pane(target) {
            Some(pane) if config.use_cwd => pane.get_cwd(),
            Some(_) => config.working_directory.clone(),
            None => return Err(LayoutError::InvalidTarget { pane: target }),
        };

        // Start the session before touching the tree so a creation failure
        // leaves the structure untouched.
        let new_id = self.alloc_pane_id();
        let spec = SessionSpec {
            working_directory: working_dir,
            shell: config.shell.clone(),
        };
        let new_pane = Pane::new(new_id, spec, factory)?;

        if let Some(root) = self.root.take() {
            let (new_root, leftover) = Self::split_node(root, target, direction, Some(new_pane));
            debug_assert!(leftover.is_none(), "split target vanished mid-walk");
            self.root = Some(new_root);
        }

        self.focused_pane_id = Some(new_id);
        self.events.push(TreeEvent::StructureChanged);

        log::debug!("Split pane {target} {direction:?}, created pane {new_id} (focused)");

        Ok(new_id)
    }

    /// Replace the leaf `target_id` with a split holding the new pane first
    /// and the original second.
    ///
    /// Returns (new_node, remaining_pane) where remaining_pane is Some if
    /// the target was not found in this subtree.
    fn split_node(
        node: PaneNode,
        target_id: PaneId,
        direction: SplitDirection,
        new_pane: Option<Pane>,
    ) -> (PaneNode, Option<Pane>) {
        match node {
            PaneNode::Leaf(pane) => {
                if pane.id == target_id {
                    match new_pane {
                        Some(new) => (
                            PaneNode::split(
                                direction,
                                0.5,
                                PaneNode::leaf(new),
                                PaneNode::Leaf(pane),
                            ),
                            None,
                        ),
                        None => (PaneNode::Leaf(pane), None),
                    }
                } else {
                    // Not the target, keep as-is and pass the new pane through
                    (PaneNode::Leaf(pane), new_pane)
                }
            }
            PaneNode::Split {
                direction: split_dir,
                ratio,
                first,
                second,
            } => {
                let (new_first, remaining) =
                    Self::split_node(*first, target_id, direction, new_pane);

                if remaining.is_none() {
                    (
                        PaneNode::Split {
                            direction: split_dir,
                            ratio,
                            first: Box::new(new_first),
                            second,
                        },
                        None,
                    )
                } else {
                    let (new_second, remaining) =
                        Self::split_node(*second, target_id, direction, remaining);
                    (
                        PaneNode::Split {
                            direction: split_dir,
                            ratio,
                            first: Box::new(new_first),
                            second: Box::new(new_second),
                        },
                        remaining,
                    )
                }
            }
        }
    }

    // =========================================================================
    // Collapse
    // =========================================================================

    /// Remove the leaf `target` and terminate its session.
    ///
    /// The leaf's sibling subtree is promoted into the parent's slot in the
    /// grandparent, which keeps its own direction and ratio. If the removed
    /// leaf held focus, focus is reassigned to the promoted sibling's first
    /// reachable leaf before the pane is destroyed. Collapsing the only
    /// remaining pane empties the tree and queues exactly one
    /// [`TreeEvent::LastTerminalClosed`].
    pub fn collapse(&mut self, target: PaneId) -> Result<CollapseOutcome, LayoutError> {
        let root = match self.root.take() {
            Some(root) if root.find_pane(target).is_some() => root,
            Some(root) => {
                self.root = Some(root);
                return Err(LayoutError::InvalidTarget { pane: target });
            }
            None => return Err(LayoutError::InvalidTarget { pane: target }),
        };

        match Self::remove_pane(root, target) {
            RemoveResult::Removed {
                node,
                removed,
                promoted_first,
            } => {
                self.root = node;

                let outcome = match self.root {
                    Some(ref root) => {
                        if self.focused_pane_id == Some(target) {
                            // Promoted sibling's first reachable leaf; a removed
                            // root leaf cannot reach this arm.
                            self.focused_pane_id =
                                promoted_first.or_else(|| Some(root.first_leaf_id()));
                        }
                        self.events.push(TreeEvent::StructureChanged);
                        CollapseOutcome::Removed {
                            focused: self.focused_pane_id.unwrap_or_else(|| root.first_leaf_id()),
                        }
                    }
                    None => {
                        self.focused_pane_id = None;
                        self.events.push(TreeEvent::LastTerminalClosed);
                        CollapseOutcome::LastClosed
                    }
                };

                log::debug!("Collapsed pane {target}, outcome {outcome:?}");

                // Focus and events are settled; only now let the pane drop
                // and terminate its session.
                drop(removed);

                Ok(outcome)
            }
            RemoveResult::NotFound(root) => {
                // Liveness was checked above.
                self.root = Some(root);
                Err(LayoutError::InvalidTarget { pane: target })
            }
        }
    }

    /// Detach the leaf `target_id` from the subtree, promoting its sibling.
    fn remove_pane(node: PaneNode, target_id: PaneId) -> RemoveResult {
        match node {
            PaneNode::Leaf(pane) => {
                if pane.id == target_id {
                    RemoveResult::Removed {
                        node: None,
                        removed: pane,
                        promoted_first: None,
                    }
                } else {
                    RemoveResult::NotFound(PaneNode::Leaf(pane))
                }
            }
            PaneNode::Split {
                direction,
                ratio,
                first,
                second,
            } => match Self::remove_pane(*first, target_id) {
                RemoveResult::Removed {
                    node: None,
                    removed,
                    ..
                } => {
                    // First child was the target; the second child takes
                    // this split's place.
                    let promoted_first = Some(second.first_leaf_id());
                    RemoveResult::Removed {
                        node: Some(*second),
                        removed,
                        promoted_first,
                    }
                }
                RemoveResult::Removed {
                    node: Some(new_first),
                    removed,
                    promoted_first,
                } => RemoveResult::Removed {
                    node: Some(PaneNode::Split {
                        direction,
                        ratio,
                        first: Box::new(new_first),
                        second,
                    }),
                    removed,
                    promoted_first,
                },
                RemoveResult::NotFound(first_node) => match Self::remove_pane(*second, target_id) {
                    RemoveResult::Removed {
                        node: None,
                        removed,
                        ..
                    } => {
                        let promoted_first = Some(first_node.first_leaf_id());
                        RemoveResult::Removed {
                            node: Some(first_node),
                            removed,
                            promoted_first,
                        }
                    }
                    RemoveResult::Removed {
                        node: Some(new_second),
                        removed,
                        promoted_first,
                    } => RemoveResult::Removed {
                        node: Some(PaneNode::Split {
                            direction,
                            ratio,
                            first: Box::new(first_node),
                            second: Box::new(new_second),
                        }),
                        removed,
                        promoted_first,
                    },
                    RemoveResult::NotFound(second_node) => {
                        RemoveResult::NotFound(PaneNode::Split {
                            direction,
                            ratio,
                            first: Box::new(first_node),
                            second: Box::new(second_node),
                        })
                    }
                },
            },
        }
    }

    /// React to an asynchronous "session finished" notification.
    ///
    /// A pending notification can lose the race against a user-initiated
    /// collapse of the same pane; ids are never reused, so a stale id simply
    /// resolves to nothing and the notification is dropped.
    pub fn handle_session_finished(&mut self, target: PaneId) -> Option<CollapseOutcome> {
        if self.get_pane(target).is_none() {
            log::debug!("Ignoring exit notification for pane {target}: already collapsed");
            return None;
        }
        self.collapse(target).ok()
    }

    // =========================================================================
    // Focus & traversal
    // =========================================================================

    /// Pane IDs in traversal order (first-before-second, recursive).
    pub fn leaf_order(&self) -> Vec<PaneId> {
        self.root
            .as_ref()
            .map(|r| r.all_pane_ids())
            .unwrap_or_default()
    }

    /// Move focus to the next pane in traversal order, wrapping around.
    ///
    /// Returns the newly focused pane. No-op with a single pane.
    pub fn switch_next(&mut self) -> Option<PaneId> {
        self.switch_by(1)
    }

    /// Move focus to the previous pane in traversal order, wrapping around.
    pub fn switch_previous(&mut self) -> Option<PaneId> {
        self.switch_by(-1)
    }

    fn switch_by(&mut self, step: isize) -> Option<PaneId> {
        let order = self.leaf_order();
        let focused = self.focused_pane_id?;
        let pos = order.iter().position(|id| *id == focused)?;
        let len = order.len() as isize;
        let next = order[((pos as isize + step).rem_euclid(len)) as usize];
        self.focused_pane_id = Some(next);
        Some(next)
    }

    /// Focus a specific pane.
    ///
    /// Idempotent; fails with `InvalidTarget` if the pane is not part of
    /// this tree.
    pub fn focus_pane(&mut self, target: PaneId) -> Result<(), LayoutError> {
        if self.get_pane(target).is_none() {
            return Err(LayoutError::InvalidTarget { pane: target });
        }
        self.focused_pane_id = Some(target);
        Ok(())
    }

    /// Focus the first reachable leaf of the tree.
    pub fn set_initial_focus(&mut self) {
        if let Some(ref root) = self.root {
            self.focused_pane_id = Some(root.first_leaf_id());
        }
    }

    /// Get the currently focused pane
    pub fn focused_pane(&self) -> Option<&Pane> {
        self.focused_pane_id
            .and_then(|id| self.root.as_ref()?.find_pane(id))
    }

    /// Get the currently focused pane mutably
    pub fn focused_pane_mut(&mut self) -> Option<&mut Pane> {
        let id = self.focused_pane_id?;
        self.root.as_mut()?.find_pane_mut(id)
    }

    /// Get the focused pane ID
    pub fn focused_pane_id(&self) -> Option<PaneId> {
        self.focused_pane_id
    }

    /// Get a pane by ID
    pub fn get_pane(&self, id: PaneId) -> Option<&Pane> {
        self.root.as_ref()?.find_pane(id)
    }

    /// Get a mutable pane by ID
    pub fn get_pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.root.as_mut()?.find_pane_mut(id)
    }

    /// Get the number of panes
    pub fn pane_count(&self) -> usize {
        self.root.as_ref().map(|r| r.pane_count()).unwrap_or(0)
    }

    /// Check if there are multiple panes
    pub fn has_multiple_panes(&self) -> bool {
        self.pane_count() > 1
    }

    /// True once the last pane has collapsed.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Get access to the root node
    pub fn root(&self) -> Option<&PaneNode> {
        self.root.as_ref()
    }

    // =========================================================================
    // Broadcast operations
    // =========================================================================

    /// Zoom every session by `delta` steps.
    ///
    /// Best-effort: a session-level failure is logged and the traversal
    /// continues with the remaining panes.
    pub fn zoom_all_by(&mut self, delta: i32) {
        if let Some(ref mut root) = self.root {
            for pane in root.all_panes_mut() {
                let id = pane.id;
                if let Err(e) = pane.session_mut().zoom_by(delta) {
                    log::warn!("Zoom by {delta} failed for pane {id}: {e:#}");
                }
            }
        }
    }

    /// Zoom every session in by the configured step.
    pub fn zoom_in(&mut self, config: &Config) {
        self.zoom_all_by(i32::from(config.zoom_step));
    }

    /// Zoom every session out by the configured step.
    pub fn zoom_out(&mut self, config: &Config) {
        self.zoom_all_by(-i32::from(config.zoom_step));
    }

    /// Re-apply preferences to every session after a configuration change.
    /// Best-effort, like [`PaneManager::zoom_all_by`].
    pub fn propagate_preferences_change(&mut self, config: &Config) {
        if let Some(ref mut root) = self.root {
            for pane in root.all_panes_mut() {
                let id = pane.id;
                if let Err(e) = pane.session_mut().apply_preferences(config) {
                    log::warn!("Preference reload failed for pane {id}: {e:#}");
                }
            }
        }
    }

    /// Point a single pane's session at a new working directory.
    ///
    /// Not a broadcast: only `target` is affected. A session-level refusal
    /// is logged and swallowed; an unknown target is an error.
    pub fn set_working_directory(&mut self, target: PaneId, dir: &str) -> Result<(), LayoutError> {
        let pane = self
            .get_pane_mut(target)
            .ok_or(LayoutError::InvalidTarget { pane: target })?;
        if let Err(e) = pane.set_working_directory(dir) {
            log::warn!("Working directory change failed for pane {target}: {e:#}");
        }
        Ok(())
    }

    /// Clear the focused session's screen. Best-effort.
    pub fn clear_active(&mut self) {
        if let Some(pane) = self.focused_pane_mut() {
            let id = pane.id;
            if let Err(e) = pane.session_mut().clear() {
                log::warn!("Clear failed for pane {id}: {e:#}");
            }
        }
    }

    // =========================================================================
    // Resize
    // =========================================================================

    /// Adjust the ratio of the split closest around `target`.
    ///
    /// Positive `delta` grows the target's share of the split; the ratio is
    /// clamped to keep both children visible. A no-op on a tree with a
    /// single pane.
    pub fn resize_split(&mut self, target: PaneId, delta: f32) -> Result<(), LayoutError> {
        if self.get_pane(target).is_none() {
            return Err(LayoutError::InvalidTarget { pane: target });
        }
        if let Some(ref mut root) = self.root
            && Self::adjust_split_ratio(root, target, delta)
        {
            self.events.push(TreeEvent::StructureChanged);
        }
        Ok(())
    }

    /// Recursively find and adjust the split ratio for a pane
    fn adjust_split_ratio(node: &mut PaneNode, target_id: PaneId, delta: f32) -> bool {
        match node {
            PaneNode::Leaf(_) => false,
            PaneNode::Split {
                ratio,
                first,
                second,
                ..
            } => {
                if first.find_pane(target_id).is_some() {
                    // Prefer the split nearest the target
                    if Self::adjust_split_ratio(first, target_id, delta) {
                        return true;
                    }
                    *ratio = (*ratio + delta).clamp(0.1, 0.9);
                    return true;
                }
                if second.find_pane(target_id).is_some() {
                    if Self::adjust_split_ratio(second, target_id, delta) {
                        return true;
                    }
                    *ratio = (*ratio - delta).clamp(0.1, 0.9);
                    return true;
                }
                false
            }
        }
    }

    // =========================================================================
    // Serialize & restore
    // =========================================================================

    /// Capture the tree as a serializable layout descriptor.
    ///
    /// Returns `None` in the zero-session state, which is never persisted.
    /// Leaves record the session's current working directory and the shell
    /// command only when it differs from the configured default.
    pub fn serialize(&self, config: &Config) -> Option<LayoutNode> {
        self.root.as_ref().map(|r| Self::capture_node(r, config))
    }

    fn capture_node(node: &PaneNode, config: &Config) -> LayoutNode {
        match node {
            PaneNode::Leaf(pane) => LayoutNode::Leaf {
                cwd: pane.get_cwd(),
                shell: pane
                    .shell()
                    .filter(|s| *s != config.shell_command())
                    .map(str::to_string),
            },
            PaneNode::Split {
                direction,
                ratio,
                first,
                second,
            } => LayoutNode::Split {
                orientation: *direction,
                ratio: *ratio,
                first: Box::new(Self::capture_node(first, config)),
                second: Box::new(Self::capture_node(second, config)),
            },
        }
    }

    /// Reconstruct a tree from a saved layout, one fresh session per leaf.
    ///
    /// Construction is all-or-nothing: if any session fails to start, the
    /// subtrees built so far are dropped (terminating their sessions)
    /// before the error surfaces, and no partial tree is ever reachable.
    /// Focus lands on the first reachable leaf.
    pub fn restore(
        layout: &LayoutNode,
        config: &Config,
        factory: &mut dyn SessionFactory,
    ) -> Result<Self, LayoutError> {
        layout.validate()?;

        let mut manager = Self::empty();
        let root = manager.build_node(layout, config, factory)?;
        manager.focused_pane_id = Some(root.first_leaf_id());
        manager.root = Some(root);

        log::info!("Restored layout with {} panes", manager.pane_count());
        Ok(manager)
    }

    /// Recursively build a PaneNode from a layout descriptor
    fn build_node(
        &mut self,
        layout: &LayoutNode,
        config: &Config,
        factory: &mut dyn SessionFactory,
    ) -> Result<PaneNode, LayoutError> {
        match layout {
            LayoutNode::Leaf { cwd, shell } => {
                let id = self.alloc_pane_id();
                let spec = SessionSpec {
                    working_directory: checked_cwd(cwd),
                    shell: shell.clone().or_else(|| config.shell.clone()),
                };
                let pane = Pane::new(id, spec, factory)?;
                Ok(PaneNode::leaf(pane))
            }
            LayoutNode::Split {
                orientation,
                ratio,
                first,
                second,
            } => {
                let first_node = self.build_node(first, config, factory)?;
                let second_node = self.build_node(second, config, factory)?;
                Ok(PaneNode::split(*orientation, *ratio, first_node, second_node))
            }
        }
    }
}
