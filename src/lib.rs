//! quickterm — pane layout engine for a dropdown tabbed terminal.
//!
//! One `PaneManager` per tab owns a binary tree of terminal panes: leaves
//! wrap one session each, splits hold two children with a direction and
//! ratio. The manager handles splitting, collapsing (with sibling
//! promotion), traversal-order focus switching, zoom/preference broadcasts,
//! and save/restore of named layouts through `SessionStore`.
//!
//! Terminal emulation itself is an external collaborator: the embedder
//! supplies a [`SessionFactory`] and receives structural notifications by
//! draining [`TreeEvent`]s after each operation. All tree operations are
//! synchronous and run to completion on the caller's event loop; nothing in
//! this crate blocks on session I/O.

/// Crate version, for embedders that surface it in diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod pane;
pub mod session;
pub mod terminal;

pub use config::{Config, default_shell};
pub use error::LayoutError;
pub use pane::{CollapseOutcome, Pane, PaneId, PaneManager, PaneNode, SplitDirection, TreeEvent};
pub use session::{LayoutNode, storage::SessionStore};
pub use terminal::{SessionFactory, SessionSpec, TerminalSession};
