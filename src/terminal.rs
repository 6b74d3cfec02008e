//! Collaborator traits for the external terminal-emulation widget.
//!
//! The layout engine never reimplements terminal emulation. Each leaf of the
//! pane tree exclusively owns one opaque session created through
//! [`SessionFactory`]; the tree forwards per-session effects (zoom, working
//! directory changes, preference reloads) through [`TerminalSession`] and
//! otherwise treats the session as a black box.
//!
//! Session exit is asynchronous on the collaborator's side. The embedder
//! observes it on its event loop and calls
//! [`PaneManager::handle_session_finished`](crate::pane::PaneManager::handle_session_finished)
//! synchronously; the tree itself never blocks on session I/O.

use crate::config::Config;

/// Parameters for starting one terminal session.
///
/// Also serves as the per-leaf unit of a persisted layout: a saved leaf is
/// exactly the spec of the session it should restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpec {
    /// Directory the shell starts in. `None` leaves the choice to the
    /// collaborator (typically the user's home directory).
    pub working_directory: Option<String>,
    /// Shell command to run. `None` selects the configured default.
    pub shell: Option<String>,
}

/// One running terminal instance, owned by exactly one pane.
///
/// Errors from these methods are collaborator-level (the widget failed to
/// apply an effect); broadcast operations on the tree log and swallow them
/// rather than aborting the traversal.
pub trait TerminalSession {
    /// Live working directory as reported by the shell, if known.
    fn current_working_directory(&self) -> Option<String>;

    /// Point the session at a new working directory.
    fn set_working_directory(&mut self, dir: &str) -> anyhow::Result<()>;

    /// Adjust the font size by `delta` steps. Negative shrinks.
    fn zoom_by(&mut self, delta: i32) -> anyhow::Result<()>;

    /// Clear the session's screen.
    fn clear(&mut self) -> anyhow::Result<()>;

    /// Re-apply display preferences after a configuration change.
    fn apply_preferences(&mut self, config: &Config) -> anyhow::Result<()>;

    /// Stop the underlying process. Called exactly once, when the owning
    /// pane is collapsed or its tree is dropped.
    fn terminate(&mut self);
}

/// Creates terminal sessions on behalf of the pane tree.
pub trait SessionFactory {
    /// Start a session for `spec`.
    ///
    /// Failures surface to tree callers as
    /// [`LayoutError::SessionCreationFailed`](crate::error::LayoutError::SessionCreationFailed).
    fn create(&mut self, spec: &SessionSpec) -> anyhow::Result<Box<dyn TerminalSession>>;
}
