//! Runtime configuration for tree construction and splits.
//!
//! The original application kept these settings in a process-wide
//! preferences object; here the embedder passes a `Config` explicitly into
//! every operation that needs one, so trees hosted in different tabs can
//! diverge and tests can construct configs freely.

use serde::{Deserialize, Serialize};

/// Settings that influence how sessions are created and zoomed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Custom shell command for new sessions. `None` selects the platform
    /// default (see [`default_shell`]).
    pub shell: Option<String>,

    /// Working directory for the first pane of a new tree, and for split
    /// panes when `use_cwd` is off. `None` leaves the choice to the
    /// terminal collaborator.
    pub working_directory: Option<String>,

    /// When true, a pane created by splitting starts in the working
    /// directory of the pane it was split from. When false it starts in
    /// `working_directory`.
    pub use_cwd: bool,

    /// Font-size step applied per `zoom_in` / `zoom_out` invocation.
    pub zoom_step: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell: None,
            working_directory: None,
            use_cwd: true,
            zoom_step: 1,
        }
    }
}

impl Config {
    /// Resolve the shell command a new session runs when no per-pane
    /// override is present.
    pub fn shell_command(&self) -> String {
        match self.shell {
            Some(ref custom) => custom.clone(),
            None => default_shell(),
        }
    }
}

/// Platform default shell, matching what the terminal collaborator spawns
/// when no custom shell is configured.
pub fn default_shell() -> String {
    #[cfg(target_os = "windows")]
    {
        "powershell.exe".to_string()
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string())
    }
}
