//! Helpers for restoring saved layouts

use std::path::Path;

/// Pass a saved working directory through to the session factory, warning
/// when it no longer exists on disk.
///
/// The descriptor's directory always reaches the factory verbatim; whether
/// to fall back (and to where) is the terminal collaborator's decision.
pub fn checked_cwd(cwd: &Option<String>) -> Option<String> {
    if let Some(dir) = cwd
        && !Path::new(dir).is_dir()
    {
        log::warn!("Saved directory '{dir}' no longer exists; the session may start elsewhere");
    }
    cwd.clone()
}
