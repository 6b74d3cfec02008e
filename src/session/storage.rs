//! File I/O for named session layouts
//!
//! Saved arrangements live in `~/.config/quickterm/sessions.json`, one
//! named entry per layout. The file is read and rewritten whole on every
//! mutation; layouts are small and mutations are user-driven, so there is
//! no caching.

use super::LayoutNode;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Get the default path of the named-session file
pub fn sessions_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quickterm")
        .join("sessions.json")
}

/// Persists named layouts to a single JSON file.
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store backed by the default sessions file.
    pub fn new() -> Self {
        Self {
            path: sessions_path(),
        }
    }

    /// Store backed by a specific file (used by tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save `layout` under `name`, replacing any previous entry.
    pub fn save(&self, name: &str, layout: &LayoutNode) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(name.to_string(), layout.clone());
        self.write_entries(&entries)?;
        log::info!("Saved session '{name}' ({} panes) to {:?}", layout.leaf_count(), self.path);
        Ok(())
    }

    /// Load the layout saved under `name`.
    pub fn load(&self, name: &str) -> Result<LayoutNode> {
        let mut entries = self.read_entries()?;
        entries
            .remove(name)
            .with_context(|| format!("No saved session named '{name}'"))
    }

    /// Remove the entry saved under `name`. Returns whether it existed.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut entries = self.read_entries()?;
        let existed = entries.remove(name).is_some();
        if existed {
            self.write_entries(&entries)?;
        }
        Ok(existed)
    }

    /// Names of all saved sessions, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.read_entries()?.into_keys().collect())
    }

    /// Read the whole file. A missing or empty file is an empty store; a
    /// corrupt file is an error.
    fn read_entries(&self) -> Result<BTreeMap<String, LayoutNode>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read sessions from {:?}", self.path))?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse sessions file {:?}", self.path))
    }

    fn write_entries(&self, entries: &BTreeMap<String, LayoutNode>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(entries).context("Failed to serialize sessions")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write sessions to {:?}", self.path))
    }
}
