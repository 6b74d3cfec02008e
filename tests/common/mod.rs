//! Shared integration test helpers for quickterm.
//!
//! This module provides a stub terminal collaborator that records session
//! lifecycle events, plus canonical factory functions used across the
//! `tests/` integration suite.
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attribute
//! suppresses warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use quickterm::{Config, SessionFactory, SessionSpec, TerminalSession};
use std::cell::RefCell;
use std::rc::Rc;

/// Lifecycle record shared between a `StubFactory` and the sessions it
/// creates. The tree is single-threaded, so plain `Rc<RefCell<..>>` is
/// enough.
#[derive(Debug, Default)]
pub struct FactoryLog {
    /// Specs of every session created, in creation order.
    pub created: Vec<SessionSpec>,
    /// Number of sessions terminated so far.
    pub terminated: usize,
    /// Zoom deltas applied across all sessions, in call order.
    pub zoom_deltas: Vec<i32>,
    /// Number of preference reloads across all sessions.
    pub preference_reloads: usize,
    /// Number of screen clears across all sessions.
    pub clears: usize,
}

/// A terminal session that records what the tree asks of it.
pub struct StubSession {
    cwd: Option<String>,
    log: Rc<RefCell<FactoryLog>>,
    /// When set, zoom calls fail (for best-effort broadcast tests).
    fail_zoom: bool,
}

impl StubSession {
    /// Detached session for direct `Pane` construction in unit-style tests.
    pub fn with_cwd(cwd: Option<String>) -> Self {
        Self {
            cwd,
            log: Rc::new(RefCell::new(FactoryLog::default())),
            fail_zoom: false,
        }
    }
}

impl TerminalSession for StubSession {
    fn current_working_directory(&self) -> Option<String> {
        self.cwd.clone()
    }

    fn set_working_directory(&mut self, dir: &str) -> anyhow::Result<()> {
        self.cwd = Some(dir.to_string());
        Ok(())
    }

    fn zoom_by(&mut self, delta: i32) -> anyhow::Result<()> {
        if self.fail_zoom {
            anyhow::bail!("zoom unsupported");
        }
        self.log.borrow_mut().zoom_deltas.push(delta);
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.log.borrow_mut().clears += 1;
        Ok(())
    }

    fn apply_preferences(&mut self, _config: &Config) -> anyhow::Result<()> {
        self.log.borrow_mut().preference_reloads += 1;
        Ok(())
    }

    fn terminate(&mut self) {
        self.log.borrow_mut().terminated += 1;
    }
}

/// Session factory recording every creation, optionally failing after a
/// fixed number of successes.
pub struct StubFactory {
    pub log: Rc<RefCell<FactoryLog>>,
    /// Fail the creation once this many sessions exist.
    pub fail_after: Option<usize>,
    /// Sessions at these creation indices report zoom failures.
    pub fail_zoom_for: Vec<usize>,
}

impl StubFactory {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(FactoryLog::default())),
            fail_after: None,
            fail_zoom_for: Vec::new(),
        }
    }

    /// Factory that refuses to create the `(n+1)`-th session.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    pub fn created_count(&self) -> usize {
        self.log.borrow().created.len()
    }

    pub fn terminated_count(&self) -> usize {
        self.log.borrow().terminated
    }
}

impl SessionFactory for StubFactory {
    fn create(&mut self, spec: &SessionSpec) -> anyhow::Result<Box<dyn TerminalSession>> {
        let mut log = self.log.borrow_mut();
        if self.fail_after.is_some_and(|n| log.created.len() >= n) {
            anyhow::bail!("out of ptys");
        }
        let index = log.created.len();
        log.created.push(spec.clone());
        Ok(Box::new(StubSession {
            cwd: spec.working_directory.clone(),
            log: Rc::clone(&self.log),
            fail_zoom: self.fail_zoom_for.contains(&index),
        }))
    }
}

/// Config with a fixed default working directory and shell, so tests are
/// independent of the host environment.
pub fn test_config() -> Config {
    Config {
        shell: Some("/bin/sh".to_string()),
        working_directory: Some("/home".to_string()),
        use_cwd: true,
        zoom_step: 2,
    }
}
