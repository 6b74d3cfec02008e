//! Typed error variants for the pane layout engine.
//!
//! This module provides structured error types so callers at the crate
//! boundary can match on specific failure modes instead of opaque `anyhow`
//! strings. Structural invariant violations (a split with a missing child, a
//! dangling focus reference) have no variant here: they are unreachable
//! through the public API and the test suite keeps them that way.

use crate::pane::PaneId;
use thiserror::Error;

/// Top-level error type for pane tree operations.
///
/// Covers the failure categories callers need to distinguish:
/// - a caller passing a pane reference that is not (or no longer) part of
///   the tree
/// - a persisted layout that cannot be reconstructed
/// - the terminal collaborator refusing to start a session
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The operation referenced a pane that is not a live leaf of this tree.
    ///
    /// This is a programming error on the caller's side; it is always
    /// surfaced and never retried internally.
    #[error("pane {pane} is not a live pane of this tree")]
    InvalidTarget {
        /// The pane id the caller passed.
        pane: PaneId,
    },

    /// A persisted layout descriptor is corrupt or structurally invalid.
    ///
    /// Surfaced to the user as a load failure; the embedding application is
    /// expected to fall back to a single default pane.
    #[error("malformed layout: {reason}")]
    MalformedLayout {
        /// Human-readable description of what is wrong with the descriptor.
        reason: String,
    },

    /// The terminal collaborator could not start a session.
    ///
    /// During `restore` this triggers a full rollback: sessions already
    /// created for the same layout are terminated before this surfaces.
    #[error("session creation failed: {source}")]
    SessionCreationFailed {
        /// Underlying collaborator error.
        #[source]
        source: anyhow::Error,
    },
}

impl LayoutError {
    /// Shorthand for a [`LayoutError::MalformedLayout`] with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        LayoutError::MalformedLayout {
            reason: reason.into(),
        }
    }
}
