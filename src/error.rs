//! Fatal error kinds.
//!
//! Functions in this crate return [`anyhow::Result`]. Structural failures are
//! raised as a [`CharacterizationError`] inside the `anyhow::Error`, so callers
//! that need to tell them apart can use `err.downcast_ref::<CharacterizationError>()`.

use std::path::PathBuf;

use thiserror::Error;

use crate::UID;

/// Which kind of network index a mapping error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Zone,
    Path,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Zone => f.write_str("zone number"),
            IndexKind::Path => f.write_str("path number"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CharacterizationError {
    #[error("{kind} {index} is shared by '{first}' and '{second}'")]
    NonInjectiveIndex {
        kind: IndexKind,
        index: u32,
        first: UID,
        second: UID,
    },

    #[error("{kind} for '{entity}' must be 1-based, got 0")]
    InvalidIndex { kind: IndexKind, entity: UID },

    #[error("{kind} {index} for '{entity}' exceeds the {count} entries of the network")]
    IndexOutOfRange {
        kind: IndexKind,
        entity: UID,
        index: u32,
        count: usize,
    },

    #[error("zone '{zone}' holds more than one space ('{first}', '{second}')")]
    MultipleSpacesInZone { zone: UID, first: UID, second: UID },

    #[error("expected {expected} zone results, simulator returned {found} ({context})")]
    ResultLengthMismatch {
        expected: usize,
        found: usize,
        context: String,
    },

    #[error("unexpected result series shape: {0}")]
    UnexpectedSeriesShape(String),

    #[error("{exterior} exterior surfaces but only {resolved} resolved to a network path")]
    UnresolvedSurfacePaths { exterior: usize, resolved: usize },

    #[error("failed to start '{}': {source}", program.display())]
    LaunchFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to complete '{}': {reason}", program.display())]
    CompletionFailed { program: PathBuf, reason: String },

    #[error("translated network is steady-state only; a transient run needs start and end times")]
    NotTransient,

    #[error("unknown airtightness level '{0}' (expected Tight, Average or Leaky)")]
    InvalidAirtightness(String),
}
