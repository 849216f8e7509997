//! JSON-file record store.
//!
//! # Responsibility
//! - Provide CRUD, search and backup/restore over `notes.json` and `tasks.json`.
//! - Own the atomic write protocol used by every persisting operation.
//!
//! # Invariants
//! - Every operation reloads its collection from disk; nothing is cached.
//! - A persisted collection is either the old or the new complete version.
//! - Update of a missing id fails with `NotFound`; delete of a missing id is a no-op.

use crate::model::record::{RecordId, RecordKind, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod backup;
pub mod json_file;
pub mod record_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for persistence and record lookups.
#[derive(Debug)]
pub enum StoreError {
    /// No record with this id exists in the collection.
    NotFound { kind: RecordKind, id: RecordId },
    /// A record with this id already exists in the collection.
    DuplicateId { kind: RecordKind, id: RecordId },
    /// Record fields violate write rules.
    Validation(RecordValidationError),
    /// File exists but is not a valid document.
    MalformedStorage {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Filesystem failure while reading, staging or renaming.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns whether the caller can treat this as an expected condition.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::DuplicateId { .. } | Self::Validation(_)
        )
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::DuplicateId { kind, id } => write!(f, "{kind} already exists: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::MalformedStorage { path, source } => {
                write!(f, "failed to read JSON from {}: {source}", path.display())
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } | Self::DuplicateId { .. } => None,
            Self::Validation(err) => Some(err),
            Self::MalformedStorage { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}
