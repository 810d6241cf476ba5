//! Bulk processing errors
//!
//! - `ArchiveError`: the archive cannot be opened or read. Aborts the batch.
//! - `PairError`: one pair cannot be matched or read. Recorded in the batch
//!   output; the batch continues.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::dispatch::DispatchError;

/// Result type for whole-batch operations
pub type BulkResult<T> = Result<T, ArchiveError>;

/// Hard failure of a whole batch
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read archive {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to allocate scratch directory {path}: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ArchiveError::Open { .. } => "INGEST_ARCHIVE_OPEN",
            ArchiveError::Read { .. } => "INGEST_ARCHIVE_READ",
            ArchiveError::Scratch { .. } => "INGEST_ARCHIVE_SCRATCH",
        }
    }
}

/// Failure of a single grammar/data pair
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    #[error("Pair '{0}' has a data file but no grammar file")]
    MissingGrammar(String),

    #[error("Pair '{0}' has a grammar file but no data file")]
    MissingData(String),

    #[error("Entry '{entry}' could not be read: {reason}")]
    UnreadableEntry { entry: String, reason: String },

    #[error("Entry '{entry}' does not follow the naming convention: {expected}")]
    NamingMismatch { entry: String, expected: String },

    #[error("Entry '{0}' appears more than once")]
    DuplicateEntry(String),

    #[error(transparent)]
    UnknownVariant(#[from] DispatchError),
}

impl PairError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PairError::MissingGrammar(_) => "INGEST_PAIR_MISSING_GRAMMAR",
            PairError::MissingData(_) => "INGEST_PAIR_MISSING_DATA",
            PairError::UnreadableEntry { .. } => "INGEST_PAIR_UNREADABLE_ENTRY",
            PairError::NamingMismatch { .. } => "INGEST_PAIR_NAMING_MISMATCH",
            PairError::DuplicateEntry(_) => "INGEST_PAIR_DUPLICATE_ENTRY",
            PairError::UnknownVariant(_) => "INGEST_PAIR_UNKNOWN_VARIANT",
        }
    }

    pub(crate) fn unreadable(entry: impl Into<String>, reason: impl ToString) -> Self {
        PairError::UnreadableEntry {
            entry: entry.into(),
            reason: reason.to_string(),
        }
    }
}

/// Wire shape: `{ "code": string, "message": string }`
impl Serialize for PairError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PairError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
