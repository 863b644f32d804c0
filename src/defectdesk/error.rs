use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefectError {
    /// No probed candidate root accepted a write.
    #[error("Permission denied: no writable storage root ({0})")]
    PermissionDenied(String),

    /// A directory slot in the hierarchy is occupied by something that is not a directory.
    #[error("Path conflict: {0} exists and is not a directory")]
    PathConflict(PathBuf),

    #[error("Could not create directory {path}: {reason}")]
    DirectoryCreationFailed { path: PathBuf, reason: String },

    #[error("Catalog is corrupt: {0}")]
    CorruptCatalog(String),

    #[error("Skipped unreadable entry {path}: {reason}")]
    ScanEntrySkipped { path: PathBuf, reason: String },

    #[error("Reception {manufacturer_code} / {date} already exists")]
    DuplicateReception {
        manufacturer_code: String,
        date: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, DefectError>;
