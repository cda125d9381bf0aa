//! Error types for tunesync

use std::path::PathBuf;

/// Contract violations on selection-aware lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("index {index} out of range for a list of {len} element(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no element is selected")]
    NoSelection,
}

/// Errors surfaced by the library workflows
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("failed to read tags from {path:?}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("no metadata tag found in {0:?}")]
    MissingTag(PathBuf),

    #[error("cannot access {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid search pattern")]
    Pattern(#[from] regex::Error),

    #[error("failed to scan {path:?}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Result type specialized for tunesync
pub type Result<T> = std::result::Result<T, Error>;
