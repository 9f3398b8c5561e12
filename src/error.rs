//! Error types shared by every archive operation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, JarError>;

/// Errors raised while reading, extracting or cataloging archives.
#[derive(Debug, Error)]
pub enum JarError {
    /// A required argument was empty or inconsistent. Raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The archive or directory does not exist or cannot be opened.
    #[error("not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The ZIP container or its manifest cannot be parsed.
    #[error("corrupt archive {}: {reason}", path.display())]
    CorruptArchive { path: PathBuf, reason: String },

    /// An output directory could not be created. Aborts extraction.
    #[error("failed to create directory {}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or writing a single entry failed.
    #[error("failed to extract entry {entry}")]
    EntryIo {
        entry: String,
        #[source]
        source: io::Error,
    },

    /// The archive declares a `Jar-Type` that is not recognised.
    #[error("unrecognized jar type: {0:?}")]
    InvalidType(String),
}

impl JarError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        JarError::InvalidArgument(message.into())
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        JarError::CorruptArchive {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
