// Error types for the QOV analysis library

use std::path::PathBuf;
use thiserror::Error;

/// Result type for library operations
pub type QovResult<T> = Result<T, QovError>;

/// Fatal errors that stop an analysis before any result is produced.
///
/// Format violations are not errors; they are reported as [`crate::Issue`]s.
#[derive(Debug, Error)]
pub enum QovError {
    /// The input file is missing or unreadable
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The buffer is too short to hold the structure being read
    #[error("insufficient data: need {needed} bytes, have {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A comparison input has no parsed header
    #[error("no header available for {which}")]
    MissingHeader { which: String },
}

impl QovError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        QovError::Io {
            path: path.into(),
            source,
        }
    }
}
