// ⚠️ Error Taxonomy
// Per-cell problems never reach this type: they degrade to missing markers.
// Per-file problems skip one file; the rest are terminal for the run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the merge pipeline
#[derive(Error, Debug)]
pub enum MergeError {
    /// Source file cannot be opened or parsed in any supported format
    #[error("cannot read {file}: {reason}")]
    UnreadableFile { file: String, reason: String },

    /// No row starts a numeric-indexed data region
    #[error("no table found in {file}")]
    NoTableFound { file: String },

    /// Every input file was skipped
    #[error("no data collected from any input file")]
    NoDataCollected,

    /// Destination cannot be written
    #[error("failed to write {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Company mapping file cannot be read
    #[error("cannot read company mapping {}: {source}", path.display())]
    MappingUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pipeline configuration file is unreadable or malformed
    #[error("invalid configuration {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
}

impl MergeError {
    pub fn unreadable(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::UnreadableFile {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        Self::OutputWriteFailure {
            path: path.into(),
            source: source.into(),
        }
    }

    /// True for failures that only cost one file's contribution
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            MergeError::UnreadableFile { .. } | MergeError::NoTableFound { .. }
        )
    }
}

/// Result type for the merge pipeline
pub type Result<T> = std::result::Result<T, MergeError>;
