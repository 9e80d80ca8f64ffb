//! Error types for project and file-list operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::FileId;

/// Errors from opening or reading project files.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// No file at the path (or on any include search path).
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file id that does not belong to this project.
    #[error("unknown file id {0}")]
    UnknownFile(FileId),
}

impl ProjectError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from reading or parsing a file list.
#[derive(Debug, Error)]
pub enum FileListError {
    #[error("failed to read file list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An option line other than `+incdir+`. `line` is 1-based.
    #[error("line {line}: unsupported option `{text}`")]
    Malformed { line: usize, text: String },
}
