//! Typed failures for filesystem operations

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a filesystem operation
///
/// Batch operations drop `NotFound` items instead of failing; everything
/// else is handed back to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("No such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("A file or directory with that name already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: {message}", path.display())]
    Other { path: PathBuf, message: String },
}

impl FsError {
    /// Map an I/O error on `path` into the typed taxonomy
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Other {
                path,
                message: err.to_string(),
            },
        }
    }

    /// Build an `Other` failure with a fixed reason
    pub fn other(path: &Path, message: impl Into<String>) -> Self {
        Self::Other {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Path the failure refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::AlreadyExists { path }
            | Self::PermissionDenied { path }
            | Self::Other { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
