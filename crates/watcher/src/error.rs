//! Error types for watch acquisition

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while acquiring native watch resources
///
/// These never reach subscribers; sessions log them and keep going with
/// whatever could be watched.
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to create watcher: {0}")]
    WatcherCreation(#[from] notify::Error),

    #[error("Failed to watch path {path}: {source}")]
    WatchPath {
        path: PathBuf,
        source: notify::Error,
    },
}
