//! Watch events and subscriber identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Type of directory change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Entry appeared
    Create,
    /// Entry contents or metadata changed
    Update,
    /// Entry disappeared
    Delete,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Create => write!(f, "create"),
            EventKind::Update => write!(f, "update"),
            EventKind::Delete => write!(f, "delete"),
        }
    }
}

/// A change to one entry inside a watched directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEvent {
    /// Type of change
    pub kind: EventKind,
    /// Directory containing the changed entry
    pub directory_path: PathBuf,
    /// Changed entry
    pub file_path: PathBuf,
}

impl WatchEvent {
    /// Event for `file_path`, addressed to the directory containing it
    pub fn new(kind: EventKind, file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let directory_path = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            kind,
            directory_path,
            file_path,
        }
    }

    pub fn created(file_path: impl Into<PathBuf>) -> Self {
        Self::new(EventKind::Create, file_path)
    }

    pub fn updated(file_path: impl Into<PathBuf>) -> Self {
        Self::new(EventKind::Update, file_path)
    }

    pub fn deleted(file_path: impl Into<PathBuf>) -> Self {
        Self::new(EventKind::Delete, file_path)
    }
}

/// Identity of one event consumer (a window or view surface)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(pub u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

impl From<u64> for SubscriberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
