//! Keyed session storage
//!
//! Small pieces of state a front end wants back on the next run, such as
//! the last directory it showed. `JsonSessionStore` keeps them as one JSON
//! object on disk.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Key under which the last listed directory is remembered
pub const LAST_DIRECTORY_KEY: &str = "lastDirectory";

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Failed to write session file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key/value store that survives restarts
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;
}

/// Session store backed by a JSON object file
pub struct JsonSessionStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonSessionStore {
    /// Open the store at `path`
    ///
    /// A missing file starts empty; an unreadable or corrupt one is
    /// logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring corrupt session file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read session file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Open `session.json` inside `directory`
    pub fn in_directory(directory: &Path) -> Self {
        Self::open(directory.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), SessionStoreError> {
        let io_error = |source| SessionStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        // Write then rename so a crash never leaves half a file behind
        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_error)?;
        std::fs::rename(&tmp, &self.path).map_err(io_error)
    }
}

impl SessionStore for JsonSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}
