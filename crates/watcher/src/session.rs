//! One subscriber's watch over a set of directories
//!
//! A session owns a single native watcher registered non-recursively on
//! each directory. Native callbacks are normalized, filtered down to the
//! watched set and pushed into the subscriber's channel. Delivery happens
//! under a read lock on the session's `open` gate and closing takes the
//! write lock, so once `close` returns no callback of this session can
//! deliver, even one that was already in flight.
//!
//! Platforms may report a watched directory under its canonical path
//! (FSEvents resolves `/tmp` to `/private/tmp`); such events are
//! re-addressed to the directory as it was requested.

use crate::error::WatcherError;
use crate::event::{SubscriberId, WatchEvent};
use crate::normalize::{normalize, retain_watched};
use ahash::{AHashMap, AHashSet};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Active watch over a set of directories for one subscriber
pub struct WatchSession {
    subscriber: SubscriberId,
    directories: AHashSet<PathBuf>,
    open: Arc<RwLock<bool>>,
    native: Mutex<Option<RecommendedWatcher>>,
}

impl WatchSession {
    /// Open a session watching `directories`, delivering into `sink`
    ///
    /// Never fails: if the native watcher cannot be created the session
    /// is inert, and directories that cannot be watched are skipped.
    pub fn open<I>(subscriber: SubscriberId, directories: I, sink: UnboundedSender<WatchEvent>) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let directories: AHashSet<PathBuf> = directories.into_iter().collect();
        let open = Arc::new(RwLock::new(true));

        let delivery = Delivery {
            open: Arc::clone(&open),
            watched: spellings(&directories),
            sink,
        };
        let native = match Self::start(&directories, delivery) {
            Ok(native) => Some(native),
            Err(e) => {
                warn!("{}: {}", subscriber, e);
                None
            }
        };

        debug!("{}: watching {} directories", subscriber, directories.len());

        Self {
            subscriber,
            directories,
            open,
            native: Mutex::new(native),
        }
    }

    fn start(
        directories: &AHashSet<PathBuf>,
        delivery: Delivery,
    ) -> Result<RecommendedWatcher, WatcherError> {
        let mut native = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => delivery.deliver(event),
                Err(e) => warn!("Native watcher error: {}", e),
            }
        })?;

        for directory in directories {
            if let Err(e) = Self::watch_directory(&mut native, directory) {
                warn!("{}", e);
            }
        }

        Ok(native)
    }

    fn watch_directory(native: &mut RecommendedWatcher, directory: &Path) -> Result<(), WatcherError> {
        native
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| WatcherError::WatchPath {
                path: directory.to_path_buf(),
                source: e,
            })
    }

    pub fn subscriber(&self) -> SubscriberId {
        self.subscriber
    }

    /// Directories this session was asked to watch
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.directories.iter().map(PathBuf::as_path)
    }

    /// Whether `directory` is in the watched set
    pub fn is_watching(&self, directory: &Path) -> bool {
        self.directories.contains(directory)
    }

    pub fn is_open(&self) -> bool {
        *self.open.read()
    }

    /// Stop delivery and release the native watcher
    ///
    /// Idempotent.
    pub fn close(&self) {
        // Waits for any delivery in progress
        *self.open.write() = false;
        if self.native.lock().take().is_some() {
            debug!("{}: closed watch session", self.subscriber);
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Native callback state: the gate, the path filter and the sink
struct Delivery {
    open: Arc<RwLock<bool>>,
    watched: AHashMap<PathBuf, PathBuf>,
    sink: UnboundedSender<WatchEvent>,
}

impl Delivery {
    fn deliver(&self, event: notify::Event) {
        let open = self.open.read();
        if !*open {
            return;
        }

        let mut events = normalize(event);
        retain_watched(&mut events, &self.watched);
        for event in events {
            if self.sink.send(event).is_err() {
                // Receiver gone; nothing left to deliver to
                break;
            }
        }
    }
}

/// Every path a platform may report for each directory, mapped to the
/// path it was requested under
fn spellings(directories: &AHashSet<PathBuf>) -> AHashMap<PathBuf, PathBuf> {
    let mut watched: AHashMap<PathBuf, PathBuf> = directories
        .iter()
        .map(|directory| (directory.clone(), directory.clone()))
        .collect();

    for directory in directories {
        if let Ok(canonical) = std::fs::canonicalize(directory) {
            watched
                .entry(canonical)
                .or_insert_with(|| directory.clone());
        }
    }
    watched
}
