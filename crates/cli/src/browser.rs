//! Browser service: the command surface a front end talks to
//!
//! Filesystem operations run on Tokio's blocking pool and resolve to fresh
//! entries. Operations whose effects native watchers may report late or
//! not at all (trash, moves, case-only renames) also synthesize watch
//! events, delivered after the operation's result.

use async_trait::async_trait;
use burrow_core::{ops, Entry, FsError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use view::EntrySource;
use watcher::{EventStream, SessionRegistry, SubscriberId, WatchEvent};

/// Source of preview images for entries
pub trait ThumbnailProvider: Send + Sync {
    /// URL of a thumbnail for `path`, if one is available
    fn thumbnail(&self, path: &Path) -> Option<String>;
}

/// Provider that never has a thumbnail
#[derive(Debug, Default, Clone, Copy)]
pub struct NoThumbnails;

impl ThumbnailProvider for NoThumbnails {
    fn thumbnail(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Filesystem operations plus watch sessions for any number of subscribers
#[derive(Clone)]
pub struct Browser {
    registry: SessionRegistry,
    thumbnails: Arc<dyn ThumbnailProvider>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser {
    pub fn new() -> Self {
        Self::with_thumbnails(Arc::new(NoThumbnails))
    }

    pub fn with_thumbnails(thumbnails: Arc<dyn ThumbnailProvider>) -> Self {
        Self {
            registry: SessionRegistry::new(),
            thumbnails,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Direct children of `directory` from the directory read alone
    pub async fn list_entries(&self, directory: &Path) -> Result<Vec<Entry>> {
        let owned = directory.to_path_buf();
        blocking(directory, move || ops::list(&owned)).await
    }

    /// Direct children of `directory`, each fully stat'ed
    pub async fn list_entries_detailed(&self, directory: &Path) -> Result<Vec<Entry>> {
        let owned = directory.to_path_buf();
        blocking(directory, move || ops::list_detailed(&owned)).await
    }

    /// Stat every path, dropping those that do not resolve
    pub async fn stat_entries(&self, paths: &[PathBuf]) -> Vec<Entry> {
        let paths = paths.to_vec();
        blocking(Path::new(""), move || Ok(ops::stat_many(&paths)))
            .await
            .unwrap_or_else(|e| {
                warn!("Batch stat failed: {}", e);
                Vec::new()
            })
    }

    pub async fn stat_entry(&self, path: &Path) -> Result<Entry> {
        let owned = path.to_path_buf();
        blocking(path, move || ops::stat(&owned)).await
    }

    pub async fn parent_entry(&self, path: &Path) -> Result<Entry> {
        let owned = path.to_path_buf();
        blocking(path, move || ops::parent_entry(&owned)).await
    }

    /// Filesystem root with the ancestor chain of `path` loaded
    pub async fn root_entry(&self, path: &Path) -> Result<Entry> {
        let owned = path.to_path_buf();
        blocking(path, move || burrow_core::root_entry(&owned)).await
    }

    /// Create a uniquely named folder inside `parent`
    pub async fn create_directory(&self, parent: &Path) -> Result<Entry> {
        let owned = parent.to_path_buf();
        blocking(parent, move || ops::create_directory(&owned)).await
    }

    /// Copy `paths` into `destination` under collision-free names
    pub async fn copy_entries(&self, paths: &[PathBuf], destination: &Path) -> Result<Vec<Entry>> {
        let sources = paths.to_vec();
        let dest = destination.to_path_buf();
        blocking(destination, move || ops::copy(&sources, &dest)).await
    }

    /// Move `path` into `destination`
    pub async fn move_entry(&self, path: &Path, destination: &Path) -> Result<Entry> {
        let source = path.to_path_buf();
        let destination = destination.to_path_buf();
        let entry = blocking(path, move || ops::move_entry(&source, &destination)).await?;

        if entry.path != path {
            self.registry.synthesize(moved_events(path, &entry.path));
        }
        Ok(entry)
    }

    /// Move each of `paths` into `destination`, skipping failures
    pub async fn move_entries(&self, paths: &[PathBuf], destination: &Path) -> Vec<Entry> {
        let sources = paths.to_vec();
        let dest = destination.to_path_buf();
        let moved = blocking(destination, move || Ok(ops::move_many(&sources, &dest)))
            .await
            .unwrap_or_else(|e| {
                warn!("Batch move failed: {}", e);
                Vec::new()
            });

        let events = moved
            .iter()
            .filter(|(source, entry)| entry.path != *source)
            .flat_map(|(source, entry)| moved_events(source, &entry.path))
            .collect();
        self.registry.synthesize(events);

        moved.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Rename `path` within its directory
    pub async fn rename_entry(&self, path: &Path, new_name: &str) -> Result<Entry> {
        let source = path.to_path_buf();
        let name = new_name.to_string();
        let entry = blocking(path, move || ops::rename(&source, &name)).await?;

        if is_case_only_change(path, &entry.path) {
            debug!("Case-only rename of {}", path.display());
            self.registry.synthesize(vec![WatchEvent::deleted(path)]);
        }
        Ok(entry)
    }

    /// Move `path` to the platform trash
    pub async fn trash_entry(&self, path: &Path) -> Result<()> {
        let target = path.to_path_buf();
        blocking(path, move || ops::trash(&target)).await?;
        self.registry.synthesize(vec![WatchEvent::deleted(path)]);
        Ok(())
    }

    /// Trash each of `paths`, returning the ones that went
    pub async fn trash_entries(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut trashed = Vec::with_capacity(paths.len());
        for path in paths {
            match self.trash_entry(path).await {
                Ok(()) => trashed.push(path.clone()),
                Err(e) => warn!("Failed to trash {}: {}", path.display(), e),
            }
        }
        trashed
    }

    /// Register a subscriber and return its event stream
    pub fn connect(&self, id: SubscriberId) -> EventStream {
        self.registry.connect(id)
    }

    /// Replace the directories watched for `id`
    pub fn watch(&self, id: SubscriberId, directories: Vec<PathBuf>) {
        self.registry.watch(id, directories);
    }

    pub fn unwatch(&self, id: SubscriberId) {
        self.registry.unwatch(id);
    }

    pub fn disconnect(&self, id: SubscriberId) {
        self.registry.disconnect(id);
    }

    pub fn thumbnail(&self, path: &Path) -> Option<String> {
        self.thumbnails.thumbnail(path)
    }
}

#[async_trait]
impl EntrySource for Browser {
    async fn stat(&self, path: &Path) -> Result<Entry> {
        self.stat_entry(path).await
    }

    async fn list(&self, directory: &Path) -> Result<Vec<Entry>> {
        self.list_entries(directory).await
    }
}

/// Run a filesystem operation on the blocking pool
async fn blocking<T, F>(path: &Path, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| FsError::other(path, format!("Operation aborted: {}", e)))?
}

fn moved_events(from: &Path, to: &Path) -> Vec<WatchEvent> {
    vec![WatchEvent::deleted(from), WatchEvent::created(to)]
}

/// Same directory, different name, equal ignoring case
fn is_case_only_change(old: &Path, new: &Path) -> bool {
    if old == new || old.parent() != new.parent() {
        return false;
    }
    match (old.file_name(), new.file_name()) {
        (Some(a), Some(b)) => a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase(),
        _ => false,
    }
}
