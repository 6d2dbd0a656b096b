//! Reconciler: the only writer of in-memory views
//!
//! Watch events carry no entry data, so `create` and `update` are answered
//! with a fresh stat through an `EntrySource`. Every application is an
//! upsert or a remove, which makes duplicate and reordered events harmless.

use crate::list::EntryList;
use crate::tree::EntryTree;
use async_trait::async_trait;
use burrow_core::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use watcher::{EventKind, WatchEvent};

/// Read access to the filesystem for the reconciler
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fresh entry for `path`
    async fn stat(&self, path: &Path) -> burrow_core::Result<Entry>;

    /// Children of `directory`
    async fn list(&self, directory: &Path) -> burrow_core::Result<Vec<Entry>>;
}

/// What handling one event did to the views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Entry inserted or replaced
    Upserted(Entry),
    /// Entry at this path removed
    Removed(PathBuf),
    /// Stat failed for a reason other than the entry vanishing
    Ignored,
}

/// Flat lists keyed by directory plus an optional navigator tree
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    tree: Option<EntryTree>,
    lists: BTreeMap<PathBuf, EntryList>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(tree: EntryTree) -> Self {
        Self {
            tree: Some(tree),
            lists: BTreeMap::new(),
        }
    }

    pub fn tree(&self) -> Option<&EntryTree> {
        self.tree.as_ref()
    }

    pub fn set_tree(&mut self, tree: Option<EntryTree>) {
        self.tree = tree;
    }

    pub fn list(&self, directory: &Path) -> Option<&EntryList> {
        self.lists.get(directory)
    }

    pub fn lists(&self) -> impl Iterator<Item = &EntryList> {
        self.lists.values()
    }

    /// Track `list`, replacing any list for the same directory
    pub fn insert_list(&mut self, list: EntryList) {
        self.lists.insert(list.directory().to_path_buf(), list);
    }

    pub fn remove_list(&mut self, directory: &Path) -> Option<EntryList> {
        self.lists.remove(directory)
    }

    /// List `directory` through `source` and start tracking it
    pub async fn open_list<S>(&mut self, directory: &Path, source: &S) -> burrow_core::Result<&EntryList>
    where
        S: EntrySource + ?Sized,
    {
        let entries = source.list(directory).await?;
        let list = EntryList::with_entries(directory, entries);
        self.lists.insert(directory.to_path_buf(), list);
        Ok(&self.lists[directory])
    }

    /// Apply one watch event
    pub async fn handle<S>(&mut self, event: &WatchEvent, source: &S) -> Applied
    where
        S: EntrySource + ?Sized,
    {
        match event.kind {
            EventKind::Delete => self.removed(&event.file_path),
            EventKind::Create | EventKind::Update => match source.stat(&event.file_path).await {
                Ok(entry) => {
                    self.apply_entries(std::slice::from_ref(&entry));
                    Applied::Upserted(entry)
                }
                // Gone again before we looked; same as a delete
                Err(e) if e.is_not_found() => self.removed(&event.file_path),
                Err(e) => {
                    warn!("Ignoring {} event for {}: {}", event.kind, event.file_path.display(), e);
                    Applied::Ignored
                }
            },
        }
    }

    fn removed(&mut self, path: &Path) -> Applied {
        self.apply_removed(&[path]);
        Applied::Removed(path.to_path_buf())
    }

    /// Upsert entries returned by a local operation into every view
    pub fn apply_entries(&mut self, entries: &[Entry]) {
        for entry in entries {
            if let Some(list) = entry.parent_path().and_then(|p| self.lists.get_mut(p)) {
                list.add(std::iter::once(entry.clone()));
            }
            if let Some(tree) = self.tree.as_mut() {
                *tree = tree.upsert(entry.clone());
            }
        }
    }

    /// Remove paths reported gone by a local operation from every view
    pub fn apply_removed<P: AsRef<Path>>(&mut self, paths: &[P]) {
        for path in paths {
            let path = path.as_ref();
            if let Some(list) = path.parent().and_then(|p| self.lists.get_mut(p)) {
                list.remove(&[path]);
            }
            if let Some(tree) = self.tree.as_mut() {
                *tree = tree.remove(path);
            }
        }
    }

    /// Populate the tree node at `directory`
    ///
    /// Does nothing for directories the tree does not reach.
    pub async fn expand<S>(&mut self, directory: &Path, source: &S) -> burrow_core::Result<()>
    where
        S: EntrySource + ?Sized,
    {
        let Some(tree) = self.tree.as_ref() else {
            return Ok(());
        };
        if tree.get(directory).is_none() {
            debug!("Not expanding {}: not in tree", directory.display());
            return Ok(());
        }

        let children = source.list(directory).await?;
        self.tree = Some(tree.set_children(directory, children));
        Ok(())
    }

    /// Make the tree node at `directory` unpopulated again
    pub fn collapse(&mut self, directory: &Path) {
        if let Some(tree) = self.tree.as_mut() {
            *tree = tree.unload(directory);
        }
    }

    /// Directories the views need watched: every list plus every loaded
    /// tree directory
    pub fn watch_targets(&self) -> Vec<PathBuf> {
        let mut targets: BTreeSet<PathBuf> = self.lists.keys().cloned().collect();
        if let Some(tree) = self.tree.as_ref() {
            targets.extend(tree.loaded_directories());
        }
        targets.into_iter().collect()
    }
}
