//! Flat listing of one directory

use burrow_core::Entry;
use std::path::{Path, PathBuf};

/// Entries directly inside one directory, unique by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryList {
    directory: PathBuf,
    entries: Vec<Entry>,
}

impl EntryList {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: Vec::new(),
        }
    }

    /// List for `directory` seeded with `entries`
    pub fn with_entries(directory: impl Into<PathBuf>, entries: Vec<Entry>) -> Self {
        let mut list = Self::new(directory);
        list.add(entries);
        list
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// Upsert by path: known paths are replaced in place, new ones appended
    pub fn add<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = Entry>,
    {
        for entry in entries {
            match self.entries.iter_mut().find(|e| e.path == entry.path) {
                Some(existing) => *existing = entry,
                None => self.entries.push(entry),
            }
        }
    }

    /// Drop entries whose path is in `paths`
    pub fn remove<P: AsRef<Path>>(&mut self, paths: &[P]) {
        self.entries
            .retain(|entry| !paths.iter().any(|path| path.as_ref() == entry.path));
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
