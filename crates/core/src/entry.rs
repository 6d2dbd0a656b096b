//! Entry model: a file or directory plus its metadata snapshot

use crate::error::FsError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, DirEntry, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Kind of entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// A filesystem object and the metadata captured when it was read
///
/// `children` only carries meaning for directories: `None` means the
/// directory has not been loaded, `Some(vec![])` means it was loaded and is
/// empty. Views rely on that distinction to decide what to keep current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Kind of entry
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// NFC-normalized base name
    pub name: String,
    /// Absolute native path
    pub path: PathBuf,
    /// `file://` URL addressing the entry
    pub url: String,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Creation time (Unix milliseconds, 0 if unavailable)
    pub date_created: u64,
    /// Modification time (Unix milliseconds, 0 if unavailable)
    pub date_modified: u64,
    /// Last access time (Unix milliseconds, 0 if unavailable)
    pub date_last_opened: u64,
    /// Loaded children of a directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Entry>>,
}

impl Entry {
    /// Read a fresh entry for `path`, following symlinks
    pub fn stat(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
        Self::from_metadata(path, &metadata)
    }

    /// Build an entry from already-read metadata
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Result<Self> {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            return Err(FsError::other(path, "Unsupported entry type"));
        };

        let url = Url::from_file_path(path)
            .map_err(|_| FsError::other(path, "Path is not absolute"))?
            .to_string();

        Ok(Self {
            kind,
            name: display_name(path),
            path: path.to_path_buf(),
            url,
            size: match kind {
                EntryKind::Directory => 0,
                EntryKind::File => metadata.len(),
            },
            date_created: unix_millis(metadata.created()),
            date_modified: unix_millis(metadata.modified()),
            date_last_opened: unix_millis(metadata.accessed()),
            children: None,
        })
    }

    /// Build an entry from a directory listing item
    ///
    /// Uses the metadata the directory read already has where possible;
    /// symlinks are resolved so a link to a directory lists as a directory.
    pub fn from_dir_entry(dir_entry: &DirEntry) -> Result<Self> {
        let path = dir_entry.path();
        let file_type = dir_entry
            .file_type()
            .map_err(|e| FsError::from_io(&path, e))?;

        if file_type.is_symlink() {
            return Self::stat(&path);
        }

        let metadata = dir_entry.metadata().map_err(|e| FsError::from_io(&path, e))?;
        Self::from_metadata(&path, &metadata)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Dot-files are hidden by convention
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Whether this directory's children have been loaded
    pub fn is_loaded(&self) -> bool {
        self.is_dir() && self.children.is_some()
    }

    /// Directory containing this entry
    pub fn parent_path(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Replace the children of a directory entry
    pub fn with_children(mut self, children: Vec<Entry>) -> Self {
        if self.is_dir() {
            self.children = Some(children);
        }
        self
    }
}

/// NFC-normalized display name for `path`
///
/// Filesystem roots have no file name; their full path is used instead.
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().nfc().collect(),
        None => path.to_string_lossy().nfc().collect(),
    }
}

fn unix_millis(time: io::Result<SystemTime>) -> u64 {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
