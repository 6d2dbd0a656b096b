//! Filesystem operations returning fresh entries
//!
//! Every operation runs against the real filesystem and either returns
//! newly read `Entry` values or a typed `FsError`. Operations that pick a
//! new name list the destination right before resolving it instead of
//! trusting any cached view, since other processes may be changing the
//! same directory.
//!
//! Batch operations (`stat_many`, `copy`, `move_many`) isolate per-item
//! failures: the item is logged and dropped, the rest of the batch goes on.

use crate::entry::Entry;
use crate::error::FsError;
use crate::naming;
use crate::Result;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Copy names tried before giving up on a destination that keeps colliding
const MAX_COPY_NAME_ATTEMPTS: usize = 64;

/// Stat a single path
pub fn stat(path: &Path) -> Result<Entry> {
    Entry::stat(path)
}

/// Stat many paths, dropping the ones that no longer resolve
pub fn stat_many<P: AsRef<Path>>(paths: &[P]) -> Vec<Entry> {
    paths
        .iter()
        .filter_map(|path| match Entry::stat(path.as_ref()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Dropping {} from batch stat: {}", path.as_ref().display(), e);
                None
            }
        })
        .collect()
}

/// List the direct children of `directory`
///
/// Uses the metadata the directory read provides; children that vanish
/// while the listing is in progress are skipped. Sorted by name.
pub fn list(directory: &Path) -> Result<Vec<Entry>> {
    let read_dir = fs::read_dir(directory).map_err(|e| FsError::from_io(directory, e))?;

    let mut entries = Vec::new();
    for item in read_dir {
        let dir_entry = match item {
            Ok(dir_entry) => dir_entry,
            Err(e) => {
                debug!("Skipping unreadable child of {}: {}", directory.display(), e);
                continue;
            }
        };

        match Entry::from_dir_entry(&dir_entry) {
            Ok(entry) => entries.push(entry),
            Err(e) => debug!("Skipping {}: {}", dir_entry.path().display(), e),
        }
    }

    sort_by_name(&mut entries);
    Ok(entries)
}

/// List the direct children of `directory` with a full stat of each
pub fn list_detailed(directory: &Path) -> Result<Vec<Entry>> {
    let paths = child_paths(directory)?;
    let mut entries = stat_many(&paths);
    sort_by_name(&mut entries);
    Ok(entries)
}

/// Entry for the directory containing `path`
pub fn parent_entry(path: &Path) -> Result<Entry> {
    let parent = path
        .parent()
        .ok_or_else(|| FsError::other(path, "Path has no parent"))?;
    Entry::stat(parent)
}

/// Create a new, uniquely named folder inside `parent`
pub fn create_directory(parent: &Path) -> Result<Entry> {
    let siblings = sibling_names(parent)?;
    let name = naming::resolve_new_folder_name(&siblings);
    let path = parent.join(&name);

    fs::create_dir(&path).map_err(|e| FsError::from_io(&path, e))?;
    debug!("Created directory {}", path.display());

    Entry::stat(&path)
}

/// Copy each of `paths` into `destination` under a collision-free name
///
/// Fails as a whole only if `destination` cannot be listed. Items that
/// fail are logged and left out of the result.
pub fn copy<P: AsRef<Path>>(paths: &[P], destination: &Path) -> Result<Vec<Entry>> {
    // Surface a missing destination before touching any source
    sibling_names(destination)?;

    let mut copied = Vec::with_capacity(paths.len());
    for source in paths {
        let source = source.as_ref();
        match copy_one(source, destination) {
            Ok(entry) => copied.push(entry),
            Err(e) => warn!("Failed to copy {}: {}", source.display(), e),
        }
    }
    Ok(copied)
}

fn copy_one(source: &Path, destination: &Path) -> Result<Entry> {
    if source.file_name().is_none() {
        return Err(FsError::other(source, "Path has no file name"));
    }
    let metadata = fs::metadata(source).map_err(|e| FsError::from_io(source, e))?;

    if metadata.is_dir() && destination.starts_with(source) {
        return Err(FsError::other(source, "Cannot copy a directory into itself"));
    }

    let siblings = sibling_names(destination)?;
    copy_under_free_name(source, destination, siblings)
}

/// Copy `source` into `destination` under the first free copy name
///
/// `siblings` seeds the choice but the filesystem has the last word: a
/// case-insensitive volume holding `Photo.png` also holds `photo.png`.
/// A taken candidate joins the siblings and the next one is tried.
fn copy_under_free_name(
    source: &Path,
    destination: &Path,
    mut siblings: Vec<String>,
) -> Result<Entry> {
    let source_name: String = source
        .file_name()
        .ok_or_else(|| FsError::other(source, "Path has no file name"))?
        .to_string_lossy()
        .nfc()
        .collect();

    if !siblings.contains(&source_name)
        && fs::symlink_metadata(destination.join(&source_name)).is_ok()
    {
        siblings.push(source_name.clone());
    }

    for _ in 0..MAX_COPY_NAME_ATTEMPTS {
        let name = naming::copy_name_for(&source_name, &siblings);
        let target = destination.join(&name);

        match copy_path(source, &target) {
            Ok(()) => {
                debug!("Copied {} to {}", source.display(), target.display());
                return Entry::stat(&target);
            }
            // Nothing was written; the name belongs to someone else
            Err(FsError::AlreadyExists { path }) if path == target => {
                debug!("{} is taken, trying the next copy name", target.display());
                siblings.push(name);
            }
            Err(e) => {
                discard_partial(&target);
                return Err(e);
            }
        }
    }

    Err(FsError::other(source, "No free copy name in destination"))
}

/// Move `path` into the directory `destination`, keeping its name
///
/// Moving an entry onto itself or into the directory that already holds
/// it is a no-op that returns the current entry.
pub fn move_entry(path: &Path, destination: &Path) -> Result<Entry> {
    let file_name = path
        .file_name()
        .ok_or_else(|| FsError::other(path, "Path has no file name"))?;
    let new_path = destination.join(file_name);

    if new_path == path || destination == path {
        return Entry::stat(path);
    }

    fs::symlink_metadata(path).map_err(|e| FsError::from_io(path, e))?;

    if destination.starts_with(path) {
        return Err(FsError::other(path, "Cannot move a directory into itself"));
    }
    if fs::symlink_metadata(&new_path).is_ok() {
        return Err(FsError::AlreadyExists { path: new_path });
    }

    relocate(path, &new_path)?;
    debug!("Moved {} to {}", path.display(), new_path.display());

    Entry::stat(&new_path)
}

/// Move each of `paths` into `destination`, isolating per-item failures
///
/// Each result is paired with the source it came from; a no-op move
/// yields an entry whose path equals its source.
pub fn move_many<P: AsRef<Path>>(paths: &[P], destination: &Path) -> Vec<(PathBuf, Entry)> {
    paths
        .iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match move_entry(path, destination) {
                Ok(entry) => Some((path.to_path_buf(), entry)),
                Err(e) => {
                    warn!("Failed to move {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect()
}

/// Rename `path` to `new_name` within its directory
///
/// The only collision tolerated is the entry itself under a different
/// letter case, which is how a case-only rename looks on a
/// case-insensitive filesystem.
pub fn rename(path: &Path, new_name: &str) -> Result<Entry> {
    if !is_single_component(new_name) {
        return Err(FsError::other(path, format!("Invalid name: {:?}", new_name)));
    }

    let parent = path
        .parent()
        .ok_or_else(|| FsError::other(path, "Path has no parent"))?;
    let new_path = parent.join(new_name);

    if new_path == path {
        return Entry::stat(path);
    }

    fs::symlink_metadata(path).map_err(|e| FsError::from_io(path, e))?;

    if fs::symlink_metadata(&new_path).is_ok() && !is_case_variant(path, &new_path) {
        return Err(FsError::AlreadyExists { path: new_path });
    }

    fs::rename(path, &new_path).map_err(|e| FsError::from_io(path, e))?;
    debug!("Renamed {} to {}", path.display(), new_path.display());

    Entry::stat(&new_path)
}

/// Whether `a` and `b` name the same file and differ only by letter case
pub fn is_case_variant(a: &Path, b: &Path) -> bool {
    let same_name = match (a.file_name(), b.file_name()) {
        (Some(x), Some(y)) => {
            x.to_string_lossy().to_lowercase() == y.to_string_lossy().to_lowercase()
        }
        _ => false,
    };
    same_name && same_file::is_same_file(a, b).unwrap_or(false)
}

/// Move `path` to the platform trash
pub fn trash(path: &Path) -> Result<()> {
    fs::symlink_metadata(path).map_err(|e| FsError::from_io(path, e))?;
    trash::delete(path).map_err(|e| FsError::other(path, e.to_string()))?;
    debug!("Moved {} to trash", path.display());
    Ok(())
}

/// NFC names currently present in `directory`
fn sibling_names(directory: &Path) -> Result<Vec<String>> {
    let read_dir = fs::read_dir(directory).map_err(|e| FsError::from_io(directory, e))?;
    Ok(read_dir
        .filter_map(|item| item.ok())
        .map(|item| item.file_name().to_string_lossy().nfc().collect())
        .collect())
}

fn child_paths(directory: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = fs::read_dir(directory).map_err(|e| FsError::from_io(directory, e))?;
    Ok(read_dir.filter_map(|item| item.ok()).map(|item| item.path()).collect())
}

fn sort_by_name(entries: &mut [Entry]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}

/// Copy a file or a whole directory tree to `target`, which must not exist
fn copy_path(source: &Path, target: &Path) -> Result<()> {
    if fs::symlink_metadata(target).is_ok() {
        return Err(FsError::AlreadyExists {
            path: target.to_path_buf(),
        });
    }

    let metadata = fs::metadata(source).map_err(|e| FsError::from_io(source, e))?;
    if !metadata.is_dir() {
        fs::copy(source, target).map_err(|e| FsError::from_io(source, e))?;
        return Ok(());
    }

    for item in WalkDir::new(source).follow_links(true) {
        let item = item.map_err(|e| walk_error(source, e))?;
        let relative = item
            .path()
            .strip_prefix(source)
            .map_err(|_| FsError::other(item.path(), "Entry outside copied tree"))?;
        let out = target.join(relative);

        if item.file_type().is_dir() {
            fs::create_dir(&out).map_err(|e| FsError::from_io(&out, e))?;
        } else {
            fs::copy(item.path(), &out).map_err(|e| FsError::from_io(item.path(), e))?;
        }
    }
    Ok(())
}

/// Rename, falling back to copy + remove across devices
fn relocate(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!("Rename across devices, copying {} instead", from.display());
            if let Err(e) = copy_path(from, to) {
                discard_partial(to);
                return Err(e);
            }
            let removed = if fs::symlink_metadata(from).map(|m| m.is_dir()).unwrap_or(false) {
                fs::remove_dir_all(from)
            } else {
                fs::remove_file(from)
            };
            removed.map_err(|e| FsError::from_io(from, e))
        }
        Err(e) => Err(FsError::from_io(from, e)),
    }
}

fn is_cross_device(err: &io::Error) -> bool {
    #[cfg(unix)]
    const EXDEV: i32 = 18;
    #[cfg(windows)]
    const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE
    #[cfg(not(any(unix, windows)))]
    const EXDEV: i32 = -1;

    err.raw_os_error() == Some(EXDEV)
}

/// Best-effort removal of a half-written copy
fn discard_partial(target: &Path) {
    let result = match fs::symlink_metadata(target) {
        Ok(m) if m.is_dir() => fs::remove_dir_all(target),
        Ok(_) => fs::remove_file(target),
        Err(_) => return,
    };
    if let Err(e) = result {
        warn!("Failed to clean up partial copy {}: {}", target.display(), e);
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> FsError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(io) => FsError::from_io(&path, io),
        None => FsError::other(&path, "Filesystem loop detected"),
    }
}
