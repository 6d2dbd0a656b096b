//! Native event normalization
//!
//! Maps the platform-specific event vocabulary reported by `notify` onto
//! the three kinds subscribers understand. Renames become a delete of the
//! old path and a create of the new one; events too vague to classify are
//! resolved by checking whether the path still exists.

use crate::event::{EventKind, WatchEvent};
use ahash::AHashMap;
use notify::event::{ModifyKind, RenameMode};
use notify::EventKind as NativeKind;
use std::path::{Path, PathBuf};

/// Translate one native event into zero or more watch events
pub fn normalize(event: notify::Event) -> Vec<WatchEvent> {
    let paths = event.paths;

    match event.kind {
        NativeKind::Create(_) => each(EventKind::Create, paths),
        NativeKind::Remove(_) => each(EventKind::Delete, paths),
        NativeKind::Modify(ModifyKind::Name(mode)) => renamed(mode, paths),
        NativeKind::Modify(_) => each(EventKind::Update, paths),
        NativeKind::Access(_) => Vec::new(),
        NativeKind::Any | NativeKind::Other => paths
            .into_iter()
            .map(|path| by_existence(EventKind::Update, path))
            .collect(),
    }
}

/// Keep only events whose parent directory is exactly a watched one
///
/// `watched` maps every spelling a platform may report for a directory
/// (as requested, canonical) to the path it was requested under. Kept
/// events are re-addressed to that path.
pub fn retain_watched(events: &mut Vec<WatchEvent>, watched: &AHashMap<PathBuf, PathBuf>) {
    events.retain_mut(|event| match watched.get(&event.directory_path) {
        Some(requested) => {
            if *requested != event.directory_path {
                if let Some(name) = event.file_path.file_name() {
                    event.file_path = requested.join(name);
                }
                event.directory_path = requested.clone();
            }
            true
        }
        None => false,
    });
}

fn renamed(mode: RenameMode, paths: Vec<PathBuf>) -> Vec<WatchEvent> {
    match mode {
        RenameMode::From => each(EventKind::Delete, paths),
        RenameMode::To => each(EventKind::Create, paths),
        RenameMode::Both => {
            let mut paths = paths.into_iter();
            let mut events = Vec::with_capacity(2);
            if let Some(from) = paths.next() {
                events.push(WatchEvent::deleted(from));
            }
            if let Some(to) = paths.next() {
                events.push(WatchEvent::created(to));
            }
            events
        }
        RenameMode::Any | RenameMode::Other => paths
            .into_iter()
            .map(|path| by_existence(EventKind::Create, path))
            .collect(),
    }
}

fn each(kind: EventKind, paths: Vec<PathBuf>) -> Vec<WatchEvent> {
    paths
        .into_iter()
        .map(|path| WatchEvent::new(kind, path))
        .collect()
}

/// `present` if the path exists now, `delete` otherwise
fn by_existence(present: EventKind, path: PathBuf) -> WatchEvent {
    if exists(&path) {
        WatchEvent::new(present, path)
    } else {
        WatchEvent::deleted(path)
    }
}

fn exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}
