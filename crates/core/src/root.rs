//! Ancestor-chain tree builder
//!
//! Produces the filesystem root entry with only the directories leading to
//! a target path populated, which is what a navigator needs to reveal one
//! location without reading the rest of the disk.

use crate::entry::Entry;
use crate::ops;
use crate::Result;
use std::path::Path;

/// Filesystem root entry with the ancestor chain of `path` loaded
///
/// Every ancestor from the root down to `path` has its children populated;
/// `path` itself is populated too when it is a directory. All other
/// directories in those listings stay unloaded.
pub fn root_entry(path: &Path) -> Result<Entry> {
    let target = Entry::stat(path)?;
    let mut node = if target.is_dir() {
        let children = ops::list(path)?;
        target.with_children(children)
    } else {
        target
    };

    // Walk upwards, splicing the loaded node into each parent listing
    for ancestor in path.ancestors().skip(1) {
        let mut children = ops::list(ancestor)?;
        match children.iter_mut().find(|child| child.path == node.path) {
            Some(slot) => *slot = node,
            None => {
                // Listing raced with a removal or the name differs in form
                children.push(node);
                children.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
        node = Entry::stat(ancestor)?.with_children(children);
    }

    Ok(node)
}
