//! Persistent navigator tree
//!
//! The tree is immutable: every change produces a new `EntryTree` that
//! shares all untouched subtrees with the old one through `Arc` nodes.
//! `patch` is the only way in. It walks from the root towards a directory
//! path, only descending into children whose path is a prefix of the
//! target, and rebuilds just the nodes on that walk.
//!
//! A directory node with `children == None` is unpopulated. Changes aimed
//! at an unpopulated or unknown directory leave the tree untouched, so
//! events never populate anything by themselves.

use burrow_core::{Entry, EntryKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One tree node: an entry snapshot plus its loaded children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    entry: Entry,
    children: Option<Vec<Arc<Node>>>,
}

impl Node {
    /// Build a node from an entry, converting any loaded children
    pub fn from_entry(mut entry: Entry) -> Self {
        let children = entry.children.take().map(|children| {
            children
                .into_iter()
                .map(|child| Arc::new(Node::from_entry(child)))
                .collect()
        });
        Self { entry, children }
    }

    /// Entry snapshot without children
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn path(&self) -> &Path {
        &self.entry.path
    }

    pub fn children(&self) -> Option<&[Arc<Node>]> {
        self.children.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.children.is_some()
    }

    /// Recursive snapshot back into an `Entry`
    pub fn to_entry(&self) -> Entry {
        let mut entry = self.entry.clone();
        entry.children = self
            .children
            .as_ref()
            .map(|children| children.iter().map(|child| child.to_entry()).collect());
        entry
    }

    fn with_children(&self, children: Option<Vec<Arc<Node>>>) -> Node {
        Node {
            entry: self.entry.clone(),
            children,
        }
    }
}

/// Immutable, structurally shared tree of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTree {
    root: Arc<Node>,
}

impl EntryTree {
    /// Wrap a filesystem root entry in the synthetic top node
    ///
    /// The synthetic node has an empty name and path; its only child is
    /// `root` with whatever children it already carries.
    pub fn new(root: Entry) -> Self {
        let top = Node {
            entry: synthetic_entry(),
            children: Some(vec![Arc::new(Node::from_entry(root))]),
        };
        Self { root: Arc::new(top) }
    }

    /// The synthetic top node
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Find the node at `path`
    pub fn get(&self, path: &Path) -> Option<&Arc<Node>> {
        let mut node = &self.root;
        loop {
            if node.path() == path {
                return Some(node);
            }
            node = node
                .children()?
                .iter()
                .find(|child| path.starts_with(child.path()))?;
        }
    }

    /// Replace the node at `directory` with whatever `f` returns
    ///
    /// `f` returning `None` (or no node at `directory`) yields a tree equal
    /// to `self` and sharing its root.
    pub fn patch<F>(&self, directory: &Path, f: F) -> EntryTree
    where
        F: FnOnce(&Node) -> Option<Node>,
    {
        let mut f = Some(f);
        match patch_node(&self.root, directory, &mut f) {
            Some(root) => EntryTree { root },
            None => self.clone(),
        }
    }

    /// Insert or replace `entry` inside its parent, if the parent is loaded
    ///
    /// A replaced directory keeps its loaded children.
    pub fn upsert(&self, entry: Entry) -> EntryTree {
        let Some(parent) = entry.path.parent().map(Path::to_path_buf) else {
            return self.clone();
        };

        self.patch(&parent, move |node| {
            let children = node.children.as_ref()?;
            let mut children = children.clone();

            let mut incoming = Node::from_entry(entry);
            match children.iter().position(|c| c.path() == incoming.path()) {
                Some(i) => {
                    if incoming.children.is_none() && incoming.entry.kind == EntryKind::Directory {
                        incoming.children = children[i].children.clone();
                    }
                    children[i] = Arc::new(incoming);
                }
                None => {
                    let at = children
                        .iter()
                        .position(|c| c.entry.name > incoming.entry.name)
                        .unwrap_or(children.len());
                    children.insert(at, Arc::new(incoming));
                }
            }
            Some(node.with_children(Some(children)))
        })
    }

    /// Remove the entry at `path` from its loaded parent
    pub fn remove(&self, path: &Path) -> EntryTree {
        let Some(parent) = path.parent() else {
            return self.clone();
        };

        self.patch(parent, |node| {
            let children = node.children.as_ref()?;
            if !children.iter().any(|c| c.path() == path) {
                return None;
            }
            let kept = children
                .iter()
                .filter(|c| c.path() != path)
                .cloned()
                .collect();
            Some(node.with_children(Some(kept)))
        })
    }

    /// Populate the directory at `directory` with `children`
    pub fn set_children(&self, directory: &Path, children: Vec<Entry>) -> EntryTree {
        self.patch(directory, |node| {
            if node.entry.kind != EntryKind::Directory {
                return None;
            }
            let children = children
                .into_iter()
                .map(|child| Arc::new(Node::from_entry(child)))
                .collect();
            Some(node.with_children(Some(children)))
        })
    }

    /// Forget the children of `directory`, making it unpopulated again
    pub fn unload(&self, directory: &Path) -> EntryTree {
        self.patch(directory, |node| {
            node.children.as_ref()?;
            Some(node.with_children(None))
        })
    }

    /// Paths of all populated directories, in tree order
    ///
    /// These are the directories worth watching.
    pub fn loaded_directories(&self) -> Vec<PathBuf> {
        let mut loaded = Vec::new();
        let mut stack: Vec<&Arc<Node>> = self.root.children().unwrap_or_default().iter().rev().collect();
        while let Some(node) = stack.pop() {
            if let Some(children) = node.children() {
                loaded.push(node.path().to_path_buf());
                stack.extend(children.iter().rev());
            }
        }
        loaded
    }

    /// Snapshot of the whole tree, synthetic top node included
    pub fn to_entry(&self) -> Entry {
        self.root.to_entry()
    }
}

fn patch_node<F>(node: &Arc<Node>, directory: &Path, f: &mut Option<F>) -> Option<Arc<Node>>
where
    F: FnOnce(&Node) -> Option<Node>,
{
    if node.path() == directory {
        let f = f.take()?;
        return f(node).map(Arc::new);
    }

    let children = node.children.as_ref()?;
    let (i, child) = children
        .iter()
        .enumerate()
        .find(|(_, child)| directory.starts_with(child.path()))?;

    let replaced = patch_node(child, directory, f)?;
    let mut rebuilt = children.clone();
    rebuilt[i] = replaced;
    Some(Arc::new(node.with_children(Some(rebuilt))))
}

fn synthetic_entry() -> Entry {
    Entry {
        kind: EntryKind::Directory,
        name: String::new(),
        path: PathBuf::new(),
        url: String::new(),
        size: 0,
        date_created: 0,
        date_modified: 0,
        date_last_opened: 0,
        children: None,
    }
}
