//! In-memory directory views kept consistent with the filesystem
//!
//! This crate provides:
//! - `EntryList`: one directory's flat listing
//! - `EntryTree`: a persistent, lazily populated navigator tree
//! - `Reconciler`: applies watch events and operation results to both

pub mod list;
pub mod reconciler;
pub mod tree;

// Re-exports
pub use list::EntryList;
pub use reconciler::{Applied, EntrySource, Reconciler};
pub use tree::{EntryTree, Node};
