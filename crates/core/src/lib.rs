//! Entry model and filesystem operations for Burrow
//!
//! This crate provides:
//! - The `Entry` model (file or directory plus a metadata snapshot)
//! - Collision-free naming for new folders and copies
//! - Fallible filesystem operations returning fresh entries
//! - Ancestor-chain tree construction for the navigator

pub mod entry;
pub mod error;
pub mod naming;
pub mod ops;
pub mod root;

// Re-exports
pub use entry::{Entry, EntryKind};
pub use error::FsError;
pub use root::root_entry;

/// Result type for filesystem operations
pub type Result<T, E = FsError> = std::result::Result<T, E>;
