//! Directory watching for Burrow
//!
//! This crate provides:
//! - Normalized watch events (`create` / `update` / `delete`)
//! - Per-subscriber, non-recursive watch sessions over native watchers
//! - A session registry owning every native watcher and event channel
//! - Synthesized events for changes the process made itself

pub mod error;
pub mod event;
pub mod normalize;
pub mod registry;
pub mod session;

// Re-exports
pub use error::WatcherError;
pub use event::{EventKind, SubscriberId, WatchEvent};
pub use registry::{EventStream, SessionRegistry};
pub use session::WatchSession;
