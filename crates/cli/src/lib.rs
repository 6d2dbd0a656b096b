//! Burrow service layer
//!
//! This crate provides:
//! - `Browser`: the async command surface over filesystem operations and
//!   watch sessions
//! - System configuration (`config.toml`)
//! - A file-backed session store

pub mod browser;
pub mod session_store;
pub mod system_config;

// Re-exports
pub use browser::{Browser, NoThumbnails, ThumbnailProvider};
pub use session_store::{JsonSessionStore, SessionStore};
pub use system_config::SystemConfig;
