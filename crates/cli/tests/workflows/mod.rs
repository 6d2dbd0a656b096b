//! Workflow integration tests
//!
//! Tests for complete workflows that exercise the browser service with
//! live watch sessions, and the `bw` binary end to end.

pub mod browser;
pub mod commands;
