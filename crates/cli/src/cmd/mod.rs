//! CLI command implementations

pub mod config;
pub mod cp;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod rename;
pub mod stat;
pub mod trash;
pub mod tree;
pub mod watch;
