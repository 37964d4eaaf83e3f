//! Infrastructure adapters for buffers, config, policy, and file watching.

pub mod buffer;
pub mod config;
pub mod policy;
pub mod watch;
