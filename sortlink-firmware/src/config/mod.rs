//! Configuration loading
//!
//! The node configuration is compiled in from `node.toml`, which build.rs
//! has already validated.

pub mod loader;

pub use loader::{load_config, NODE_TOML};
