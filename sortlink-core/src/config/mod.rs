//! Node configuration
//!
//! Defaults match the deployed boards. With the `toml` feature the firmware
//! overrides them from an embedded `node.toml`.

#[cfg(feature = "toml")]
pub mod parse;
pub mod types;

#[cfg(feature = "toml")]
pub use parse::{load_node_config, parse_node_config, LoadError};
pub use types::*;
