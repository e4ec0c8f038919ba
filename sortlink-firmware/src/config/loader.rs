//! Embedded node.toml

use sortlink_core::config::{load_node_config, NodeConfig};

/// Configuration embedded at build time
pub const NODE_TOML: &str = include_str!("../../node.toml");

/// Load the embedded configuration, falling back to defaults
pub fn load_config() -> NodeConfig {
    load_node_config(NODE_TOML)
}
