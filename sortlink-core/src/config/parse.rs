//! `node.toml` parsing
//!
//! Every key is optional; a missing key keeps its default. Parsed values go
//! through [`NodeConfig::validate`] before use.

use super::types::{ConfigError, NodeConfig};

/// Why a configuration text was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// TOML syntax or type mismatch
    Toml,
    /// Parsed, but values are unusable
    Invalid(ConfigError),
}

/// Parse and validate a configuration text
pub fn parse_node_config(text: &str) -> Result<NodeConfig, LoadError> {
    let config: NodeConfig = toml::from_str(text).map_err(|e| {
        warn!("node.toml: {}", e.message());
        LoadError::Toml
    })?;
    config.validate().map_err(LoadError::Invalid)?;
    Ok(config)
}

/// Parse a configuration text, falling back to defaults when rejected
pub fn load_node_config(text: &str) -> NodeConfig {
    match parse_node_config(text) {
        Ok(config) => {
            info!("loaded configuration from node.toml");
            config
        }
        Err(e) => {
            error!("node.toml rejected ({}), using defaults", e);
            NodeConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;

    const SHIPPED: &str = include_str!("../../../sortlink-firmware/node.toml");

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [link]
            device_name = "LINE_B_63B"
            server_addr = [1, 2, 3, 4, 5, 6]

            [push]
            interval_ms = 250
        "#;
        let config = parse_node_config(text).unwrap();
        assert_eq!(config.link.device_name.as_str(), "LINE_B_63B");
        assert_eq!(config.link.server_addr().as_bytes(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(config.link.mtu, 512);
        assert_eq!(config.push.interval_ms, 250);
        assert_eq!(config.bridge, BridgeConfig::default());
    }

    #[test]
    fn test_shipped_file_is_valid() {
        let config = parse_node_config(SHIPPED).unwrap();
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn test_empty_text_is_defaults() {
        assert_eq!(parse_node_config(""), Ok(NodeConfig::default()));
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert_eq!(parse_node_config("[link\nmtu = 512"), Err(LoadError::Toml));
        assert_eq!(parse_node_config("[link]\nmtu = \"big\""), Err(LoadError::Toml));
        assert_eq!(parse_node_config("[push]\ninterval_ms = -1"), Err(LoadError::Toml));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_eq!(
            parse_node_config("[push]\ninterval_ms = 0"),
            Err(LoadError::Invalid(ConfigError::ZeroInterval))
        );
        assert_eq!(
            parse_node_config("[link]\nmtu = 10"),
            Err(LoadError::Invalid(ConfigError::MtuTooSmall))
        );
        assert_eq!(
            parse_node_config("[link]\ndevice_name = \"\""),
            Err(LoadError::Invalid(ConfigError::EmptyDeviceName))
        );
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        assert_eq!(load_node_config("not = [toml"), NodeConfig::default());
        assert_eq!(load_node_config("[link]\nmtu = 10"), NodeConfig::default());

        let config = load_node_config("[bridge]\nudp_port = 6000");
        assert_eq!(config.bridge.udp_port, 6000);
    }
}
