//! Configuration type definitions

use heapless::String;
use sortlink_hal::uart::UartConfig;
use sortlink_hal::{SleAddr, SleUuid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum announced device name length
pub const MAX_DEVICE_NAME_LEN: usize = 32;

/// Smallest MTU the SLE stack accepts
pub const MIN_MTU: u16 = 23;

/// Configuration rejected by [`NodeConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Announced name is empty
    EmptyDeviceName,
    /// MTU below [`MIN_MTU`]
    MtuTooSmall,
    /// A period or delay is zero
    ZeroInterval,
    /// Service and property share a UUID
    UuidClash,
}

/// SLE link parameters shared by both boards
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LinkConfig {
    /// 16-bit alias of the cargo service
    pub service_uuid: u16,
    /// 16-bit alias of the cargo property
    pub property_uuid: u16,
    /// Address the 63B announces with; the host only connects to this one
    pub server_addr: [u8; 6],
    /// Address the host uses on air
    pub client_addr: [u8; 6],
    /// Name placed in the scan response
    pub device_name: String<MAX_DEVICE_NAME_LEN>,
    pub announce_handle: u8,
    /// Announce interval in 125 µs slots
    pub announce_interval: u16,
    /// MTU requested after pairing
    pub mtu: u16,
    /// Delay before rescanning when a connect request fails (ms)
    pub connect_retry_ms: u64,
    /// Delay before rescanning after a disconnect (ms)
    pub rescan_delay_ms: u64,
    /// Delay between discovering the write handle and the first push (ms)
    pub first_push_delay_ms: u64,
}

impl LinkConfig {
    pub fn server_addr(&self) -> SleAddr {
        SleAddr::new(self.server_addr)
    }

    pub fn client_addr(&self) -> SleAddr {
        SleAddr::new(self.client_addr)
    }

    pub fn service_uuid(&self) -> SleUuid {
        SleUuid::from_u16(self.service_uuid)
    }

    pub fn property_uuid(&self) -> SleUuid {
        SleUuid::from_u16(self.property_uuid)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        let mut device_name = String::new();
        let _ = device_name.push_str("CARGO_SERVER_63B");
        Self {
            service_uuid: 0xABCD,
            property_uuid: 0x1122,
            server_addr: [0x04, 0x01, 0x06, 0x08, 0x06, 0x03],
            client_addr: [0x13, 0x67, 0x5C, 0x07, 0x00, 0x51],
            device_name,
            announce_handle: 1,
            announce_interval: 0xC8,
            mtu: 512,
            connect_retry_ms: 1000,
            rescan_delay_ms: 2000,
            first_push_delay_ms: 100,
        }
    }
}

/// Periodic host → 63B push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PushConfig {
    /// Minimum spacing between pushes (ms)
    pub interval_ms: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// UART/UDP bridge and display timing on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BridgeConfig {
    pub udp_port: u16,
    pub uart_baud: u32,
    /// Sleep between bridge polls (ms)
    pub poll_interval_ms: u64,
    /// Status page refresh period (ms)
    pub display_refresh_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            udp_port: 5566,
            uart_baud: 115_200,
            poll_interval_ms: 10,
            display_refresh_ms: 500,
        }
    }
}

impl BridgeConfig {
    /// Controller UART settings (8N1 at the configured baud rate)
    pub fn uart_config(&self) -> UartConfig {
        UartConfig {
            baudrate: self.uart_baud,
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NodeConfig {
    pub link: LinkConfig,
    pub push: PushConfig,
    pub bridge: BridgeConfig,
}

impl NodeConfig {
    /// Check values the adapters cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.device_name.is_empty() {
            return Err(ConfigError::EmptyDeviceName);
        }
        if self.link.mtu < MIN_MTU {
            return Err(ConfigError::MtuTooSmall);
        }
        if self.link.service_uuid == self.link.property_uuid {
            return Err(ConfigError::UuidClash);
        }
        let periods = [
            self.push.interval_ms,
            self.bridge.poll_interval_ms,
            self.bridge.display_refresh_ms,
        ];
        if periods.contains(&0) {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
