//! SLE (short-range wireless link) abstractions
//!
//! The vendor stack is callback driven. Requests go down through the
//! transport traits below; completions come back up as events that board
//! glue forwards to the adapters in `sortlink-core`. Every request here only
//! *submits* work and returns, the result arrives later as an event.

/// Length of an SLE device address in bytes
pub const SLE_ADDR_LEN: usize = 6;

/// Length of a full SLE UUID in bytes
pub const SLE_UUID_LEN: usize = 16;

/// Connection identifier assigned by the stack
pub type ConnId = u16;

/// Property may be read by the peer
pub const PERMISSION_READ: u8 = 0x01;
/// Property may be written by the peer
pub const PERMISSION_WRITE: u8 = 0x02;

/// Operation indication bits advertised for a property
pub const OPERATE_READ: u8 = 0x01;
pub const OPERATE_WRITE: u8 = 0x04;

/// SLE device address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleAddr(pub [u8; SLE_ADDR_LEN]);

impl SleAddr {
    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; SLE_ADDR_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; SLE_ADDR_LEN] {
        &self.0
    }
}

/// SLE UUID as delivered by the stack
///
/// Short (2-byte) UUIDs are carried inside the vendor base UUID with the
/// 16-bit value in the last two bytes, little-endian. Full 16-byte UUIDs
/// use the same position for their short alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleUuid {
    bytes: [u8; SLE_UUID_LEN],
    len: u8,
}

impl SleUuid {
    /// Vendor base UUID ("sle_test" followed by zeros)
    pub const BASE: [u8; SLE_UUID_LEN] = [
        0x73, 0x6C, 0x65, 0x5F, 0x74, 0x65, 0x73, 0x74, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ];

    /// Build a short UUID on top of the base UUID
    pub const fn from_u16(value: u16) -> Self {
        let mut bytes = Self::BASE;
        bytes[14] = value as u8;
        bytes[15] = (value >> 8) as u8;
        Self { bytes, len: 2 }
    }

    /// Wrap raw bytes and the length reported by the stack
    pub const fn from_raw(bytes: [u8; SLE_UUID_LEN], len: u8) -> Self {
        Self { bytes, len }
    }

    /// Reported length (2 or 16 for well-formed UUIDs)
    pub fn reported_len(&self) -> u8 {
        self.len
    }

    /// Raw UUID bytes
    pub fn bytes(&self) -> &[u8; SLE_UUID_LEN] {
        &self.bytes
    }

    /// 16-bit alias taken from the trailing two bytes
    ///
    /// Returns `None` for lengths other than 2 and 16.
    pub fn short(&self) -> Option<u16> {
        match self.len {
            2 | 16 => Some(u16::from_le_bytes([self.bytes[14], self.bytes[15]])),
            _ => None,
        }
    }

    /// Check whether this UUID carries the given 16-bit alias
    pub fn matches(&self, value: u16) -> bool {
        self.short() == Some(value)
    }
}

/// Inclusive attribute handle range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandleRange {
    pub start: u16,
    pub end: u16,
}

impl HandleRange {
    /// The whole attribute table
    pub const FULL: Self = Self {
        start: 0x0001,
        end: 0xFFFF,
    };

    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

/// Property registered by the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub uuid: SleUuid,
    /// `PERMISSION_*` bits
    pub permissions: u8,
    /// `OPERATE_*` bits
    pub operations: u8,
}

/// Handles assigned when a service is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceHandles {
    pub server_id: u8,
    pub service: u16,
    pub property: u16,
}

/// Announce configuration for the peripheral
///
/// Announces are always connectable and scannable.
#[derive(Debug, Clone, Copy)]
pub struct AnnounceConfig<'a> {
    /// Announce set handle
    pub handle: u8,
    /// Address the peripheral announces with
    pub own_addr: SleAddr,
    /// Complete local name placed in the scan response
    pub device_name: &'a str,
    /// Announce interval in 125 µs slots
    pub interval: u16,
}

/// Seek (scan) parameters for the central
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekParams {
    /// Active scanning requests scan responses; passive only listens
    pub active: bool,
    pub interval: u16,
    pub window: u16,
}

impl Default for SeekParams {
    fn default() -> Self {
        Self {
            active: false,
            interval: 0x60,
            window: 0x30,
        }
    }
}

/// Peripheral-side SLE stack
pub trait SlePeripheralTransport {
    /// Error type reported by the stack
    type Error;

    /// Register a server with one service holding one property, and start it
    fn add_service(
        &mut self,
        service: SleUuid,
        property: &PropertyDescriptor,
    ) -> Result<ServiceHandles, Self::Error>;

    /// Set announce parameters and announce/scan-response data
    fn configure_announce(&mut self, config: &AnnounceConfig<'_>) -> Result<(), Self::Error>;

    /// Start (or restart) announcing on a configured handle
    fn start_announce(&mut self, handle: u8) -> Result<(), Self::Error>;

    /// Answer a read request on the registered property
    fn respond_read(&mut self, conn: ConnId, request_id: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Central-side SLE stack
pub trait SleCentralTransport {
    /// Error type reported by the stack
    type Error;

    /// Set the address this device uses on air
    fn set_local_addr(&mut self, addr: &SleAddr) -> Result<(), Self::Error>;

    /// Configure and start seeking
    fn start_seek(&mut self, params: &SeekParams) -> Result<(), Self::Error>;

    /// Stop seeking
    fn stop_seek(&mut self) -> Result<(), Self::Error>;

    /// Request a connection to a discovered device
    fn connect(&mut self, addr: &SleAddr) -> Result<(), Self::Error>;

    /// Request pairing with a connected device
    fn pair(&mut self, addr: &SleAddr) -> Result<(), Self::Error>;

    /// Request an information (MTU) exchange
    fn exchange_info(&mut self, conn: ConnId, mtu: u16) -> Result<(), Self::Error>;

    /// Discover primary services in a handle range
    fn find_services(&mut self, conn: ConnId, range: HandleRange) -> Result<(), Self::Error>;

    /// Discover properties in a handle range
    fn find_properties(&mut self, conn: ConnId, range: HandleRange) -> Result<(), Self::Error>;

    /// Submit a write request; confirmation arrives as an event
    fn write_request(&mut self, conn: ConnId, handle: u16, data: &[u8]) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_uuid_uses_trailing_bytes() {
        let uuid = SleUuid::from_u16(0xABCD);
        assert_eq!(uuid.reported_len(), 2);
        assert_eq!(uuid.bytes()[14], 0xCD);
        assert_eq!(uuid.bytes()[15], 0xAB);
        assert!(uuid.matches(0xABCD));
    }

    #[test]
    fn test_full_uuid_compares_trailing_bytes() {
        let mut bytes = [0x11u8; SLE_UUID_LEN];
        bytes[14] = 0x22;
        bytes[15] = 0x11;
        let uuid = SleUuid::from_raw(bytes, 16);
        assert_eq!(uuid.short(), Some(0x1122));
        assert!(!uuid.matches(0xABCD));
    }

    #[test]
    fn test_unsupported_uuid_length() {
        let uuid = SleUuid::from_raw(*SleUuid::from_u16(0xABCD).bytes(), 4);
        assert_eq!(uuid.short(), None);
        assert!(!uuid.matches(0xABCD));
    }
}
