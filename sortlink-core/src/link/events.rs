//! Events delivered by the SLE stack
//!
//! Vendor callbacks copy their arguments into these owned values and post
//! them to the adapter's task. Payloads longer than
//! [`MAX_EVENT_PAYLOAD`] are truncated; cargo frames are far shorter.

use heapless::Vec;
use sortlink_hal::{ConnId, HandleRange, SleAddr, SleUuid};

/// Largest payload carried by an event
pub const MAX_EVENT_PAYLOAD: usize = 256;

/// Owned event payload
pub type EventPayload = Vec<u8, MAX_EVENT_PAYLOAD>;

/// Copy a callback buffer into an event payload
pub fn payload(data: &[u8]) -> EventPayload {
    let len = data.len().min(MAX_EVENT_PAYLOAD);
    let mut buf = Vec::new();
    // Cannot fail: length is clamped to capacity
    let _ = buf.extend_from_slice(&data[..len]);
    buf
}

/// Peripheral (63B) events
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralEvent {
    /// A central connected
    Connected { conn: ConnId, addr: SleAddr },
    /// The connection dropped
    Disconnected { conn: ConnId, reason: u8 },
    /// The central wrote the cargo property
    WriteRequest {
        conn: ConnId,
        handle: u16,
        /// Stack reported success
        ok: bool,
        data: EventPayload,
    },
    /// The central reads the cargo property
    ReadRequest {
        conn: ConnId,
        request_id: u8,
        handle: u16,
    },
}

/// Connection state reported by the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Central (host) events
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CentralEvent {
    /// An announcing device was seen
    SeekResult { addr: SleAddr },
    /// Connect/disconnect; `paired` reflects the pairing state at that time
    ConnectionChanged {
        conn: ConnId,
        addr: SleAddr,
        state: ConnectionState,
        paired: bool,
        reason: u8,
    },
    PairComplete { conn: ConnId, ok: bool },
    ExchangeInfo { conn: ConnId, ok: bool, mtu: u16 },
    ServiceFound {
        conn: ConnId,
        uuid: SleUuid,
        range: HandleRange,
    },
    PropertyFound {
        conn: ConnId,
        uuid: SleUuid,
        handle: u16,
        /// `OPERATE_*` bits
        operations: u8,
    },
    WriteConfirmed { conn: ConnId, handle: u16, ok: bool },
    /// The peripheral notified a property value
    Notification {
        conn: ConnId,
        handle: u16,
        data: EventPayload,
    },
}

/// Delayed work an adapter asks its task to perform
///
/// Event handlers never sleep; they return a follow-up and the task waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Followup {
    /// Push the current snapshot after this many ms
    PushAfter(u64),
    /// Start seeking again after this many ms
    RescanAfter(u64),
}

impl Followup {
    pub fn delay_ms(&self) -> u64 {
        match *self {
            Followup::PushAfter(ms) | Followup::RescanAfter(ms) => ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_truncates() {
        let long = [b'x'; MAX_EVENT_PAYLOAD + 10];
        assert_eq!(payload(&long).len(), MAX_EVENT_PAYLOAD);
        assert_eq!(payload(b"J:1").as_slice(), b"J:1");
    }
}
