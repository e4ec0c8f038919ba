//! Per-adapter link state

use portable_atomic::{AtomicBool, Ordering};
use sortlink_hal::ConnId;

/// Connection bookkeeping owned by one SLE adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkState {
    connected: bool,
    peer_handle: Option<ConnId>,
    write_handle: Option<u16>,
}

impl LinkState {
    pub const fn new() -> Self {
        Self {
            connected: false,
            peer_handle: None,
            write_handle: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn peer_handle(&self) -> Option<ConnId> {
        self.peer_handle
    }

    pub fn write_handle(&self) -> Option<u16> {
        self.write_handle
    }

    /// Record a new connection; any stale write handle is dropped
    pub fn connect(&mut self, conn: ConnId) {
        self.connected = true;
        self.peer_handle = Some(conn);
        self.write_handle = None;
    }

    /// Record the discovered write handle
    ///
    /// Ignored (returns `false`) when not connected.
    pub fn set_write_handle(&mut self, handle: u16) -> bool {
        if !self.connected {
            return false;
        }
        self.write_handle = Some(handle);
        true
    }

    /// Clear everything, whatever the previous state
    pub fn disconnect(&mut self) {
        *self = Self::new();
    }
}

/// Connected flag published by an adapter for other tasks
///
/// The display task reads this instead of touching the adapter.
pub struct LinkStatus {
    connected: AtomicBool,
}

impl LinkStatus {
    pub const fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::new()
    }
}
