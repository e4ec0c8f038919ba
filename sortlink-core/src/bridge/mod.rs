//! UART/UDP bridge (host board)
//!
//! Couples the sorting controller on UART with the companion app on UDP:
//!
//! - sort frames from the controller increment the cargo store and are
//!   acknowledged with `SORT_OK:<d>`
//! - every controller line is mirrored to the last app peer seen
//! - app directives become 5-byte command frames or store queries
//!
//! The bridge owns both ports. It shares only the cargo store and the
//! production line index shown on the display.

mod uart;
mod udp;

use heapless::Vec;
use portable_atomic::{AtomicU8, Ordering};
use sortlink_hal::{DatagramSocket, SocketAddr, UartRx, UartTx};
use sortlink_protocol::SortEvent;

use crate::store::CargoStore;

pub use uart::{MIN_LINE_LEN, UART_READ_LEN};
pub use udp::UDP_RECV_LEN;

/// Bytes of a controller line kept for `_refresh`
pub const BOX_LABEL_LEN: usize = 9;

/// Production line index, written by the bridge and read by the display
pub struct LineIndex {
    index: AtomicU8,
}

impl LineIndex {
    pub const fn new() -> Self {
        Self {
            index: AtomicU8::new(0),
        }
    }

    pub fn set(&self, index: u8) {
        self.index.store(index, Ordering::Relaxed);
    }

    pub fn get(&self) -> u8 {
        self.index.load(Ordering::Relaxed)
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridge between the controller UART and the app socket
pub struct Bridge<'a, U, S> {
    uart: U,
    socket: S,
    store: &'a CargoStore,
    line_index: &'a LineIndex,
    /// Mirror target; the most recent datagram sender
    peer: Option<SocketAddr>,
    /// Head of the last controller line
    box_label: Vec<u8, BOX_LABEL_LEN>,
}

impl<'a, U, S> Bridge<'a, U, S>
where
    U: UartTx + UartRx,
    S: DatagramSocket,
{
    pub fn new(uart: U, socket: S, store: &'a CargoStore, line_index: &'a LineIndex) -> Self {
        Self {
            uart,
            socket,
            store,
            line_index,
            peer: None,
            box_label: Vec::new(),
        }
    }

    /// One UART poll followed by one UDP poll
    pub fn poll(&mut self, now: u64) {
        self.poll_uart(now);
        self.poll_udp(now);
    }

    /// Current mirror peer, if any datagram has arrived
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn box_label(&self) -> &[u8] {
        &self.box_label
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn socket(&self) -> &S {
        &self.socket
    }

    fn count_sort(&mut self, event: SortEvent, now: u64) {
        let snapshot = self.store.apply_increment(event.region, now);
        info!(
            "sorted into {} ({}): {}",
            event.region.label(),
            event.source,
            snapshot
        );
    }

    fn write_uart(&mut self, data: &[u8]) {
        if self.uart.write_blocking(data).is_err() {
            warn!("uart write failed ({} bytes)", data.len());
        }
    }

    fn send_to(&mut self, data: &[u8], addr: &SocketAddr) {
        if self.socket.send_to(data, addr).is_err() {
            warn!("udp send to {} failed", addr);
        }
    }
}
