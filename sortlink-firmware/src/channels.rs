//! Inter-task communication channels
//!
//! Vendor SLE callbacks run in the stack's context and must never block, so
//! they copy their arguments into an owned event and `try_send` it here. A
//! full channel drops the event with a warning.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use sortlink_core::bridge::LineIndex;
use sortlink_core::link::{CentralEvent, LinkStatus, PeripheralEvent};
use sortlink_core::CargoStore;

/// Channel capacity for SLE events
const SLE_EVENT_CHANNEL_SIZE: usize = 8;

/// Cargo counters of this board
pub static CARGO_STORE: CargoStore = CargoStore::new();

/// SLE connection flag read by the display task
pub static SLE_STATUS: LinkStatus = LinkStatus::new();

/// Production line index (host only)
pub static LINE_INDEX: LineIndex = LineIndex::new();

/// Events from the peripheral stack (63B)
pub static PERIPHERAL_EVENTS: Channel<CriticalSectionRawMutex, PeripheralEvent, SLE_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Events from the central stack (host)
pub static CENTRAL_EVENTS: Channel<CriticalSectionRawMutex, CentralEvent, SLE_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Post a peripheral event from a stack callback
///
/// Returns `false` when the event was dropped.
pub fn post_peripheral_event(event: PeripheralEvent) -> bool {
    match PERIPHERAL_EVENTS.try_send(event) {
        Ok(()) => true,
        Err(_) => {
            warn!("peripheral event channel full, event dropped");
            false
        }
    }
}

/// Post a central event from a stack callback
///
/// Returns `false` when the event was dropped.
pub fn post_central_event(event: CentralEvent) -> bool {
    match CENTRAL_EVENTS.try_send(event) {
        Ok(()) => true,
        Err(_) => {
            warn!("central event channel full, event dropped");
            false
        }
    }
}
