//! SLE link adapters
//!
//! Each adapter is an explicit state machine driven by [`events`]. It owns
//! its transport and [`LinkState`]; the only things it shares are the
//! [`CargoStore`](crate::store::CargoStore) and a [`LinkStatus`] flag.

pub mod central;
pub mod events;
pub mod peripheral;
pub mod state;

pub use central::{CentralState, SendError, SleCentral};
pub use events::{payload, CentralEvent, ConnectionState, EventPayload, Followup, PeripheralEvent};
pub use peripheral::{PeripheralState, SlePeripheral};
pub use state::{LinkState, LinkStatus};

/// Transport failure, tagged with the step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Service or property registration
    Register(E),
    /// Announce configuration or start
    Announce(E),
    /// Local address setup
    Address(E),
    /// Seek start
    Seek(E),
}
