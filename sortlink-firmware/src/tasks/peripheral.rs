//! SLE peripheral task (63B)
//!
//! Registers the cargo service, then drives the adapter from the event
//! channel.

use defmt::*;
use embassy_time::{Duration, Timer};

use sortlink_core::config::LinkConfig;
use sortlink_core::link::SlePeripheral;
use sortlink_hal::SlePeripheralTransport;

use crate::channels::{CARGO_STORE, PERIPHERAL_EVENTS, SLE_STATUS};

/// Delay between failed registration attempts
const START_RETRY_MS: u64 = 1000;

pub async fn peripheral_task<T: SlePeripheralTransport>(transport: T, config: LinkConfig) {
    info!("SLE peripheral task started");

    let mut peripheral = SlePeripheral::new(transport, config, &CARGO_STORE, &SLE_STATUS);

    while peripheral.start().is_err() {
        error!("cargo service start failed, retrying in {} ms", START_RETRY_MS);
        Timer::after(Duration::from_millis(START_RETRY_MS)).await;
    }

    loop {
        let event = PERIPHERAL_EVENTS.receive().await;
        peripheral.handle_event(event);
    }
}
