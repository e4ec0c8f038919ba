//! UART/UDP bridge task (host)

use defmt::*;
use embassy_time::{Duration, Ticker};

use sortlink_core::bridge::Bridge;
use sortlink_core::config::BridgeConfig;
use sortlink_hal::{DatagramSocket, UartRx, UartTx};

use super::now_ms;
use crate::channels::{CARGO_STORE, LINE_INDEX};

/// Poll both directions, then sleep for the poll interval
///
/// `uart` must already be opened with `config.uart_config()` and `socket`
/// bound to `config.udp_port`.
pub async fn bridge_task<U, S>(uart: U, socket: S, config: BridgeConfig)
where
    U: UartTx + UartRx,
    S: DatagramSocket,
{
    info!(
        "bridge task started: UDP port {}, {}",
        config.udp_port,
        config.uart_config()
    );

    let mut bridge = Bridge::new(uart, socket, &CARGO_STORE, &LINE_INDEX);
    let mut ticker = Ticker::every(Duration::from_millis(config.poll_interval_ms));

    loop {
        bridge.poll(now_ms());
        ticker.next().await;
    }
}
