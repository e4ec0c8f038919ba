//! OLED status tasks
//!
//! Both boards recompose their page on a fixed period. The screen buffer
//! only redraws rows whose text changed.

use defmt::*;
use embassy_time::{Duration, Ticker};

use sortlink_display::{cargo_page, host_page, DisplayBackend, Screen};

use crate::channels::{CARGO_STORE, LINE_INDEX, SLE_STATUS};

/// 63B page: link state and the received counters
pub async fn cargo_display_task<B: DisplayBackend>(mut backend: B, refresh_ms: u64) {
    info!("cargo display task started");

    let mut screen = Screen::new();
    if let Err(e) = backend.clear() {
        warn!("display clear failed: {}", e);
    }
    let mut ticker = Ticker::every(Duration::from_millis(refresh_ms));

    loop {
        cargo_page(&mut screen, SLE_STATUS.is_connected(), CARGO_STORE.read_valid());
        render(&mut screen, &mut backend);
        ticker.next().await;
    }
}

/// Host page: production line, local counters and link state
pub async fn host_display_task<B: DisplayBackend>(mut backend: B, refresh_ms: u64) {
    info!("host display task started");

    let mut screen = Screen::new();
    if let Err(e) = backend.clear() {
        warn!("display clear failed: {}", e);
    }
    let mut ticker = Ticker::every(Duration::from_millis(refresh_ms));

    loop {
        host_page(
            &mut screen,
            LINE_INDEX.get(),
            &CARGO_STORE.read_snapshot(),
            SLE_STATUS.is_connected(),
        );
        render(&mut screen, &mut backend);
        ticker.next().await;
    }
}

fn render<B: DisplayBackend>(screen: &mut Screen, backend: &mut B) {
    match screen.render(backend) {
        Ok(0) => {}
        Ok(rows) => trace!("display: {} rows redrawn", rows),
        Err(e) => warn!("display render failed: {}", e),
    }
}
