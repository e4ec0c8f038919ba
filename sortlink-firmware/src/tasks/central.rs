//! SLE central task (host)
//!
//! Waits on three sources at once:
//! - stack events from the channel
//! - the periodic push ticker
//! - the deadline of a pending follow-up (first push, rescan)
//!
//! The timing decisions live in [`LinkTimers`]; this task only waits and acts.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Instant, Ticker, Timer};

use sortlink_core::config::NodeConfig;
use sortlink_core::link::{Followup, SleCentral};
use sortlink_core::scheduler::{LinkTimers, TimerAction};
use sortlink_hal::SleCentralTransport;

use super::now_ms;
use crate::channels::{CARGO_STORE, CENTRAL_EVENTS, SLE_STATUS};

/// Delay before retrying a seek the stack refused
const SEEK_RETRY_MS: u64 = 1000;

pub async fn central_task<T: SleCentralTransport>(transport: T, config: NodeConfig) {
    info!("SLE central task started");

    let mut central = SleCentral::new(transport, config.link, &SLE_STATUS);
    let mut timers = LinkTimers::new(config.push.interval_ms);
    let mut ticker = Ticker::every(Duration::from_millis(config.push.interval_ms));

    if central.start().is_err() {
        error!("central start failed, retrying seek in {} ms", SEEK_RETRY_MS);
        timers.schedule(now_ms(), Followup::RescanAfter(SEEK_RETRY_MS));
    }

    loop {
        let deadline = timers.deadline().map_or(Instant::MAX, Instant::from_millis);

        let action = match select3(CENTRAL_EVENTS.receive(), ticker.next(), Timer::at(deadline)).await {
            Either3::First(event) => {
                if let Some(followup) = central.handle_event(event) {
                    debug!("follow-up scheduled: {}", followup);
                    timers.schedule(now_ms(), followup);
                }
                None
            }
            Either3::Second(()) => timers.tick(now_ms(), central.is_connected()),
            Either3::Third(()) => timers.fire_due(now_ms()),
        };

        match action {
            Some(TimerAction::Push) => push(&mut central, now_ms()),
            Some(TimerAction::Rescan) => {
                if central.start_scan().is_err() {
                    warn!("seek refused, retrying in {} ms", SEEK_RETRY_MS);
                    timers.schedule(now_ms(), Followup::RescanAfter(SEEK_RETRY_MS));
                }
            }
            None => {}
        }
    }
}

/// Send the current record, stamped with the send time
fn push<T: SleCentralTransport>(central: &mut SleCentral<'_, T>, now: u64) {
    let snapshot = CARGO_STORE.read_snapshot().with_timestamp(now);
    if let Err(e) = central.send_cargo_data(&snapshot) {
        warn!("cargo push skipped: {}", e);
    }
}
