//! Periodic cargo push scheduling
//!
//! The host pushes its full record to the 63B at a fixed cadence while the
//! link is up. There is no change-triggered push; a fresh count reaches the
//! 63B on the next tick.
//!
//! [`LinkTimers`] adds the one-shot follow-ups the central adapter asks for
//! (first push after discovery, rescan after a failure) on the same clock.

use crate::link::Followup;

/// Decides when the next push is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PushScheduler {
    interval_ms: u64,
    /// Time of the last push; survives disconnects
    last_sent: Option<u64>,
}

impl PushScheduler {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sent: None,
        }
    }

    /// Whether a push is due at `now`, without recording it
    pub fn is_due(&self, now: u64, connected: bool) -> bool {
        if !connected {
            return false;
        }
        match self.last_sent {
            None => true,
            Some(last) => now.wrapping_sub(last) >= self.interval_ms,
        }
    }

    /// Check and record a push at `now`
    ///
    /// Returns `true` when the caller should push. The push is recorded
    /// whether or not it then succeeds.
    pub fn poll(&mut self, now: u64, connected: bool) -> bool {
        let due = self.is_due(now, connected);
        if due {
            self.last_sent = Some(now);
        }
        due
    }

    /// Record an out-of-band push (e.g. the one right after discovery)
    pub fn mark_sent(&mut self, now: u64) {
        self.last_sent = Some(now);
    }

    pub fn last_sent(&self) -> Option<u64> {
        self.last_sent
    }
}

/// Timer-driven work for the central task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    /// Send the current snapshot
    Push,
    /// Start seeking again
    Rescan,
}

/// Push cadence plus at most one pending follow-up
///
/// All times are monotonic ms. A newly scheduled follow-up replaces the
/// pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkTimers {
    push: PushScheduler,
    pending: Option<(u64, Followup)>,
}

impl LinkTimers {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            push: PushScheduler::new(interval_ms),
            pending: None,
        }
    }

    /// Arm a follow-up returned by the adapter at `now`
    pub fn schedule(&mut self, now: u64, followup: Followup) {
        let at = now.saturating_add(followup.delay_ms());
        self.pending = Some((at, followup));
    }

    /// When the pending follow-up is due, if any
    pub fn deadline(&self) -> Option<u64> {
        self.pending.map(|(at, _)| at)
    }

    pub fn pending(&self) -> Option<Followup> {
        self.pending.map(|(_, followup)| followup)
    }

    /// Fire the pending follow-up once its deadline has passed
    ///
    /// A follow-up push also restarts the periodic cadence.
    pub fn fire_due(&mut self, now: u64) -> Option<TimerAction> {
        let (at, followup) = self.pending?;
        if now < at {
            return None;
        }
        self.pending = None;

        match followup {
            Followup::PushAfter(_) => {
                self.push.mark_sent(now);
                Some(TimerAction::Push)
            }
            Followup::RescanAfter(_) => Some(TimerAction::Rescan),
        }
    }

    /// Periodic tick; returns `Push` when the cadence says so
    pub fn tick(&mut self, now: u64, connected: bool) -> Option<TimerAction> {
        self.push.poll(now, connected).then_some(TimerAction::Push)
    }

    pub fn push_scheduler(&self) -> &PushScheduler {
        &self.push
    }
}
