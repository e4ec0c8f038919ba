//! Embassy async tasks
//!
//! Each loop runs independently and communicates through the statics in
//! [`crate::channels`]. They are generic over the transports, so the board
//! crate wraps each in an `#[embassy_executor::task]` with its concrete
//! types.

pub mod bridge;
pub mod central;
pub mod display;
pub mod peripheral;

pub use bridge::bridge_task;
pub use central::central_task;
pub use display::{cargo_display_task, host_display_task};
pub use peripheral::peripheral_task;

use embassy_time::Instant;

/// Milliseconds since boot, the time base of every cargo timestamp
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}
