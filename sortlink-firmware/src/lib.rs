//! SortLink firmware task loops
//!
//! Board crates (WS63 host, 63B display node) link this library. They own
//! the vendor SDK glue: pin setup, the global allocator, the Wi-Fi bring-up
//! and the SLE callback shims that post into [`channels`]. Everything above
//! that lives here:
//!
//! - static cargo store and link flags shared between tasks
//! - event channels fed by the SLE callbacks
//! - `node.toml` loading
//! - async task loops for the adapters, the bridge and the displays
//!
//! The task loops are generic over the transports, so a board wraps each in
//! a concrete `#[embassy_executor::task]` and spawns it.

#![no_std]
#![deny(unsafe_code)]

pub mod channels;
pub mod config;
pub mod tasks;
