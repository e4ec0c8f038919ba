//! Board-agnostic core logic for the SortLink boards
//!
//! This crate contains everything that does not touch a vendor SDK:
//!
//! - Cargo store shared between tasks
//! - SLE peripheral (63B) and central (host) adapters
//! - Push scheduler for the host → 63B cargo frames
//! - UART/UDP bridge on the host
//! - Configuration types and `node.toml` parsing
//!
//! Hardware is reached only through the traits in `sortlink-hal`, so all of
//! it runs under `cargo test` on the host with mock transports.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// toml parsing allocates; the board crate provides the global allocator
#[cfg(feature = "toml")]
extern crate alloc;

// Must come first so the log macros are visible in every module
mod fmt;

pub mod bridge;
pub mod config;
pub mod link;
pub mod scheduler;
pub mod store;

pub use store::CargoStore;
