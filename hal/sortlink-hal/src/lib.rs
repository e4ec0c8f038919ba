//! SortLink Hardware Abstraction Layer
//!
//! This crate defines the traits the link adapters are written against.
//! Board support code (the WS63 host board and the 63B display board)
//! implements them on top of the vendor SDK, and the core crate's tests
//! implement them with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  sortlink-core / sortlink-firmware      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sortlink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  WS63 board   │       │   63B board   │
//! │  glue (C SDK) │       │  glue (C SDK) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial link to the sorting controller
//! - [`net::DatagramSocket`] - UDP socket towards the companion app
//! - [`sle::SleCentralTransport`], [`sle::SlePeripheralTransport`] - SLE stack

#![no_std]
#![deny(unsafe_code)]

pub mod net;
pub mod sle;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use net::{DatagramSocket, SocketAddr};
pub use sle::{ConnId, HandleRange, SleAddr, SleCentralTransport, SlePeripheralTransport, SleUuid};
pub use uart::{UartRx, UartTx};
