//! SortLink frame codec
//!
//! Every frame in the system is short ASCII text, except the 5-byte command
//! frame sent to the sorting controller.
//!
//! # Frames
//!
//! ```text
//! SLE cargo frame      J:<u32>,Z:<u32>,S:<u32>,T:<u64>        host ↔ 63B
//! UART sort frame      SORT:<0|1|2>                            controller → host
//!                      sort_info:id=<hex2>,dir=<char>
//! UART sort ack        SORT_OK:<0|1|2>                         host → controller
//! UART command frame   ┌──────┬────┬─────────────┐             host → controller
//!                      │ 0xFF │ op │ d  d  d     │
//!                      └──────┴────┴─────────────┘
//! UDP directives       CONNECT_REQUEST, _cargo_status, ...     app → host
//! ```
//!
//! Decoding is deliberately permissive: numbers parse like C `atoi`
//! (garbage reads as 0) and unknown tokens are skipped. Nothing in here
//! allocates or panics on malformed input.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod cargo;
pub mod command;
pub mod directive;
mod numeric;
pub mod sort;

pub use cargo::{decode_cargo_frame, encode_cargo_frame, CargoFields, CargoSnapshot, MAX_CARGO_FRAME_LEN};
pub use command::{UartCommand, COMMAND_FRAME_LEN, COMMAND_SYNC};
pub use directive::{encode_cargo_status, parse_directive, Directive};
pub use sort::{
    decode_line_select, decode_sort_event, decode_sort_info, encode_sort_ack, encode_sort_info,
    Region, SortEvent, SortInfo, SortSource,
};
