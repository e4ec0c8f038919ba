//! Screen buffer and status pages for the SortLink boards
//!
//! Both boards carry a 128×64 SSD1306 with a 6×8 font, which gives an
//! 8-row by 21-column character grid. This crate provides:
//! - `DisplayBackend` trait, implemented by the board's OLED driver
//! - `Screen`, a character buffer that redraws only changed rows
//! - Status page composition for the host and the 63B
//!
//! The pixel driver itself stays with the board code.

#![no_std]

pub mod backend;
pub mod screen;
pub mod status;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
pub use status::{cargo_page, host_page};
