//! Cargo frame encoding and decoding
//!
//! Frame format (ASCII, no terminator on the wire):
//!
//! ```text
//! J:<jiangsu>,Z:<zhejiang>,S:<shanghai>,T:<timestamp>
//! ```
//!
//! The decoder accepts the fields in any order, skips unknown tokens and
//! succeeds once at least three of the four prefixes were seen, so the
//! timestamp is optional.

use core::fmt::Write;

use heapless::String;

use crate::numeric::{lenient_u32, lenient_u64};
use crate::sort::Region;

/// Encoded frames always fit in this many bytes (127 payload + spare)
pub const MAX_CARGO_FRAME_LEN: usize = 128;

/// Input beyond this many bytes is ignored by the decoder
pub const MAX_DECODE_INPUT: usize = 255;

/// Minimum number of recognized fields for a frame to be accepted
const MIN_FIELDS: usize = 3;

/// Decoded frame fields: (jiangsu, zhejiang, shanghai, timestamp)
pub type CargoFields = (u32, u32, u32, u64);

/// Point-in-time copy of the three regional counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CargoSnapshot {
    pub jiangsu: u32,
    pub zhejiang: u32,
    pub shanghai: u32,
    /// Monotonic tick (ms) of the last update
    pub timestamp: u64,
    /// False until the first increment or replace
    pub valid: bool,
}

impl CargoSnapshot {
    /// All counters zero, not yet valid
    pub const EMPTY: Self = Self {
        jiangsu: 0,
        zhejiang: 0,
        shanghai: 0,
        timestamp: 0,
        valid: false,
    };

    /// Create a valid snapshot
    pub const fn new(jiangsu: u32, zhejiang: u32, shanghai: u32, timestamp: u64) -> Self {
        Self {
            jiangsu,
            zhejiang,
            shanghai,
            timestamp,
            valid: true,
        }
    }

    /// Create a valid snapshot from decoded frame fields
    pub const fn from_fields(fields: CargoFields) -> Self {
        Self::new(fields.0, fields.1, fields.2, fields.3)
    }

    /// Counter for one region
    pub fn count(&self, region: Region) -> u32 {
        match region {
            Region::Jiangsu => self.jiangsu,
            Region::Zhejiang => self.zhejiang,
            Region::Shanghai => self.shanghai,
        }
    }

    /// Copy with a different timestamp
    pub fn with_timestamp(self, timestamp: u64) -> Self {
        Self { timestamp, ..self }
    }

    /// The fields carried by a cargo frame
    pub fn fields(&self) -> CargoFields {
        (self.jiangsu, self.zhejiang, self.shanghai, self.timestamp)
    }
}

/// Encode a snapshot as `J:%u,Z:%u,S:%u,T:%llu`
///
/// The longest possible frame is 61 bytes, well inside the buffer.
pub fn encode_cargo_frame(snapshot: &CargoSnapshot) -> String<MAX_CARGO_FRAME_LEN> {
    let mut frame = String::new();
    // Cannot fail: capacity exceeds the longest rendering
    let _ = write!(
        frame,
        "J:{},Z:{},S:{},T:{}",
        snapshot.jiangsu, snapshot.zhejiang, snapshot.shanghai, snapshot.timestamp
    );
    frame
}

/// Decode a cargo frame
///
/// Input is cut at the first NUL byte and at `MAX_DECODE_INPUT` bytes.
/// Tokens are split on `,`; at most four recognized tokens are consumed
/// (repeats count, the last value wins). Returns `None` when fewer than
/// three were recognized.
pub fn decode_cargo_frame(bytes: &[u8]) -> Option<CargoFields> {
    let bytes = &bytes[..bytes.len().min(MAX_DECODE_INPUT)];
    let bytes = match bytes.iter().position(|&b| b == 0) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    };

    let (mut jiangsu, mut zhejiang, mut shanghai, mut timestamp) = (0u32, 0u32, 0u32, 0u64);
    let mut recognized = 0usize;

    for token in bytes.split(|&b| b == b',').filter(|t| !t.is_empty()) {
        if recognized >= 4 {
            break;
        }
        match token {
            [b'J', b':', rest @ ..] => jiangsu = lenient_u32(rest),
            [b'Z', b':', rest @ ..] => zhejiang = lenient_u32(rest),
            [b'S', b':', rest @ ..] => shanghai = lenient_u32(rest),
            [b'T', b':', rest @ ..] => timestamp = lenient_u64(rest),
            _ => continue,
        }
        recognized += 1;
    }

    if recognized >= MIN_FIELDS {
        Some((jiangsu, zhejiang, shanghai, timestamp))
    } else {
        None
    }
}
