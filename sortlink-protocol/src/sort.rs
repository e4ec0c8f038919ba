//! Sort events reported by the sorting controller over UART
//!
//! Two spellings exist in the field:
//!
//! - `SORT:<0|1|2>` carries the region index directly
//! - `sort_info:id=<hex2>,dir=<char>` carries the parcel id and the chute
//!   direction, which maps onto a region

use core::fmt::Write;

use heapless::String;

use crate::numeric::lenient_hex_u8;

pub const SORT_PREFIX: &[u8] = b"SORT:";
pub const SORT_INFO_PREFIX: &[u8] = b"sort_info:id=";
pub const LINE_PREFIX: &[u8] = b"LINE:";

const DIRECTION_KEY: &[u8] = b"dir=";

/// Shortest `sort_info` frame the controller sends (`sort_info:id=XX,dir=`)
pub const SORT_INFO_MIN_LEN: usize = 20;

/// `sort_info` frames must be shorter than this
pub const SORT_INFO_MAX_LEN: usize = 100;

/// Capacity of a re-encoded `sort_info` frame
pub const MAX_SORT_INFO_LEN: usize = 32;

/// Destination region of a sorted parcel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    Jiangsu,
    Zhejiang,
    Shanghai,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Jiangsu, Region::Zhejiang, Region::Shanghai];

    /// Wire index (0, 1, 2)
    pub fn index(self) -> u8 {
        match self {
            Region::Jiangsu => 0,
            Region::Zhejiang => 1,
            Region::Shanghai => 2,
        }
    }

    /// Parse a wire index
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Region::Jiangsu),
            1 => Some(Region::Zhejiang),
            2 => Some(Region::Shanghai),
            _ => None,
        }
    }

    /// Map a chute direction character onto a region
    ///
    /// Left/A → Jiangsu, Middle/B → Zhejiang, Right/C → Shanghai.
    pub fn from_direction(direction: u8) -> Option<Self> {
        match direction {
            b'L' | b'l' | b'A' | b'a' => Some(Region::Jiangsu),
            b'M' | b'm' | b'B' | b'b' => Some(Region::Zhejiang),
            b'R' | b'r' | b'C' | b'c' => Some(Region::Shanghai),
            _ => None,
        }
    }

    /// Short label used on the displays
    pub fn label(self) -> &'static str {
        match self {
            Region::Jiangsu => "JS",
            Region::Zhejiang => "ZJ",
            Region::Shanghai => "SH",
        }
    }
}

/// Where a sort event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SortSource {
    Uart,
    UdpDirective,
}

/// One parcel sorted into a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SortEvent {
    pub region: Region,
    pub source: SortSource,
}

impl SortEvent {
    pub const fn new(region: Region, source: SortSource) -> Self {
        Self { region, source }
    }
}

/// Raw fields of a `sort_info` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SortInfo {
    /// Parcel id (two hex digits, garbage reads as 0)
    pub id: u8,
    /// Direction character, not yet validated
    pub direction: u8,
}

impl SortInfo {
    /// Region for this direction, if it is a known one
    pub fn region(&self) -> Option<Region> {
        Region::from_direction(self.direction)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parse `sort_info:id=XX,dir=Y` without judging the direction
///
/// Returns `None` when the prefix or the direction character is missing,
/// or when the frame length is outside
/// `SORT_INFO_MIN_LEN..SORT_INFO_MAX_LEN`.
pub fn decode_sort_info(bytes: &[u8]) -> Option<SortInfo> {
    if !(SORT_INFO_MIN_LEN..SORT_INFO_MAX_LEN).contains(&bytes.len()) {
        return None;
    }
    let rest = bytes.strip_prefix(SORT_INFO_PREFIX)?;
    let id = lenient_hex_u8(&rest[..rest.len().min(2)]);

    let key = find(bytes, DIRECTION_KEY)?;
    let direction = *bytes.get(key + DIRECTION_KEY.len())?;

    Some(SortInfo { id, direction })
}

/// Decode a UART sort frame
///
/// `SORT:` with a digit other than 0–2, or a `sort_info` frame with an
/// unknown direction, yields `None`.
pub fn decode_sort_event(bytes: &[u8]) -> Option<SortEvent> {
    if let Some(rest) = bytes.strip_prefix(SORT_PREFIX) {
        let digit = *rest.first()?;
        let region = Region::from_index(digit.wrapping_sub(b'0'))?;
        return Some(SortEvent::new(region, SortSource::Uart));
    }

    let info = decode_sort_info(bytes)?;
    info.region()
        .map(|region| SortEvent::new(region, SortSource::Uart))
}

/// Canonical `sort_info:id=XX,dir=Y` frame, id as two upper-case hex digits
pub fn encode_sort_info(info: &SortInfo) -> String<MAX_SORT_INFO_LEN> {
    let mut frame = String::new();
    let _ = write!(frame, "sort_info:id={:02X},dir={}", info.id, info.direction as char);
    frame
}

/// Parse `LINE:<digit>` (production line selection)
pub fn decode_line_select(bytes: &[u8]) -> Option<u8> {
    let digit = *bytes.strip_prefix(LINE_PREFIX)?.first()?;
    digit.is_ascii_digit().then(|| digit - b'0')
}

/// Encode the acknowledgement written back to the controller
pub fn encode_sort_ack(region: Region) -> String<16> {
    let mut ack = String::new();
    let _ = write!(ack, "SORT_OK:{}", region.index());
    ack
}
