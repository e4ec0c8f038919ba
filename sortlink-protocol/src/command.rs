//! 5-byte command frame for the sorting controller
//!
//! ```text
//! ┌──────┬────┬────┬────┬────┐
//! │ 0xFF │ op │ d2 │ d1 │ d0 │   d* are ASCII digits
//! └──────┴────┴────┴────┴────┘
//! ```

/// Frame sync byte
pub const COMMAND_SYNC: u8 = 0xFF;

/// Encoded frame length
pub const COMMAND_FRAME_LEN: usize = 5;

/// Command for the sorting controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartCommand {
    /// Operation byte (ASCII)
    pub op: u8,
    /// Three ASCII digits
    pub param: [u8; 3],
}

impl UartCommand {
    pub const fn new(op: u8, param: [u8; 3]) -> Self {
        Self { op, param }
    }

    /// Single-character device command, parameter `000`
    pub const fn device(op: u8) -> Self {
        Self::new(op, *b"000")
    }

    /// Build from a number below 1000, rendered as three digits
    pub fn with_value(op: u8, value: u16) -> Option<Self> {
        if value >= 1000 {
            return None;
        }
        let digit = |n: u16| b'0' + (n % 10) as u8;
        Some(Self::new(op, [digit(value / 100), digit(value / 10), digit(value)]))
    }

    pub fn encode(&self) -> [u8; COMMAND_FRAME_LEN] {
        [
            COMMAND_SYNC,
            self.op,
            self.param[0],
            self.param[1],
            self.param[2],
        ]
    }

    /// Decode a frame; the sync byte must match
    pub fn decode(frame: &[u8]) -> Option<Self> {
        match frame {
            [COMMAND_SYNC, op, d2, d1, d0] => Some(Self::new(*op, [*d2, *d1, *d0])),
            _ => None,
        }
    }
}
