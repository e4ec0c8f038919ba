//! UDP directives from the companion app
//!
//! Directives are matched as case-sensitive substrings, first match wins:
//!
//! | order | text                           | directive        |
//! |-------|--------------------------------|------------------|
//! | 1     | `CONNECT_REQUEST`              | `ConnectRequest` |
//! | 2     | `_change_position<s><n>_`      | `ChangePosition` |
//! | 3     | `_change_speed<l>`             | `ChangeSpeed`    |
//! | 4     | `_refresh`                     | `Refresh`        |
//! | 5     | `_cargo_status`                | `CargoStatus`    |
//! | 6     | `UnoladPage` (sic)             | `UnloadPage`     |
//! | 7     | one byte of `HGMEPQCIJKL`      | `DeviceCommand`  |
//! | 8     | leading ASCII digit            | `DisplayIndex`   |
//! | 9-14  | light, blocker, ejector        | control          |
//!
//! Parameters are read right after the matched keyword. A missing or
//! out-of-range parameter is kept in the directive and only rejected when
//! mapping to a [`UartCommand`].

use core::fmt::Write;

use heapless::String;

use crate::cargo::CargoSnapshot;
use crate::command::UartCommand;

pub const CONNECT_REQUEST: &[u8] = b"CONNECT_REQUEST";
pub const CHANGE_POSITION: &[u8] = b"_change_position";
pub const CHANGE_SPEED: &[u8] = b"_change_speed";
pub const REFRESH: &[u8] = b"_refresh";
pub const CARGO_STATUS: &[u8] = b"_cargo_status";
/// Misspelled on the app side; kept as sent
pub const UNLOAD_PAGE: &[u8] = b"UnoladPage";
pub const LIGHT_OFF: &[u8] = b"_light_off";
pub const LIGHT_ON: &[u8] = b"_light_on";
pub const BLOCKER_ON: &[u8] = b"_blocker_on";
pub const BLOCKER_OFF: &[u8] = b"_blocker_off";
pub const EJECTOR_ON: &[u8] = b"_ejector_on";
pub const EJECTOR_OFF: &[u8] = b"_ejector_off";

/// Single-byte device commands passed straight to the controller
pub const DEVICE_OPS: &[u8] = b"HGMEPQCIJKL";

pub const REPLY_CONNECT_OK: &str = "CONNECT_OK";
pub const REPLY_DEVICE_CMD_OK: &str = "device_cmd_ok";
pub const REPLY_DEVICE_LIGHT_ON: &str = "device_light_on";
pub const REPLY_GENERIC: &str = "Received a message from the server";

/// Longest `CARGO_DATA` reply is 47 bytes
pub const MAX_STATUS_REPLY_LEN: usize = 64;

/// Servo positions above this overflow the 4-digit PWM field
pub const MAX_SERVO_POSITION: u16 = 474;

/// A parsed UDP directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Directive {
    ConnectRequest,
    /// `servo` is the raw id byte; `value` is `None` when the digits are
    /// not terminated by `_` or contain a non-digit
    ChangePosition { servo: u8, value: Option<u16> },
    ChangeSpeed { level: Option<u8> },
    Refresh,
    CargoStatus,
    UnloadPage,
    DeviceCommand(u8),
    /// Production line index shown on the host display
    DisplayIndex(u8),
    LightOff { channel: Option<u8> },
    LightOn { channel: Option<u8> },
    BlockerOn,
    BlockerOff,
    /// `id` defaults to `b'1'` when absent
    EjectorOn { id: u8 },
    EjectorOff { id: u8 },
    Unknown,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Bytes following the first occurrence of `keyword`
fn after<'a>(bytes: &'a [u8], keyword: &[u8]) -> Option<&'a [u8]> {
    find(bytes, keyword).map(|at| &bytes[at + keyword.len()..])
}

fn parse_position(rest: &[u8]) -> Directive {
    let servo = rest.first().copied().unwrap_or(0);
    let digits = rest.get(1..).unwrap_or(&[]);

    let value = digits
        .iter()
        .position(|&b| b == b'_')
        .map(|end| &digits[..end])
        .filter(|number| !number.is_empty() && number.iter().all(u8::is_ascii_digit))
        .map(|number| {
            number.iter().fold(0u16, |acc, &d| {
                acc.wrapping_mul(10).wrapping_add(u16::from(d - b'0'))
            })
        });

    Directive::ChangePosition { servo, value }
}

fn ejector_id(rest: &[u8]) -> u8 {
    match rest.first() {
        Some(&id @ (b'1' | b'2')) => id,
        _ => b'1',
    }
}

/// Classify a datagram
pub fn parse_directive(bytes: &[u8]) -> Directive {
    if find(bytes, CONNECT_REQUEST).is_some() {
        return Directive::ConnectRequest;
    }
    if let Some(rest) = after(bytes, CHANGE_POSITION) {
        return parse_position(rest);
    }
    if let Some(rest) = after(bytes, CHANGE_SPEED) {
        return Directive::ChangeSpeed {
            level: rest.first().copied(),
        };
    }
    if find(bytes, REFRESH).is_some() {
        return Directive::Refresh;
    }
    if find(bytes, CARGO_STATUS).is_some() {
        return Directive::CargoStatus;
    }
    if find(bytes, UNLOAD_PAGE).is_some() {
        return Directive::UnloadPage;
    }

    match bytes {
        [op] if DEVICE_OPS.contains(op) => return Directive::DeviceCommand(*op),
        [digit @ b'0'..=b'9', ..] => return Directive::DisplayIndex(digit - b'0'),
        _ => {}
    }

    if let Some(rest) = after(bytes, LIGHT_OFF) {
        return Directive::LightOff {
            channel: rest.first().copied(),
        };
    }
    if let Some(rest) = after(bytes, LIGHT_ON) {
        return Directive::LightOn {
            channel: rest.first().copied(),
        };
    }
    if find(bytes, BLOCKER_ON).is_some() {
        return Directive::BlockerOn;
    }
    if find(bytes, BLOCKER_OFF).is_some() {
        return Directive::BlockerOff;
    }
    if let Some(rest) = after(bytes, EJECTOR_ON) {
        return Directive::EjectorOn {
            id: ejector_id(rest),
        };
    }
    if let Some(rest) = after(bytes, EJECTOR_OFF) {
        return Directive::EjectorOff {
            id: ejector_id(rest),
        };
    }

    Directive::Unknown
}

/// Ejectors share the light channels 1 and 2
fn ejector_channel(id: u8) -> u8 {
    if id == b'2' {
        b'2'
    } else {
        b'1'
    }
}

fn light_command(channel: Option<u8>, on: bool) -> Option<UartCommand> {
    let (op, value) = match channel? {
        b'0' => (b'4', 58),
        b'1' => (b'5', 50),
        b'2' => (b'6', 40),
        _ => return None,
    };
    UartCommand::with_value(op, if on { value + 100 } else { value })
}

impl Directive {
    /// Control directives drive the sorting machine and are acknowledged
    /// with `device_light_on`
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Directive::ChangePosition { .. }
                | Directive::ChangeSpeed { .. }
                | Directive::LightOff { .. }
                | Directive::LightOn { .. }
                | Directive::BlockerOn
                | Directive::BlockerOff
                | Directive::EjectorOn { .. }
                | Directive::EjectorOff { .. }
        )
    }

    /// Command frame for the controller, if this directive produces one
    ///
    /// Returns `None` for query directives and for control directives with
    /// an invalid parameter.
    pub fn uart_command(&self) -> Option<UartCommand> {
        match *self {
            Directive::ChangePosition { servo, value } => {
                let op = match servo {
                    b'0' => b'3',
                    b'1' => b'2',
                    b'2' => b'1',
                    b'3' => b'0',
                    _ => return None,
                };
                let value = value.filter(|&v| v <= MAX_SERVO_POSITION)?;
                let pwm = 20 * value + 500;
                UartCommand::with_value(op, pwm / 10)
            }
            Directive::ChangeSpeed { level } => {
                let value = match level? {
                    b'0' => 50,
                    b'1' => 106,
                    b'2' => 178,
                    b'3' => 240,
                    _ => return None,
                };
                UartCommand::with_value(b'7', value)
            }
            Directive::LightOff { channel } => light_command(channel, false),
            Directive::LightOn { channel } => light_command(channel, true),
            Directive::BlockerOn => light_command(Some(b'0'), true),
            Directive::BlockerOff => light_command(Some(b'0'), false),
            Directive::EjectorOn { id } => light_command(Some(ejector_channel(id)), true),
            Directive::EjectorOff { id } => light_command(Some(ejector_channel(id)), false),
            Directive::DeviceCommand(op) => Some(UartCommand::device(op)),
            _ => None,
        }
    }
}

/// Encode the `_cargo_status` reply
pub fn encode_cargo_status(snapshot: &CargoSnapshot) -> String<MAX_STATUS_REPLY_LEN> {
    let mut reply = String::new();
    let _ = write!(
        reply,
        "CARGO_DATA:J={},Z={},S={}",
        snapshot.jiangsu, snapshot.zhejiang, snapshot.shanghai
    );
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame(directive: &[u8]) -> Option<[u8; 5]> {
        parse_directive(directive).uart_command().map(|cmd| cmd.encode())
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(parse_directive(b"CONNECT_REQUEST_refresh"), Directive::ConnectRequest);
        assert_eq!(parse_directive(b"_refresh_cargo_status"), Directive::Refresh);
        assert_eq!(parse_directive(b"x_cargo_status"), Directive::CargoStatus);
        assert_eq!(parse_directive(b"UnoladPage"), Directive::UnloadPage);
        assert_eq!(parse_directive(b"hello"), Directive::Unknown);
        assert_eq!(parse_directive(b""), Directive::Unknown);
    }

    #[test]
    fn test_device_command_needs_single_byte() {
        assert_eq!(parse_directive(b"H"), Directive::DeviceCommand(b'H'));
        assert_eq!(parse_directive(b"HH"), Directive::Unknown);
        assert_eq!(parse_directive(b"Z"), Directive::Unknown);
        assert_eq!(frame(b"L"), Some([0xFF, b'L', b'0', b'0', b'0']));
    }

    #[test]
    fn test_display_index() {
        assert_eq!(parse_directive(b"7"), Directive::DisplayIndex(7));
        assert_eq!(parse_directive(b"3abc"), Directive::DisplayIndex(3));
    }

    #[test]
    fn test_change_position() {
        // pwm = 20 * 90 + 500 = 2300
        assert_eq!(
            parse_directive(b"_change_position090_"),
            Directive::ChangePosition {
                servo: b'0',
                value: Some(90)
            }
        );
        assert_eq!(frame(b"_change_position090_"), Some([0xFF, b'3', b'2', b'3', b'0']));
        assert_eq!(frame(b"_change_position3180_"), Some([0xFF, b'0', b'4', b'1', b'0']));
    }

    #[test]
    fn test_change_position_relative_to_match() {
        assert_eq!(frame(b"xx_change_position10_"), Some([0xFF, b'2', b'0', b'5', b'0']));
    }

    #[test]
    fn test_change_position_invalid() {
        assert_eq!(frame(b"_change_position990_"), None);
        assert_eq!(frame(b"_change_position090"), None);
        assert_eq!(frame(b"_change_position0_"), None);
        assert_eq!(frame(b"_change_position0500_"), None);
    }

    #[test]
    fn test_change_speed() {
        assert_eq!(frame(b"_change_speed0"), Some([0xFF, b'7', b'0', b'5', b'0']));
        assert_eq!(frame(b"_change_speed3"), Some([0xFF, b'7', b'2', b'4', b'0']));
        assert_eq!(frame(b"_change_speed9"), None);
        assert_eq!(frame(b"_change_speed"), None);
    }

    #[test]
    fn test_lights() {
        assert_eq!(frame(b"_light_off0"), Some([0xFF, b'4', b'0', b'5', b'8']));
        assert_eq!(frame(b"_light_on1"), Some([0xFF, b'5', b'1', b'5', b'0']));
        assert_eq!(frame(b"_light_on2"), Some([0xFF, b'6', b'1', b'4', b'0']));
        assert_eq!(frame(b"_light_on7"), None);
        assert!(parse_directive(b"_light_on7").is_control());
    }

    #[test]
    fn test_blocker_matches_light_zero() {
        assert_eq!(frame(b"_blocker_on"), frame(b"_light_on0"));
        assert_eq!(frame(b"_blocker_off"), frame(b"_light_off0"));
    }

    #[test]
    fn test_ejector_default_and_explicit_id() {
        assert_eq!(parse_directive(b"_ejector_on"), Directive::EjectorOn { id: b'1' });
        assert_eq!(parse_directive(b"_ejector_on9"), Directive::EjectorOn { id: b'1' });
        assert_eq!(frame(b"_ejector_on2"), Some([0xFF, b'6', b'1', b'4', b'0']));
        assert_eq!(frame(b"_ejector_off"), Some([0xFF, b'5', b'0', b'5', b'0']));
    }

    #[test]
    fn test_queries_have_no_frame() {
        for text in [&b"CONNECT_REQUEST"[..], b"_refresh", b"_cargo_status", b"UnoladPage", b"5"] {
            let directive = parse_directive(text);
            assert!(!directive.is_control());
            assert_eq!(directive.uart_command(), None);
        }
    }

    #[test]
    fn test_cargo_status_reply() {
        let snapshot = CargoSnapshot::new(3, 0, 0, 77);
        assert_eq!(encode_cargo_status(&snapshot).as_str(), "CARGO_DATA:J=3,Z=0,S=0");

        let max = CargoSnapshot::new(u32::MAX, u32::MAX, u32::MAX, 0);
        assert!(encode_cargo_status(&max).len() < MAX_STATUS_REPLY_LEN);
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = parse_directive(&bytes).uart_command();
        }
    }
}
