//! Lenient number parsing
//!
//! Mirrors the C library behaviour the peer firmware relies on: leading
//! whitespace and a sign are accepted, parsing stops at the first non-digit,
//! and text without digits reads as 0. Overflow wraps instead of failing.

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Parse a decimal number the way `atoll` would
pub(crate) fn lenient_u64(text: &[u8]) -> u64 {
    let mut i = 0;
    while i < text.len() && is_space(text[i]) {
        i += 1;
    }

    let negative = match text.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let mut value: u64 = 0;
    while let Some(&digit @ b'0'..=b'9') = text.get(i) {
        value = value.wrapping_mul(10).wrapping_add(u64::from(digit - b'0'));
        i += 1;
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Parse a decimal number the way `(uint32_t)atoi` would
pub(crate) fn lenient_u32(text: &[u8]) -> u32 {
    lenient_u64(text) as u32
}

/// Parse leading hex digits, `strtol(.., 16)` style, into a byte
pub(crate) fn lenient_hex_u8(text: &[u8]) -> u8 {
    let mut value: u8 = 0;
    for &byte in text {
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => break,
        };
        value = (value << 4) | nibble;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_digits() {
        assert_eq!(lenient_u32(b"123"), 123);
        assert_eq!(lenient_u64(b"18446744073709551615"), u64::MAX);
    }

    #[test]
    fn test_garbage_reads_as_zero() {
        assert_eq!(lenient_u32(b""), 0);
        assert_eq!(lenient_u32(b"abc"), 0);
        assert_eq!(lenient_u32(b"-"), 0);
    }

    #[test]
    fn test_stops_at_first_non_digit() {
        assert_eq!(lenient_u32(b"42abc"), 42);
        assert_eq!(lenient_u32(b"  7 8"), 7);
    }

    #[test]
    fn test_negative_wraps() {
        assert_eq!(lenient_u32(b"-1"), u32::MAX);
        assert_eq!(lenient_u32(b"+5"), 5);
    }

    #[test]
    fn test_hex() {
        assert_eq!(lenient_hex_u8(b"0A"), 0x0A);
        assert_eq!(lenient_hex_u8(b"ff"), 0xFF);
        assert_eq!(lenient_hex_u8(b"1G"), 0x01);
        assert_eq!(lenient_hex_u8(b"G1"), 0);
    }
}
