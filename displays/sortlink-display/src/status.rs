//! Status pages
//!
//! 63B page:
//!
//! ```text
//! CARGO SORT          CARGO SORT          CARGO SORT
//! SLE: OK             SLE: OK             SLE: Wait
//! JS:12               Wait data           Connect
//! ZJ:4
//! SH:0
//! ```
//!
//! Host page:
//!
//! ```text
//! Production Line
//! Current Line: 3
//!
//! JS:12 ZJ:4 SH:0
//!
//! SLE Ready | SLE Wait
//! ```

use core::fmt::Write;

use heapless::String;
use sortlink_protocol::{CargoSnapshot, Region};

use crate::screen::{Screen, LINE_LEN};

fn count_line(region: Region, snapshot: &CargoSnapshot) -> String<LINE_LEN> {
    let mut line = String::new();
    let _ = write!(line, "{}:{}", region.label(), snapshot.count(region));
    line
}

/// Compose the 63B page
///
/// Counts are shown only while connected and once a valid frame arrived.
pub fn cargo_page(screen: &mut Screen, connected: bool, cargo: Option<CargoSnapshot>) {
    screen.set_line(0, "CARGO SORT");

    match (connected, cargo) {
        (true, Some(snapshot)) => {
            screen.set_line(1, "SLE: OK");
            for (row, region) in (2..).zip(Region::ALL) {
                screen.set_line(row, &count_line(region, &snapshot));
            }
        }
        (true, None) => {
            screen.set_line(1, "SLE: OK");
            screen.set_line(2, "Wait data");
            screen.set_line(3, "");
            screen.set_line(4, "");
        }
        (false, _) => {
            screen.set_line(1, "SLE: Wait");
            screen.set_line(2, "Connect");
            screen.set_line(3, "");
            screen.set_line(4, "");
        }
    }
}

/// Compose the host page
pub fn host_page(screen: &mut Screen, line_index: u8, snapshot: &CargoSnapshot, sle_connected: bool) {
    screen.set_line(0, "Production Line");

    let mut current: String<LINE_LEN> = String::new();
    let _ = write!(current, "Current Line: {}", line_index);
    screen.set_line(1, &current);

    // Wider than a row; set_line truncates
    let mut counts: String<48> = String::new();
    for region in Region::ALL {
        if !counts.is_empty() {
            let _ = counts.push(' ');
        }
        let _ = counts.push_str(&count_line(region, snapshot));
    }
    screen.set_line(3, &counts);

    screen.set_line(5, if sle_connected { "SLE Ready" } else { "SLE Wait" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_page_with_data() {
        let mut screen = Screen::new();
        cargo_page(&mut screen, true, Some(CargoSnapshot::new(12, 4, 0, 99)));
        let lines: heapless::Vec<&str, 8> = screen.lines().collect();
        assert_eq!(&lines[..5], &["CARGO SORT", "SLE: OK", "JS:12", "ZJ:4", "SH:0"]);
    }

    #[test]
    fn test_cargo_page_waiting() {
        let mut screen = Screen::new();
        cargo_page(&mut screen, true, None);
        assert_eq!(screen.get_line(2), Some("Wait data"));

        cargo_page(&mut screen, false, Some(CargoSnapshot::new(1, 1, 1, 1)));
        assert_eq!(screen.get_line(1), Some("SLE: Wait"));
        assert_eq!(screen.get_line(2), Some("Connect"));
        assert_eq!(screen.get_line(3), Some(""));
    }

    #[test]
    fn test_host_page() {
        let mut screen = Screen::new();
        host_page(&mut screen, 3, &CargoSnapshot::new(12, 4, 0, 0), true);
        assert_eq!(screen.get_line(1), Some("Current Line: 3"));
        assert_eq!(screen.get_line(3), Some("JS:12 ZJ:4 SH:0"));
        assert_eq!(screen.get_line(5), Some("SLE Ready"));
    }

    #[test]
    fn test_host_page_large_counts_truncate() {
        let mut screen = Screen::new();
        let big = CargoSnapshot::new(u32::MAX, u32::MAX, u32::MAX, 0);
        host_page(&mut screen, 0, &big, false);
        assert_eq!(screen.get_line(3).map(str::len), Some(LINE_LEN));
    }
}
