//! Character screen buffer
//!
//! Rows are tracked individually so a status refresh that changes one
//! counter only redraws that row.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Character rows on the 128×64 panel with the 6×8 font
pub const SCREEN_ROWS: usize = 8;

/// Character columns on the 128×64 panel with the 6×8 font
pub const SCREEN_COLS: usize = 21;

/// Maximum characters per line
pub const LINE_LEN: usize = SCREEN_COLS;

const BLANK: &str = "                     ";

/// Screen buffer for text-mode displays
#[derive(Clone)]
pub struct Screen {
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    /// Bit n set: row n changed since the last render
    dirty: u8,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen; every row starts dirty
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            dirty: u8::MAX,
        }
    }

    /// Blank every row
    pub fn clear(&mut self) {
        for row in 0..SCREEN_ROWS {
            self.set_line(row, "");
        }
    }

    /// Set the content of a row, truncated to the panel width
    ///
    /// The row is only marked dirty when its content changes.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };

        let mut end = text.len().min(LINE_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let text = &text[..end];

        if line.as_str() != text {
            line.clear();
            let _ = line.push_str(text);
            self.dirty |= 1 << row;
        }
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// All rows, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty != 0
    }

    pub fn is_row_dirty(&self, row: usize) -> bool {
        row < SCREEN_ROWS && self.dirty & (1 << row) != 0
    }

    /// Force a full redraw on the next render
    pub fn mark_dirty(&mut self) {
        self.dirty = u8::MAX;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    /// Draw the changed rows and flush
    ///
    /// Each row is padded to full width so shorter text erases what was
    /// there before. Returns the number of rows drawn; nothing is sent
    /// when the screen is clean.
    pub fn render<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<usize, DisplayError> {
        if !self.is_dirty() {
            return Ok(0);
        }

        let mut drawn = 0;
        for (row, line) in self.lines.iter().enumerate() {
            if self.dirty & (1 << row) == 0 {
                continue;
            }
            backend.draw_text(row as u8, 0, line.as_str())?;
            if line.len() < LINE_LEN {
                backend.draw_text(row as u8, line.len() as u8, &BLANK[line.len()..])?;
            }
            drawn += 1;
        }
        backend.flush()?;

        self.mark_clean();
        Ok(drawn)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, " | ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use heapless::Vec;

    /// Backend that records every draw call
    #[derive(Default)]
    pub(crate) struct RecordingBackend {
        pub draws: Vec<(u8, u8, String<LINE_LEN>), 32>,
        pub flushes: usize,
        pub fail: bool,
    }

    impl DisplayBackend for RecordingBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.draws.clear();
            Ok(())
        }

        fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            let mut owned = String::new();
            let _ = owned.push_str(text);
            let _ = self.draws.push((row, col, owned));
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_blank_is_full_width() {
        assert_eq!(BLANK.len(), LINE_LEN);
    }

    #[test]
    fn test_set_line_truncates() {
        let mut screen = Screen::new();
        screen.set_line(0, "0123456789012345678901234");
        assert_eq!(screen.get_line(0), Some("012345678901234567890"));
        screen.set_line(SCREEN_ROWS, "ignored");
        assert_eq!(screen.get_line(SCREEN_ROWS), None);
    }

    #[test]
    fn test_only_changed_rows_render() {
        let mut screen = Screen::new();
        let mut backend = RecordingBackend::default();
        screen.set_line(2, "JS:1");
        assert_eq!(screen.render(&mut backend), Ok(SCREEN_ROWS));

        backend.draws.clear();
        screen.set_line(2, "JS:1");
        assert!(!screen.is_dirty());
        assert_eq!(screen.render(&mut backend), Ok(0));

        screen.set_line(2, "JS:2");
        assert!(screen.is_row_dirty(2));
        assert_eq!(screen.render(&mut backend), Ok(1));
        assert_eq!(backend.draws[0].2.as_str(), "JS:2");
        assert_eq!((backend.draws[1].0, backend.draws[1].1), (2, 4));
        assert_eq!(backend.flushes, 2);
    }

    #[test]
    fn test_render_error_keeps_dirty() {
        let mut screen = Screen::new();
        let mut backend = RecordingBackend {
            fail: true,
            ..Default::default()
        };
        assert_eq!(screen.render(&mut backend), Err(DisplayError::Communication));
        assert!(screen.is_dirty());
    }
}
