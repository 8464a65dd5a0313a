//! Text status display.
//!
//! The module's OLED shows a few short lines of text. Rendering happens in the
//! background loop, so the only requirement is that it never allocates: lines
//! are formatted into fixed-capacity [`LineBuf`]s with `core::fmt::Write`.

use core::fmt;

/// Fire-and-forget text display.
pub trait StatusDisplay {
    /// Number of text rows.
    fn rows(&self) -> usize;
    /// Blank every row.
    fn clear(&mut self);
    /// Replace the text of `row`. Rows out of range are ignored.
    fn write_line(&mut self, row: usize, text: &str);
    /// Push the frame to the device.
    fn flush(&mut self) {}
}

/// Fixed-capacity text line.
///
/// Writes past the capacity are silently truncated at a character boundary,
/// so formatting into a `LineBuf` never fails.
///
/// ```rust
/// use core::fmt::Write;
/// use grundton_platform::LineBuf;
///
/// let mut line = LineBuf::<8>::new();
/// write!(line, "e:{:.1}Hz", 82.41).unwrap();
/// assert_eq!(line.as_str(), "e:82.4Hz");
/// write!(line, "overflow").unwrap();
/// assert_eq!(line.as_str(), "e:82.4Hz");
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LineBuf<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuf<N> {
    /// Empty line.
    pub const fn new() -> Self {
        Self { bytes: [0; N], len: 0 }
    }

    /// Current text.
    pub fn as_str(&self) -> &str {
        // Only whole UTF-8 characters are ever copied in.
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Remove all text.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append as much of `s` as fits. Returns false if anything was cut.
    pub fn push_str(&mut self, s: &str) -> bool {
        for ch in s.chars() {
            let width = ch.len_utf8();
            if self.len + width > N {
                return false;
            }
            ch.encode_utf8(&mut self.bytes[self.len..self.len + width]);
            self.len += width;
        }
        true
    }
}

impl<const N: usize> Default for LineBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for LineBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for LineBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for LineBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory display of `ROWS` lines of `COLS` bytes.
///
/// Stands in for the OLED in the host simulation; a board crate would blit
/// the same lines with its font.
#[derive(Debug, Clone)]
pub struct TextDisplay<const ROWS: usize, const COLS: usize> {
    lines: [LineBuf<COLS>; ROWS],
    frames: u64,
}

impl<const ROWS: usize, const COLS: usize> TextDisplay<ROWS, COLS> {
    /// Blank display.
    pub fn new() -> Self {
        Self {
            lines: [LineBuf::new(); ROWS],
            frames: 0,
        }
    }

    /// Text of `row`, empty when out of range.
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", LineBuf::as_str)
    }

    /// All rows.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(LineBuf::as_str)
    }

    /// Number of flushed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<const ROWS: usize, const COLS: usize> Default for TextDisplay<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLS: usize> StatusDisplay for TextDisplay<ROWS, COLS> {
    fn rows(&self) -> usize {
        ROWS
    }

    fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    fn write_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            line.push_str(text);
        }
    }

    fn flush(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn line_truncates_on_char_boundary() {
        let mut line = LineBuf::<4>::new();
        assert!(!line.push_str("ab€"));
        assert_eq!(line.as_str(), "ab");
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn formatting_never_fails() {
        let mut line = LineBuf::<6>::new();
        assert!(write!(line, "CPU:{:.1}%", 12.345).is_ok());
        assert_eq!(line.as_str(), "CPU:12");
    }

    #[test]
    fn display_rows() {
        let mut display = TextDisplay::<4, 16>::new();
        display.write_line(0, "e:82.4Hz");
        display.write_line(9, "ignored");
        assert_eq!(display.line(0), "e:82.4Hz");
        assert_eq!(display.line(9), "");
        display.flush();
        assert_eq!(display.frames(), 1);
        display.clear();
        assert!(display.lines().all(str::is_empty));
        assert_eq!(display.rows(), 4);
    }
}
