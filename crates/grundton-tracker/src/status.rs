//! Status display rendering.
//!
//! Four lines, drawn by the background loop from a [`StatusSnapshot`]:
//!
//! ```text
//! e:82.41Hz
//! A:110.00Hz
//! SC :ON
//! CPU:12.50%
//! ```

use core::fmt::Write;

use grundton_platform::{LineBuf, StatusDisplay};

use crate::catalog::StringCatalog;
use crate::shared::StatusSnapshot;

/// Rows used by the status screen.
pub const STATUS_ROWS: usize = 4;

/// Characters per row.
pub const STATUS_COLS: usize = 16;

/// Format the four status lines.
pub fn format_status(snapshot: &StatusSnapshot, catalog: &StringCatalog) -> [LineBuf<STATUS_COLS>; STATUS_ROWS] {
    let mut lines = [LineBuf::new(); STATUS_ROWS];
    let (a, b) = snapshot.pair();

    for (line, (index, freq)) in lines.iter_mut().zip([(a, snapshot.frequencies[0]), (b, snapshot.frequencies[1])]) {
        let name = catalog.profile_at(index).map_or("?", |p| p.name());
        let _ = write!(line, "{name}:{freq:.2}Hz");
    }
    let _ = write!(lines[2], "SC :{}", if snapshot.conditioning { "ON" } else { "OFF" });
    let _ = write!(lines[3], "CPU:{:.2}%", snapshot.load.average * 100.0);
    lines
}

/// Clear `display`, draw the status lines and flush.
pub fn render_status<S: StatusDisplay>(display: &mut S, snapshot: &StatusSnapshot, catalog: &StringCatalog) {
    display.clear();
    for (row, line) in format_status(snapshot, catalog).iter().enumerate() {
        display.write_line(row, line.as_str());
    }
    display.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TrackerSettings;
    use crate::shared::TrackerShared;
    use grundton_platform::TextDisplay;

    fn snapshot() -> StatusSnapshot {
        let mut snap = TrackerShared::new(&TrackerSettings::default(), 0).snapshot();
        snap.frequencies = [82.41, 110.0];
        snap.load.average = 0.125;
        snap
    }

    #[test]
    fn four_lines_in_order() {
        let lines = format_status(&snapshot(), &StringCatalog::guitar());
        assert_eq!(lines[0].as_str(), "e:82.41Hz");
        assert_eq!(lines[1].as_str(), "A:110.00Hz");
        assert_eq!(lines[2].as_str(), "SC :ON");
        assert_eq!(lines[3].as_str(), "CPU:12.50%");
    }

    #[test]
    fn conditioning_off_is_shown() {
        let mut snap = snapshot();
        snap.conditioning = false;
        let lines = format_status(&snap, &StringCatalog::guitar());
        assert_eq!(lines[2].as_str(), "SC :OFF");
    }

    #[test]
    fn renders_to_display() {
        let mut display = TextDisplay::<STATUS_ROWS, STATUS_COLS>::new();
        render_status(&mut display, &snapshot(), &StringCatalog::guitar());
        assert_eq!(display.line(0), "e:82.41Hz");
        assert_eq!(display.frames(), 1);
    }

    #[test]
    fn unknown_index_is_marked() {
        let mut snap = snapshot();
        snap.base_index = 20;
        let lines = format_status(&snap, &StringCatalog::guitar());
        assert!(lines[0].as_str().starts_with("?:"));
    }
}
