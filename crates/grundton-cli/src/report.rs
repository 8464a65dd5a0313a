//! Reporting loop.
//!
//! Runs beside the block loop, the way the module's main loop runs beside
//! the audio callback: it reads the published snapshot, redraws the status
//! display and logs selection and conditioning changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use grundton_platform::TextDisplay;
use grundton_tracker::{STATUS_COLS, STATUS_ROWS, StatusSnapshot, StringCatalog, TrackerShared, render_status};

/// The simulated OLED.
pub type StatusScreen = TextDisplay<STATUS_ROWS, STATUS_COLS>;

/// What the reporting loop saw.
#[derive(Debug, Clone)]
pub struct Report {
    /// Final display contents.
    pub lines: Vec<String>,
    /// Display refreshes.
    pub frames: u64,
    /// Selection changes observed.
    pub selection_changes: u32,
}

/// Handle to a running reporting thread.
///
/// Dropping the handle without [`Reporter::finish`] still stops and joins the
/// thread.
pub struct Reporter {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Report>>,
}

impl Reporter {
    /// Start refreshing every `interval`.
    pub fn spawn(shared: Arc<TrackerShared>, catalog: StringCatalog, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || report_loop(&shared, &catalog, &flag, interval));
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop after one last refresh and collect the report.
    pub fn finish(mut self) -> anyhow::Result<Report> {
        self.stop.store(true, Ordering::Release);
        self.handle
            .take()
            .ok_or_else(|| anyhow::anyhow!("reporting thread already joined"))?
            .join()
            .map_err(|_| anyhow::anyhow!("reporting thread panicked"))
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn report_loop(shared: &TrackerShared, catalog: &StringCatalog, stop: &AtomicBool, interval: Duration) -> Report {
    let mut screen = StatusScreen::new();
    let mut last: Option<StatusSnapshot> = None;
    let mut selection_changes = 0;

    loop {
        // Read the flag first so the final refresh sees everything published before it.
        let stopping = stop.load(Ordering::Acquire);
        let snap = shared.snapshot();

        if let Some(prev) = &last {
            if prev.base_index != snap.base_index {
                selection_changes += 1;
                log_selection(&snap, catalog, snap.blocks);
            }
            if prev.conditioning != snap.conditioning {
                tracing::info!(enabled = snap.conditioning, block = snap.blocks, "signal conditioning toggled");
            }
        } else {
            log_selection(&snap, catalog, snap.blocks);
        }

        render_status(&mut screen, &snap, catalog);
        tracing::trace!(lines = ?screen.lines().collect::<Vec<_>>(), "status refresh");
        last = Some(snap);

        if stopping {
            break;
        }
        thread::sleep(interval);
    }

    Report {
        lines: screen.lines().map(str::to_string).collect(),
        frames: screen.frames(),
        selection_changes,
    }
}

fn log_selection(snap: &StatusSnapshot, catalog: &StringCatalog, block: u32) {
    let (a, b) = snap.pair();
    let name = |i| catalog.profile_at(i).map(|p| p.name().to_string()).unwrap_or_default();
    tracing::info!(block, a = %name(a), b = %name(b), base = a, "string pair selected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use grundton_tracker::TrackerSettings;

    fn shared() -> Arc<TrackerShared> {
        Arc::new(TrackerShared::new(&TrackerSettings::default(), 0))
    }

    #[test]
    fn finish_returns_the_last_frame() {
        let shared = shared();
        let reporter = Reporter::spawn(Arc::clone(&shared), StringCatalog::guitar(), Duration::from_millis(1));
        let report = reporter.finish().unwrap();
        assert!(report.frames >= 1);
        assert_eq!(report.lines.len(), STATUS_ROWS);
        assert_eq!(report.selection_changes, 0);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn dropping_the_handle_stops_the_thread() {
        let shared = shared();
        let reporter = Reporter::spawn(Arc::clone(&shared), StringCatalog::guitar(), Duration::from_millis(1));
        drop(reporter);
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
