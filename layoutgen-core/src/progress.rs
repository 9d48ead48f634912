use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

const REPORT_EVERY: Duration = Duration::from_secs(5);

/// Throttled progress log for a single run.
///
/// Counters are plain cells: a run is single-threaded, and the report is
/// emitted inline from `inc_file` rather than from a ticker thread.
pub struct Progress {
    enabled: bool,
    stage: RefCell<String>,
    files_done: Cell<usize>,
    bytes_done: Cell<u64>,
    started: Instant,
    last_report: Cell<Instant>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            stage: RefCell::new(String::new()),
            files_done: Cell::new(0),
            bytes_done: Cell::new(0),
            started: now,
            last_report: Cell::new(now),
        }
    }
    pub fn set_stage(&self, s: &str) {
        if self.enabled {
            *self.stage.borrow_mut() = s.to_string();
        }
    }
    pub fn inc_file(&self, bytes: u64) {
        self.files_done.set(self.files_done.get() + 1);
        self.bytes_done.set(self.bytes_done.get().saturating_add(bytes));
        if self.enabled && self.last_report.get().elapsed() >= REPORT_EVERY {
            self.last_report.set(Instant::now());
            self.report();
        }
    }
    pub fn finish(&self) {
        if self.enabled {
            self.report();
        }
    }

    fn report(&self) {
        tracing::info!(
            "[{:>4}s] {} | files {} | bytes {}",
            self.started.elapsed().as_secs(),
            self.stage.borrow(),
            self.files_done.get(),
            self.bytes_done.get()
        );
    }
}
