//! Scoped timers bound to a run's timing sink.

use crate::event::TimingEvent;
use crate::sink::{timing_log_path, FileSink, MemorySink, StdoutSink, TimingSink};
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Where a [`TimingLog`] ends up writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingDestination {
    File(PathBuf),
    Stdout,
    Memory,
}

impl fmt::Display for TimingDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingDestination::File(path) => write!(f, "{}", path.display()),
            TimingDestination::Stdout => write!(f, "stdout"),
            TimingDestination::Memory => write!(f, "memory"),
        }
    }
}

/// Handle to the single timing sink of a run.
///
/// Cheap to clone; all clones write to the same sink.
#[derive(Clone)]
pub struct TimingLog {
    sink: Arc<dyn TimingSink>,
    destination: TimingDestination,
}

impl TimingLog {
    /// Wrap an arbitrary sink.
    pub fn new(sink: Arc<dyn TimingSink>, destination: TimingDestination) -> Self {
        Self { sink, destination }
    }

    /// Log timing data to standard output.
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink), TimingDestination::Stdout)
    }

    /// Log timing data to memory, returning the sink for inspection.
    pub fn memory() -> (Self, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (
            Self::new(sink.clone(), TimingDestination::Memory),
            sink,
        )
    }

    /// Pick the run's destination.
    ///
    /// If a timestamped log file can be created in `log_dir`, timing data
    /// goes there. On systems where the directory is missing or read-only
    /// (e.g. containers), it goes to standard output instead.
    pub fn for_log_dir(log_dir: &Path) -> Self {
        let path = timing_log_path(log_dir, Local::now());
        match FileSink::create(&path) {
            Ok(sink) => {
                info!("Logging timing data to {}", path.display());
                Self::new(Arc::new(sink), TimingDestination::File(path))
            }
            Err(e) => {
                info!(
                    "{} is not writable ({}), logging timing data to stdout",
                    log_dir.display(),
                    e
                );
                Self::stdout()
            }
        }
    }

    /// Where events are written.
    pub fn destination(&self) -> &TimingDestination {
        &self.destination
    }

    /// Record a duration measured elsewhere.
    ///
    /// * `timer_type` - top level type of the timer ("query", "batch_load", "setup"...)
    /// * `timer_key` - specific timer ("Batch 100 of 1000", "full_setup"...)
    /// * `duration` - fractional seconds (1.20, 12.345, 0.03)
    pub fn log_duration(&self, timer_type: &str, timer_key: &str, duration: f64) {
        self.sink
            .record(&TimingEvent::new(timer_type, timer_key, duration));
    }

    /// Start a timer that records when dropped.
    pub fn timer(&self, timer_type: impl Into<String>, timer_key: impl Into<String>) -> LogTimer<'_> {
        LogTimer {
            log: self,
            timer_type: timer_type.into(),
            timer_key: timer_key.into(),
            start: Instant::now(),
        }
    }

    /// Run `f` inside a timer and hand back its result untouched.
    pub fn time<T>(
        &self,
        timer_type: impl Into<String>,
        timer_key: impl Into<String>,
        f: impl FnOnce() -> T,
    ) -> T {
        let _timer = self.timer(timer_type, timer_key);
        f()
    }
}

impl fmt::Debug for TimingLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingLog")
            .field("destination", &self.destination)
            .finish()
    }
}

/// Measures the time between its creation and its drop.
///
/// The event is recorded in `Drop`, so it is written on every exit path of
/// the enclosing scope: normal completion, `?` early returns and unwinding
/// panics alike.
#[must_use = "the timer records when dropped; binding it to `_` drops it immediately"]
pub struct LogTimer<'a> {
    log: &'a TimingLog,
    timer_type: String,
    timer_key: String,
    start: Instant,
}

impl LogTimer<'_> {
    /// Seconds elapsed so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for LogTimer<'_> {
    fn drop(&mut self) {
        self.log
            .log_duration(&self.timer_type, &self.timer_key, self.elapsed_secs());
    }
}
