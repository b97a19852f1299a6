//! Destinations for timing events.

use crate::error::TimingError;
use crate::event::TimingEvent;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Somewhere timing events are written to.
///
/// Recording never fails from the caller's point of view: a sink that
/// cannot write reports the problem through `tracing` and carries on, so
/// timing never changes the outcome of the work being timed.
pub trait TimingSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: &TimingEvent);
}

/// Path of the timing log for a run started at `started_at`.
pub fn timing_log_path(log_dir: &Path, started_at: DateTime<Local>) -> PathBuf {
    log_dir.join(format!(
        "{}_timing.log",
        started_at.format("%Y-%m-%d_%H-%M-%S")
    ))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock leaves the data usable for appending.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_event<W: Write>(out: &mut W, event: &TimingEvent) -> Result<(), TimingError> {
    let line = event.to_json_line()?;
    writeln!(out, "{line}")?;
    Ok(())
}

/// Appends JSON lines to a file, one flush per line.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<LineWriter<File>>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, TimingError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(LineWriter::new(file)),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TimingSink for FileSink {
    fn record(&self, event: &TimingEvent) {
        let mut writer = lock(&self.writer);
        if let Err(e) = write_event(&mut *writer, event) {
            warn!(
                "Failed to write timing event to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Writes JSON lines to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl TimingSink for StdoutSink {
    fn record(&self, event: &TimingEvent) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = write_event(&mut out, event) {
            warn!("Failed to write timing event to stdout: {}", e);
        }
    }
}

/// Keeps events in memory; used to inspect timing in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TimingEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in order.
    pub fn events(&self) -> Vec<TimingEvent> {
        lock(&self.events).clone()
    }

    /// Events recorded under the given timer type.
    pub fn events_of(&self, timer: &str) -> Vec<TimingEvent> {
        lock(&self.events)
            .iter()
            .filter(|e| e.timer == timer)
            .cloned()
            .collect()
    }
}

impl TimingSink for MemorySink {
    fn record(&self, event: &TimingEvent) {
        lock(&self.events).push(event.clone());
    }
}
