//! Aggregation of a finished timing log.

use crate::error::TimingError;
use crate::event::TimingEvent;
use comfy_table::{presets::UTF8_FULL, Table};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

/// Aggregate durations of one timer type.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerStats {
    pub count: u64,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl TimerStats {
    fn new(duration: f64) -> Self {
        Self {
            count: 1,
            total: duration,
            min: duration,
            max: duration,
        }
    }

    fn add(&mut self, duration: f64) {
        self.count += 1;
        self.total += duration;
        self.min = self.min.min(duration);
        self.max = self.max.max(duration);
    }

    /// Mean duration in seconds.
    pub fn mean(&self) -> f64 {
        if self.count > 0 {
            self.total / self.count as f64
        } else {
            0.0
        }
    }
}

/// Per-timer aggregates of a timing log, ordered by timer name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingSummary {
    pub timers: BTreeMap<String, TimerStats>,
    /// Lines that were not timing events.
    pub skipped_lines: u64,
}

impl TimingSummary {
    /// Add one event.
    pub fn add(&mut self, event: &TimingEvent) {
        match self.timers.get_mut(&event.timer) {
            Some(stats) => stats.add(event.duration),
            None => {
                self.timers
                    .insert(event.timer.clone(), TimerStats::new(event.duration));
            }
        }
    }

    /// Parse a timing log.
    ///
    /// When timing goes to stdout it is interleaved with other output, so
    /// lines that do not parse as a [`TimingEvent`] are counted and skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TimingError> {
        let mut summary = Self::default();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<TimingEvent>(line) {
                Ok(event) => summary.add(&event),
                Err(_) => summary.skipped_lines += 1,
            }
        }
        Ok(summary)
    }

    /// Parse a timing log file.
    pub fn from_file(path: &Path) -> Result<Self, TimingError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Total number of events.
    pub fn event_count(&self) -> u64 {
        self.timers.values().map(|s| s.count).sum()
    }

    /// Render as a table.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Timer", "Count", "Total (s)", "Mean (s)", "Min (s)", "Max (s)"]);

        for (timer, stats) in &self.timers {
            table.add_row(vec![
                timer.clone(),
                stats.count.to_string(),
                format!("{:.6}", stats.total),
                format!("{:.6}", stats.mean()),
                format!("{:.6}", stats.min),
                format!("{:.6}", stats.max),
            ]);
        }

        table
    }
}
