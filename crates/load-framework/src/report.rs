//! End-of-run report.

use crate::metrics::RunStats;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Result of a successful load run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Backend name.
    pub backend: String,
    /// Batch rows added by this run.
    pub total_rows: u64,
    /// Registrations written before the batches.
    pub enrollment_rows: u64,
    /// Batches written.
    pub batches: u64,
    /// Time spent in the batch loop.
    pub batch_insert_time: Duration,
    /// Time from start of setup to the end of finalize.
    pub total_run_time: Duration,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Destination row count before the run, if the backend can count.
    pub rows_before: Option<u64>,
    /// Destination row count after the run, if the backend can count.
    pub rows_after: Option<u64>,
}

impl RunReport {
    /// Build the report from the run's counters, measuring the total run
    /// time up to now.
    pub fn new(backend: impl Into<String>, stats: &RunStats, rows_after: Option<u64>) -> Self {
        Self {
            backend: backend.into(),
            total_rows: stats.total_rows,
            enrollment_rows: stats.enrollment_rows,
            batches: stats.batches_completed,
            batch_insert_time: stats.batch_insert_time,
            total_run_time: stats.elapsed(),
            started_at: stats.started_at,
            rows_before: stats.rows_before,
            rows_after,
        }
    }

    /// Rows per second over the batch loop.
    pub fn rows_per_second(&self) -> f64 {
        if self.batch_insert_time.as_secs_f64() > 0.0 {
            self.total_rows as f64 / self.batch_insert_time.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Generate the summary printed at the end of a run.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Done! Added {} rows!\n\
             Batch insert time: {}\n\
             Total run time: {}\n",
            self.total_rows,
            format_elapsed(self.batch_insert_time),
            format_elapsed(self.total_run_time),
        );

        summary.push_str(&format!(
            "Backend: {} ({} batches, {:.2} rows/sec)\n",
            self.backend,
            self.batches,
            self.rows_per_second()
        ));
        summary.push_str(&format!(
            "Started at: {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if self.enrollment_rows > 0 {
            summary.push_str(&format!("Enrollment events: {}\n", self.enrollment_rows));
        }

        if let (Some(before), Some(after)) = (self.rows_before, self.rows_after) {
            summary.push_str(&format!("Rows in destination: {before} -> {after}\n"));
        }

        summary
    }
}

/// Format a duration as `H:MM:SS.ffffff`.
pub fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        duration.subsec_micros()
    )
}
