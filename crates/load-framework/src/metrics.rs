//! Counters collected while a run is in progress.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Running totals of a load run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// When the run started, for the total run time.
    pub started: Instant,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Rows the backend reported as written by the batches.
    pub total_rows: u64,
    /// Batches written successfully.
    pub batches_completed: u64,
    /// Registrations written before the first batch.
    pub enrollment_rows: u64,
    /// Time spent in the batch loop (generation and writes).
    pub batch_insert_time: Duration,
    /// Row count of the destination before the first batch.
    pub rows_before: Option<u64>,
}

impl RunStats {
    /// Empty counters for a run starting now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
            total_rows: 0,
            batches_completed: 0,
            enrollment_rows: 0,
            batch_insert_time: Duration::ZERO,
            rows_before: None,
        }
    }

    /// Record one written batch.
    pub fn add_batch(&mut self, rows: usize) {
        self.total_rows += rows as u64;
        self.batches_completed += 1;
    }

    /// Time since [`RunStats::start`].
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
