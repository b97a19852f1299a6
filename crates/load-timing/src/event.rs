//! The record emitted for every timed operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How long one named operation took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEvent {
    /// When the measurement was taken (end of the operation).
    pub time: DateTime<Utc>,
    /// Top level type of the timer ("batch_load", "setup", ...).
    pub timer: String,
    /// Specific timer ("Batch 3 of 10", "full_setup", ...).
    pub key: String,
    /// Elapsed time in fractional seconds.
    pub duration: f64,
}

impl TimingEvent {
    /// Create an event stamped with the current time.
    pub fn new(timer: impl Into<String>, key: impl Into<String>, duration: f64) -> Self {
        Self {
            time: Utc::now(),
            timer: timer.into(),
            key: key.into(),
            duration,
        }
    }

    /// Encode as a single JSON line (without the trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
