//! The record handed to backends.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One synthetic xAPI event.
///
/// Backends decide how to serialize it; the load pipeline never looks
/// inside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    /// Global sequence number, strictly increasing across batches.
    pub index: u64,
    pub event_id: Uuid,
    /// Verb IRI.
    pub verb: String,
    pub actor_id: Uuid,
    pub org: String,
    /// Course URL.
    pub course_run_id: String,
    pub emission_time: DateTime<Utc>,
    /// The complete xAPI statement.
    pub event: serde_json::Value,
}

impl Statement {
    /// The xAPI statement as compact, single-line JSON.
    pub fn event_json(&self) -> String {
        self.event.to_string()
    }

    /// Emission time in the `YYYY-MM-DDTHH:MM:SS.ffffffZ` form.
    pub fn emission_time_str(&self) -> String {
        self.emission_time
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}
