//! Backend selection.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of destinations a run can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum BackendKind {
    /// Gzipped CSV file on local disk
    #[default]
    #[value(name = "csv_file")]
    #[serde(rename = "csv_file")]
    CsvFile,
    /// Direct inserts into ClickHouse
    #[value(name = "clickhouse")]
    #[serde(rename = "clickhouse")]
    ClickHouse,
    /// xAPI statements POSTed to a Ralph LRS backed by ClickHouse
    #[value(name = "ralph_clickhouse")]
    #[serde(rename = "ralph_clickhouse")]
    RalphClickHouse,
}

impl BackendKind {
    /// Get the backend name as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::CsvFile => "csv_file",
            BackendKind::ClickHouse => "clickhouse",
            BackendKind::RalphClickHouse => "ralph_clickhouse",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
