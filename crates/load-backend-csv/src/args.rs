//! CLI argument definitions for the CSV file backend.

use clap::Args;
use std::path::PathBuf;

/// CSV-specific load arguments.
#[derive(Args, Clone, Debug, Default)]
pub struct CsvBackendArgs {
    /// Output path of the gzipped CSV file
    #[arg(long, alias = "csv_output_file")]
    pub csv_output_file: Option<PathBuf>,
}
