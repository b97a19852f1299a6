//! `load-db` command-line arguments.

use chrono::NaiveDate;
use clap::Args;
use load_backend::CommonLoadArgs;
use load_backend_csv::CsvBackendArgs;
use load_backend_remote::{ClickHouseArgs, LrsArgs};
use std::path::PathBuf;

/// Arguments of the `load-db` command.
///
/// Every value is optional: unset flags fall back to the config file, then
/// to the built-in defaults.
#[derive(Args, Clone, Debug, Default)]
pub struct LoadDbArgs {
    /// YAML file with any of the options below, using snake_case keys
    #[arg(long, alias = "config_file", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonLoadArgs,

    #[command(flatten)]
    pub csv: CsvBackendArgs,

    #[command(flatten)]
    pub clickhouse: ClickHouseArgs,

    #[command(flatten)]
    pub lrs: LrsArgs,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

/// Shape of the synthetic population.
#[derive(Args, Clone, Debug, Default)]
pub struct GeneratorArgs {
    /// Number of distinct learners
    #[arg(long, alias = "num_actors")]
    pub num_actors: Option<usize>,

    /// Number of course runs
    #[arg(long, alias = "num_courses")]
    pub num_courses: Option<usize>,

    /// Number of organizations courses belong to
    #[arg(long, alias = "num_organizations")]
    pub num_organizations: Option<usize>,

    /// Earliest course start (YYYY-MM-DD)
    #[arg(long, alias = "start_date")]
    pub start_date: Option<NaiveDate>,

    /// Latest course end (YYYY-MM-DD)
    #[arg(long, alias = "end_date")]
    pub end_date: Option<NaiveDate>,

    /// Length of each course run in days
    #[arg(long, alias = "course_length_days")]
    pub course_length_days: Option<u32>,
}
