//! Command-line interface for xapi-db-load
//!
//! # Usage Examples
//!
//! ## Load a gzipped CSV file
//! ```bash
//! xapi-db-load load-db \
//!   --backend csv_file \
//!   --csv-output-file /tmp/xapi.csv.gz \
//!   --num-batches 3 --batch-size 5
//! ```
//!
//! ## Load ClickHouse or Ralph
//! ```bash
//! # Passwords may also come from XAPI_DB_PASSWORD / XAPI_LRS_PASSWORD
//! xapi-db-load load-db \
//!   --backend clickhouse \
//!   --db-host localhost --db-username ch_admin \
//!   --num-batches 100 --batch-size 10000
//!
//! xapi-db-load load-db \
//!   --backend ralph_clickhouse \
//!   --db-host localhost \
//!   --lrs-url http://localhost:8100/xAPI/statements \
//!   --lrs-username ralph --num-batches 10 --batch-size 100
//! ```
//!
//! ## Settings from a file
//! ```bash
//! # Command-line flags override values from the file
//! xapi-db-load load-db --config-file load.yaml --num-batches 5
//! ```
//!
//! ## Timing logs
//! ```bash
//! xapi-db-load timing-summary logs/2024-05-01_10-00-00_timing.log
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xapi_db_load::{run_load_db, run_timing_summary, LoadDbArgs};

#[derive(Parser)]
#[command(name = "xapi-db-load")]
#[command(about = "Bulk load synthetic xAPI statements and time every step")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate statements and load them into the selected backend
    LoadDb {
        #[command(flatten)]
        args: LoadDbArgs,
    },

    /// Aggregate a timing log per timer type
    TimingSummary {
        /// Timing log written by a previous load-db run
        #[arg(value_name = "LOG_FILE")]
        log_file: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the summary and fallback timing lines
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::LoadDb { args } => {
            run_load_db(args, &mut stdout)?;
        }
        Commands::TimingSummary { log_file } => {
            run_timing_summary(&log_file, &mut stdout)?;
        }
    }

    Ok(())
}
