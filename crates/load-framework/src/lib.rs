//! Batch orchestration for xapi-db-load.
//!
//! This crate drives one load run:
//! 1. Validate the configuration
//! 2. Build the statement generator and connect the selected backend
//! 3. Publish course, block and learner metadata, then one registration per
//!    enrolled learner
//! 4. Generate and write `num_batches` batches of `batch_size` statements,
//!    with benchmark queries every 1000 batches, timing every step
//! 5. Finalize the backend and report
//!
//! # Example
//!
//! ```ignore
//! use load_framework::{LoadConfig, LoadPipeline};
//! use load_timing::TimingLog;
//!
//! let config = LoadConfig::default()
//!     .with_csv_output_file("/tmp/xapi.csv.gz")
//!     .with_num_batches(3)
//!     .with_batch_size(5);
//!
//! let timing = TimingLog::for_log_dir(&config.log_dir);
//! let mut pipeline = LoadPipeline::new(config, timing);
//! let report = pipeline.run()?;
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod source;

pub use config::LoadConfig;
pub use error::LoadError;
pub use metrics::RunStats;
pub use pipeline::{LoadPipeline, RunState};
pub use report::{format_elapsed, RunReport};
pub use source::connect_backend;
