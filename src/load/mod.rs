//! `load-db` and `timing-summary` command handlers.

pub mod args;
pub mod config;
pub mod run;

pub use args::{GeneratorArgs, LoadDbArgs};
pub use config::{build_load_config, FileConfig};
pub use run::{run_load_db, run_timing_summary, write_report};
