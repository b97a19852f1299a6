//! Load run integration tests.
//!
//! Each test drives a complete run (configuration, setup, batch loop,
//! finalize, summary) and checks the output the user sees:
//! 1. The gzipped CSV file backend end to end through the CLI entry point
//! 2. The remote backend adapter against an in-process store client
//! 3. Timing logs and their summary

mod csv_file_load;
mod remote_load;
mod timing_log;
