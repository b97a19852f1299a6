//! xapi-db-load library
//!
//! Generates synthetic xAPI statements and bulk loads them, batch by batch,
//! into a gzipped CSV file, ClickHouse or a Ralph LRS, recording how long
//! every step takes.
//!
//! # Crates
//!
//! - `xapi_generator` - deterministic statement generation
//! - `load_timing` - timing events, sinks and summaries
//! - `load_backend` - the `Backend` trait shared by all destinations
//! - `load_backend_csv` - gzipped CSV file backend
//! - `load_backend_remote` - ClickHouse and Ralph backends
//! - `load_framework` - configuration, batch orchestration and reporting
//!
//! # CLI Usage
//!
//! ```bash
//! # 3 batches of 5 statements into a local file
//! xapi-db-load load-db --backend csv_file --csv-output-file /tmp/xapi.csv.gz \
//!   --num-batches 3 --batch-size 5
//!
//! # Straight into ClickHouse
//! xapi-db-load load-db --backend clickhouse --db-host localhost \
//!   --db-username ch_admin --num-batches 100 --batch-size 10000
//!
//! # Aggregate a timing log
//! xapi-db-load timing-summary logs/2024-05-01_10-00-00_timing.log
//! ```

pub mod load;

pub use load::{run_load_db, run_timing_summary, LoadDbArgs};
