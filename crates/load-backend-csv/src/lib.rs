//! Gzipped CSV file backend.
//!
//! Writes one CSV row per statement into a gzip stream, with no header
//! row, so the decompressed file has exactly one line per statement.
//! Course metadata and enrollment registrations land in companion files
//! next to it (`<stem>_courses.csv.gz`, `<stem>_enrollments.csv.gz`, ...).
//!
//! # Example
//!
//! ```ignore
//! use load_backend::Backend;
//! use load_backend_csv::CsvFileBackend;
//!
//! let mut backend = CsvFileBackend::create("/tmp/xapi.csv.gz")?;
//! backend.write_batch(&statements)?;
//! backend.finalize()?;
//! ```

pub mod args;
mod backend;

pub use args::CsvBackendArgs;
pub use backend::{statement_to_csv_record, CsvFileBackend, WriteMetrics, CSV_COLUMNS};
