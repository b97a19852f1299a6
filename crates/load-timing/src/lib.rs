//! Duration recording for xapi-db-load.
//!
//! Every timed operation produces one [`TimingEvent`], written as a single
//! JSON line to the run's timing sink:
//!
//! ```text
//! {"time":"2024-05-01T10:00:00.123456Z","timer":"batch_load","key":"Batch 3 of 10","duration":0.0421}
//! ```
//!
//! The sink is chosen once per run with [`TimingLog::for_log_dir`] and handed
//! to whoever needs to time things. Timers are scoped guards:
//!
//! ```rust
//! use load_timing::TimingLog;
//!
//! let (timing, events) = TimingLog::memory();
//! {
//!     let _timer = timing.timer("setup", "full_setup");
//!     // ... work ...
//! }
//! assert_eq!(events.events().len(), 1);
//! ```

mod error;
mod event;
mod sink;
mod summary;
mod timer;

pub use error::TimingError;
pub use event::TimingEvent;
pub use sink::{timing_log_path, FileSink, MemorySink, StdoutSink, TimingSink};
pub use summary::{TimerStats, TimingSummary};
pub use timer::{LogTimer, TimingDestination, TimingLog};
