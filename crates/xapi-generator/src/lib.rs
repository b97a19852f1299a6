//! Synthetic xAPI statement generator for xapi-db-load.
//!
//! This crate provides the `StatementGenerator` which produces deterministic
//! xAPI statements for a synthetic population of organizations, courses and
//! actors. The generator uses a single seeded RNG so that two runs with the
//! same [`GeneratorConfig`] produce identical statements.
//!
//! # Architecture
//!
//! ```text
//! GeneratorConfig
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │  StatementGenerator  │
//! │                      │
//! │  - rng (StdRng)      │
//! │  - actors / courses  │
//! │  - index             │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!    Statement { index, event_id, verb, actor_id, ..., event }
//! ```
//!
//! # Example
//!
//! ```rust
//! use xapi_generator::{GeneratorConfig, StatementGenerator, StatementSource};
//!
//! let config = GeneratorConfig::default().with_seed(42);
//! let mut generator = StatementGenerator::new(config).unwrap();
//! let batch = generator.next_batch(10).unwrap();
//! assert_eq!(batch.len(), 10);
//! ```
//!
//! # Event mix
//!
//! Statements are drawn from weighted event kinds modelled on real course
//! traffic: video interactions dominate, followed by problem checks and a
//! small share of registrations.

pub mod config;
pub mod course;
pub mod generator;
pub mod generators;
pub mod metadata;
pub mod statement;

// Re-exports for convenience
pub use config::GeneratorConfig;
pub use course::{Actor, Course};
pub use generator::{GeneratorError, StatementGenerator};
pub use generators::{EventKind, EventTarget};
pub use metadata::{CourseBlock, CourseOverview, Metadata, QueryTargets, UserProfile};
pub use statement::Statement;

/// A source of statement batches.
///
/// The load pipeline only depends on this trait, so tests can feed it
/// hand-built statements instead of the random generator. Sources without
/// a course population keep the empty defaults.
pub trait StatementSource {
    /// Produce the next `size` statements, in global index order.
    fn next_batch(&mut self, size: usize) -> Result<Vec<Statement>, GeneratorError>;

    /// Course, block and learner rows to publish before the first batch.
    fn metadata(&self) -> Metadata {
        Metadata::default()
    }

    /// One registration per enrolled actor per course.
    fn enrollment_statements(&mut self) -> Result<Vec<Statement>, GeneratorError> {
        Ok(Vec::new())
    }

    /// Objects for the `round`-th query benchmark.
    fn query_targets(&self, _round: u64) -> Option<QueryTargets> {
        None
    }
}
