//! The destination capability.

use crate::error::BackendError;
use xapi_generator::{CourseBlock, CourseOverview, QueryTargets, Statement, UserProfile};

/// A destination that durably stores batches of statements.
///
/// The load pipeline drives any implementation the same way: metadata and
/// enrollments first, then one `write_batch` per batch, strictly in order,
/// then one `finalize`. Destinations that keep no metadata or cannot be
/// queried leave the defaults in place.
pub trait Backend {
    /// Short name used in logs and timer keys.
    fn name(&self) -> &str;

    /// Write every record of the batch, or fail the whole call.
    ///
    /// Returns the number of records written, which equals `records.len()`.
    fn write_batch(&mut self, records: &[Statement]) -> Result<usize, BackendError>;

    /// Flush and release held resources (file handles, connections).
    ///
    /// Must be idempotent: calling it when nothing is open is a no-op.
    fn finalize(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Current number of rows in the destination, if it can be queried.
    fn row_count(&mut self) -> Result<Option<u64>, BackendError> {
        Ok(None)
    }

    /// Store course overview rows. Returns the number stored.
    fn insert_course_overviews(&mut self, _rows: &[CourseOverview]) -> Result<usize, BackendError> {
        Ok(0)
    }

    /// Store course block rows. Returns the number stored.
    fn insert_course_blocks(&mut self, _rows: &[CourseBlock]) -> Result<usize, BackendError> {
        Ok(0)
    }

    /// Store learner profile rows. Returns the number stored.
    fn insert_user_profiles(&mut self, _rows: &[UserProfile]) -> Result<usize, BackendError> {
        Ok(0)
    }

    /// Store the registrations that precede the first batch.
    fn write_enrollments(&mut self, _records: &[Statement]) -> Result<usize, BackendError> {
        Ok(0)
    }

    /// Run the benchmark queries against what has been loaded so far.
    fn run_queries(&mut self, _targets: &QueryTargets) -> Result<(), BackendError> {
        Ok(())
    }

    /// The destination's clock, for lining logs up with server side timings.
    fn db_time(&mut self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write_batch(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        (**self).write_batch(records)
    }

    fn finalize(&mut self) -> Result<(), BackendError> {
        (**self).finalize()
    }

    fn row_count(&mut self) -> Result<Option<u64>, BackendError> {
        (**self).row_count()
    }

    fn insert_course_overviews(&mut self, rows: &[CourseOverview]) -> Result<usize, BackendError> {
        (**self).insert_course_overviews(rows)
    }

    fn insert_course_blocks(&mut self, rows: &[CourseBlock]) -> Result<usize, BackendError> {
        (**self).insert_course_blocks(rows)
    }

    fn insert_user_profiles(&mut self, rows: &[UserProfile]) -> Result<usize, BackendError> {
        (**self).insert_user_profiles(rows)
    }

    fn write_enrollments(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        (**self).write_enrollments(records)
    }

    fn run_queries(&mut self, targets: &QueryTargets) -> Result<(), BackendError> {
        (**self).run_queries(targets)
    }

    fn db_time(&mut self) -> Result<Option<String>, BackendError> {
        (**self).db_time()
    }
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write_batch(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        (**self).write_batch(records)
    }

    fn finalize(&mut self) -> Result<(), BackendError> {
        (**self).finalize()
    }

    fn row_count(&mut self) -> Result<Option<u64>, BackendError> {
        (**self).row_count()
    }

    fn insert_course_overviews(&mut self, rows: &[CourseOverview]) -> Result<usize, BackendError> {
        (**self).insert_course_overviews(rows)
    }

    fn insert_course_blocks(&mut self, rows: &[CourseBlock]) -> Result<usize, BackendError> {
        (**self).insert_course_blocks(rows)
    }

    fn insert_user_profiles(&mut self, rows: &[UserProfile]) -> Result<usize, BackendError> {
        (**self).insert_user_profiles(rows)
    }

    fn write_enrollments(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        (**self).write_enrollments(records)
    }

    fn run_queries(&mut self, targets: &QueryTargets) -> Result<(), BackendError> {
        (**self).run_queries(targets)
    }

    fn db_time(&mut self) -> Result<Option<String>, BackendError> {
        (**self).db_time()
    }
}
