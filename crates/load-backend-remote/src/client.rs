//! The remote store capability.

use load_backend::{BackendError, QueryTargets};
use xapi_generator::Statement;

/// `event_sink` tables holding course and learner metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTable {
    CourseOverviews,
    CourseBlocks,
    UserProfiles,
}

impl MetadataTable {
    pub fn table_name(self) -> &'static str {
        match self {
            MetadataTable::CourseOverviews => "course_overviews",
            MetadataTable::CourseBlocks => "course_blocks",
            MetadataTable::UserProfiles => "user_profile",
        }
    }
}

/// A connection to a remote statement store.
///
/// Implementations perform exactly one request per call and never retry.
pub trait StoreClient {
    /// Backend name used in logs and timer keys.
    fn name(&self) -> &str;

    /// Check the store is reachable and accepts the credentials.
    fn ping(&self) -> Result<(), BackendError>;

    /// Store every statement, in order, or fail the whole call.
    fn insert_statements(&self, statements: &[Statement]) -> Result<(), BackendError>;

    /// Number of rows currently stored.
    fn count_rows(&self) -> Result<u64, BackendError>;

    /// Store metadata rows, already encoded as JSON objects.
    fn insert_metadata(
        &self,
        _table: MetadataTable,
        _rows: &[serde_json::Value],
    ) -> Result<(), BackendError> {
        Ok(())
    }

    /// Run and time the benchmark queries.
    fn run_queries(&self, _targets: &QueryTargets) -> Result<(), BackendError> {
        Ok(())
    }

    /// The store's timezone and current time.
    fn db_time(&self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
}
