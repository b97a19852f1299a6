//! Adapter from a [`StoreClient`] to the [`Backend`] trait.

use crate::client::{MetadataTable, StoreClient};
use load_backend::{
    Backend, BackendError, CourseBlock, CourseOverview, QueryTargets, UserProfile,
};
use serde::Serialize;
use tracing::{debug, info};
use xapi_generator::Statement;

/// Backend forwarding each batch to a remote store in one request.
pub struct RemoteStoreBackend<C: StoreClient> {
    client: C,
    rows_written: u64,
    finalized: bool,
}

impl<C: StoreClient> RemoteStoreBackend<C> {
    /// Wrap `client` after checking the store is reachable.
    ///
    /// A failed ping is returned as is; nothing is written in that case.
    pub fn connect(client: C) -> Result<Self, BackendError> {
        client.ping()?;
        info!("Connected to {} backend", client.name());
        Ok(Self {
            client,
            rows_written: 0,
            finalized: false,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Rows accepted by the store during this run.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    fn ensure_open(&self) -> Result<(), BackendError> {
        if self.finalized {
            return Err(BackendError::Connection(format!(
                "{} backend already finalized",
                self.client.name()
            )));
        }
        Ok(())
    }

    fn insert_metadata<T: Serialize>(
        &self,
        table: MetadataTable,
        rows: &[T],
    ) -> Result<usize, BackendError> {
        self.ensure_open()?;
        let values = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BackendError::Serialization(e.to_string()))?;
        self.client.insert_metadata(table, &values)?;
        info!("Inserted {} rows into {}", rows.len(), table.table_name());
        Ok(rows.len())
    }
}

impl<C: StoreClient> Backend for RemoteStoreBackend<C> {
    fn name(&self) -> &str {
        self.client.name()
    }

    fn write_batch(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        self.ensure_open()?;
        self.client.insert_statements(records)?;
        self.rows_written += records.len() as u64;
        debug!("{} rows written to {}", self.rows_written, self.client.name());
        Ok(records.len())
    }

    fn finalize(&mut self) -> Result<(), BackendError> {
        if !self.finalized {
            self.finalized = true;
            info!(
                "{} backend finished after {} rows",
                self.client.name(),
                self.rows_written
            );
        }
        Ok(())
    }

    fn row_count(&mut self) -> Result<Option<u64>, BackendError> {
        self.client.count_rows().map(Some)
    }

    fn insert_course_overviews(&mut self, rows: &[CourseOverview]) -> Result<usize, BackendError> {
        self.insert_metadata(MetadataTable::CourseOverviews, rows)
    }

    fn insert_course_blocks(&mut self, rows: &[CourseBlock]) -> Result<usize, BackendError> {
        self.insert_metadata(MetadataTable::CourseBlocks, rows)
    }

    fn insert_user_profiles(&mut self, rows: &[UserProfile]) -> Result<usize, BackendError> {
        self.insert_metadata(MetadataTable::UserProfiles, rows)
    }

    /// Registrations land in the statements table like any batch.
    fn write_enrollments(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        self.write_batch(records)
    }

    fn run_queries(&mut self, targets: &QueryTargets) -> Result<(), BackendError> {
        self.ensure_open()?;
        self.client.run_queries(targets)
    }

    fn db_time(&mut self) -> Result<Option<String>, BackendError> {
        self.client.db_time()
    }
}
