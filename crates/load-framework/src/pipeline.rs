//! Load run orchestration.

use crate::config::LoadConfig;
use crate::error::LoadError;
use crate::metrics::RunStats;
use crate::report::RunReport;
use crate::source::connect_backend;
use load_backend::Backend;
use load_timing::TimingLog;
use std::time::Instant;
use tracing::{error, info, warn};
use xapi_generator::{StatementGenerator, StatementSource};

/// Progress and the database clock are logged every this many batches.
const PROGRESS_INTERVAL: u64 = 100;

/// Benchmark queries run after every this many batches, starting with the first.
const QUERY_INTERVAL: u64 = 1000;

/// Lifecycle of a load run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Validating configuration and setting up.
    Initializing,
    /// Writing metadata, enrollments and batches.
    Running,
    /// All batches written and the backend finalized.
    Done,
    /// A configuration, setup or write error ended the run.
    Failed,
}

/// Drives a run: setup, metadata, enrollments, the batch loop and
/// finalization, timing each step.
pub struct LoadPipeline {
    config: LoadConfig,
    timing: TimingLog,
    state: RunState,
}

impl LoadPipeline {
    /// Create a new pipeline. Nothing runs until [`LoadPipeline::run`].
    pub fn new(config: LoadConfig, timing: TimingLog) -> Self {
        Self {
            config,
            timing,
            state: RunState::Initializing,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the whole load: validate, set up the generator and the configured
    /// backend, then write every batch.
    ///
    /// Configuration errors are returned before any timing data is written.
    pub fn run(&mut self) -> Result<RunReport, LoadError> {
        let stats = RunStats::start();
        self.state = RunState::Initializing;

        if let Err(e) = self.config.validate() {
            self.state = RunState::Failed;
            return Err(e);
        }

        info!(
            "Loading {} batches of {} statements into {}",
            self.config.num_batches, self.config.batch_size, self.config.backend
        );

        let setup = {
            let _timer = self.timing.timer("setup", "full_setup");
            StatementGenerator::new(self.config.generator.clone())
                .map_err(LoadError::from)
                .and_then(|generator| Ok((generator, connect_backend(&self.config)?)))
        };

        match setup {
            Ok((mut generator, backend)) => self.drive(backend, &mut generator, stats),
            Err(e) => {
                error!("Setup failed: {}", e);
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    /// Run the load against an already connected backend and source.
    ///
    /// Only the batch numbers are validated here; the backend is used as
    /// given and finalized on every exit path.
    pub fn run_with<B: Backend, S: StatementSource>(
        &mut self,
        backend: B,
        source: &mut S,
    ) -> Result<RunReport, LoadError> {
        let stats = RunStats::start();
        self.state = RunState::Initializing;

        if let Err(e) = self.config.validate_batches() {
            self.state = RunState::Failed;
            return Err(e);
        }

        self.drive(backend, source, stats)
    }

    fn drive<B: Backend, S: StatementSource>(
        &mut self,
        mut backend: B,
        source: &mut S,
        mut stats: RunStats,
    ) -> Result<RunReport, LoadError> {
        self.state = RunState::Running;

        if let Err(e) = self.load(&mut backend, source, &mut stats) {
            error!("Load into {} failed: {}", backend.name(), e);
            // The primary error is kept; cleanup failures are only logged
            if let Err(finalize_err) = backend.finalize() {
                warn!(
                    "Failed to finalize {} after error: {}",
                    backend.name(),
                    finalize_err
                );
            }
            self.state = RunState::Failed;
            return Err(e);
        }

        let backend_name = backend.name().to_string();
        let finalized = self
            .timing
            .time("finalize", backend_name.as_str(), || backend.finalize());
        if let Err(e) = finalized {
            error!("Failed to finalize {}: {}", backend_name, e);
            self.state = RunState::Failed;
            return Err(e.into());
        }

        let rows_after = match backend.row_count() {
            Ok(count) => count,
            Err(e) => {
                error!("Could not count rows in {} after load: {}", backend_name, e);
                self.state = RunState::Failed;
                return Err(e.into());
            }
        };
        if let Some(count) = rows_after {
            info!("Rows in {} after load: {}", backend_name, count);
        }

        self.state = RunState::Done;
        let report = RunReport::new(backend_name, &stats, rows_after);
        info!(
            "Load complete: {} rows in {} batches",
            report.total_rows, report.batches
        );
        Ok(report)
    }

    fn load<B: Backend, S: StatementSource>(
        &self,
        backend: &mut B,
        source: &mut S,
        stats: &mut RunStats,
    ) -> Result<(), LoadError> {
        stats.rows_before = backend.row_count()?;
        if let Some(count) = stats.rows_before {
            info!("Rows in {} before load: {}", backend.name(), count);
        }

        self.insert_metadata(backend, source)?;
        stats.enrollment_rows = self.insert_enrollments(backend, source)?;
        self.load_batches(backend, source, stats)
    }

    fn insert_metadata<B: Backend, S: StatementSource>(
        &self,
        backend: &mut B,
        source: &S,
    ) -> Result<(), LoadError> {
        let metadata = source.metadata();

        let courses = self.timing.time("insert_metadata", "course", || {
            backend.insert_course_overviews(&metadata.courses)
        })?;
        let blocks = self.timing.time("insert_metadata", "blocks", || {
            backend.insert_course_blocks(&metadata.blocks)
        })?;
        let profiles = self.timing.time("insert_metadata", "user_data", || {
            backend.insert_user_profiles(&metadata.profiles)
        })?;

        info!(
            "Inserted {} courses, {} blocks and {} user profiles",
            courses, blocks, profiles
        );
        Ok(())
    }

    fn insert_enrollments<B: Backend, S: StatementSource>(
        &self,
        backend: &mut B,
        source: &mut S,
    ) -> Result<u64, LoadError> {
        let enrollments = self
            .timing
            .time("enrollment", "get_enrollment_events", || {
                source.enrollment_statements()
            })?;
        let written = self.timing.time("enrollment", "insert_events", || {
            backend.write_enrollments(&enrollments)
        })?;

        info!("Inserted {} enrollment events", written);
        Ok(written as u64)
    }

    fn load_batches<B: Backend, S: StatementSource>(
        &self,
        backend: &mut B,
        source: &mut S,
        stats: &mut RunStats,
    ) -> Result<(), LoadError> {
        let num_batches = self.config.num_batches;
        let batch_size = self.config.batch_size;
        let loop_started = Instant::now();
        let _timer = self.timing.timer("batches", "total");

        for i in 0..num_batches {
            if i % PROGRESS_INTERVAL == 0 {
                info!("{} of {}", i, num_batches);
                if let Some(db_time) = backend.db_time()? {
                    info!("Database time: {}", db_time);
                }
            }

            let key = format!("Batch {} of {}", i + 1, num_batches);
            let batch = self
                .timing
                .time("batch_generate", key.as_str(), || source.next_batch(batch_size))?;
            let written = self
                .timing
                .time("batch_load", key.as_str(), || backend.write_batch(&batch))?;

            stats.add_batch(written);

            if i % QUERY_INTERVAL == 0 {
                if let Some(targets) = source.query_targets(i / QUERY_INTERVAL) {
                    self.timing
                        .time("batch_queries", key, || backend.run_queries(&targets))?;
                }
            }
        }

        stats.batch_insert_time = loop_started.elapsed();
        Ok(())
    }
}
