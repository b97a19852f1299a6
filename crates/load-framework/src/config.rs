//! Configuration for a load run.

use crate::error::LoadError;
use load_backend::BackendKind;
use load_backend_remote::{ClickHouseConfig, LrsConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use xapi_generator::GeneratorConfig;

/// Everything a load run needs, after defaults, config file and command
/// line have been merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Destination to load statements into.
    pub backend: BackendKind,
    /// Number of batches to generate and write.
    pub num_batches: u64,
    /// Number of statements per batch.
    pub batch_size: usize,
    /// Output file of the `csv_file` backend.
    pub csv_output_file: Option<PathBuf>,
    /// ClickHouse connection, used by both remote backends.
    pub clickhouse: ClickHouseConfig,
    /// LRS connection, used by `ralph_clickhouse`.
    pub lrs: LrsConfig,
    /// Directory the timing log is written to.
    pub log_dir: PathBuf,
    /// Shape of the synthetic population.
    pub generator: GeneratorConfig,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            num_batches: 1,
            batch_size: 10_000,
            csv_output_file: None,
            clickhouse: ClickHouseConfig::default(),
            lrs: LrsConfig::default(),
            log_dir: PathBuf::from("logs"),
            generator: GeneratorConfig::default(),
        }
    }
}

impl LoadConfig {
    /// Set the backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the number of batches.
    pub fn with_num_batches(mut self, num_batches: u64) -> Self {
        self.num_batches = num_batches;
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the CSV output file.
    pub fn with_csv_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_output_file = Some(path.into());
        self
    }

    /// Set the ClickHouse connection.
    pub fn with_clickhouse(mut self, clickhouse: ClickHouseConfig) -> Self {
        self.clickhouse = clickhouse;
        self
    }

    /// Set the LRS connection.
    pub fn with_lrs(mut self, lrs: LrsConfig) -> Self {
        self.lrs = lrs;
        self
    }

    /// Set the timing log directory.
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Set the generator configuration.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Number of rows a successful run adds.
    pub fn expected_rows(&self) -> u64 {
        self.num_batches.saturating_mul(self.batch_size as u64)
    }

    /// Check the batch numbers only.
    pub fn validate_batches(&self) -> Result<(), LoadError> {
        if self.batch_size == 0 {
            return Err(LoadError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.num_batches == 0 {
            return Err(LoadError::Config(
                "num_batches must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Check every parameter the selected backend needs is present and the
    /// generator settings are consistent.
    pub fn validate(&self) -> Result<(), LoadError> {
        self.validate_batches()?;

        match self.backend {
            BackendKind::CsvFile => {
                if self.csv_output_file.is_none() {
                    return Err(LoadError::Config(
                        "csv_output_file is required for the csv_file backend".to_string(),
                    ));
                }
            }
            BackendKind::ClickHouse => {
                self.clickhouse
                    .validate()
                    .map_err(|e| LoadError::Config(e.to_string()))?;
            }
            BackendKind::RalphClickHouse => {
                self.clickhouse
                    .validate()
                    .map_err(|e| LoadError::Config(e.to_string()))?;
                self.lrs
                    .validate()
                    .map_err(|e| LoadError::Config(e.to_string()))?;
            }
        }

        self.generator
            .validate()
            .map_err(|e| LoadError::Config(e.to_string()))
    }
}
