//! Backend construction from configuration.

use crate::config::LoadConfig;
use crate::error::LoadError;
use load_backend::{Backend, BackendKind};
use load_backend_csv::CsvFileBackend;
use load_backend_remote::{ClickHouseClient, RalphClient, RemoteStoreBackend};
use tracing::info;

/// Build and connect the backend selected by `config.backend`.
///
/// Remote backends ping their store before returning; any failure here is
/// fatal for the run.
pub fn connect_backend(config: &LoadConfig) -> Result<Box<dyn Backend>, LoadError> {
    match config.backend {
        BackendKind::CsvFile => {
            let path = config.csv_output_file.as_ref().ok_or_else(|| {
                LoadError::Config("csv_output_file is required for the csv_file backend".to_string())
            })?;
            Ok(Box::new(CsvFileBackend::create(path)?))
        }
        BackendKind::ClickHouse => {
            info!("Connecting to ClickHouse at {}", config.clickhouse.display_url());
            let client = ClickHouseClient::new(config.clickhouse.clone())?;
            Ok(Box::new(RemoteStoreBackend::connect(client)?))
        }
        BackendKind::RalphClickHouse => {
            info!(
                "Connecting to Ralph at {} (ClickHouse at {})",
                config.lrs.display_url(),
                config.clickhouse.display_url()
            );
            let clickhouse = ClickHouseClient::new(config.clickhouse.clone())?;
            let client = RalphClient::new(config.lrs.clone(), clickhouse)?;
            Ok(Box::new(RemoteStoreBackend::connect(client)?))
        }
    }
}
