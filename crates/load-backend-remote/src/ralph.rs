//! Ralph LRS client.

use crate::clickhouse::{check_response, ClickHouseClient};
use crate::client::{MetadataTable, StoreClient};
use crate::mask::mask_url_password;
use load_backend::{BackendError, QueryTargets};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xapi_generator::Statement;

/// Where and how to reach the LRS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LrsConfig {
    /// Statements endpoint, e.g. `http://ralph:8100/xAPI/statements`.
    pub url: String,
    pub username: String,
    pub password: String,
}

impl LrsConfig {
    /// The LRS URL with any inline password masked, for logs.
    pub fn display_url(&self) -> String {
        mask_url_password(&self.url)
    }

    pub fn validate(&self) -> Result<(), BackendError> {
        if self.url.is_empty() {
            return Err(BackendError::Config(
                "lrs_url is required for the ralph_clickhouse backend".to_string(),
            ));
        }
        self.parse_url().map(|_| ())
    }

    fn parse_url(&self) -> Result<Url, BackendError> {
        Url::parse(&self.url).map_err(|e| {
            BackendError::Config(format!("invalid lrs_url '{}': {e}", self.display_url()))
        })
    }
}

/// Client POSTing statements to Ralph. Row counts, metadata and queries go
/// to the ClickHouse store behind it.
pub struct RalphClient {
    lrs: LrsConfig,
    statements_url: Url,
    client: Client,
    clickhouse: ClickHouseClient,
}

impl RalphClient {
    pub fn new(lrs: LrsConfig, clickhouse: ClickHouseClient) -> Result<Self, BackendError> {
        lrs.validate()?;
        let statements_url = lrs.parse_url()?;
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Ok(Self {
            lrs,
            statements_url,
            client,
            clickhouse,
        })
    }

    /// The LRS heartbeat endpoint, at the root of the LRS host.
    pub fn heartbeat_url(&self) -> Result<Url, BackendError> {
        self.statements_url
            .join("/__heartbeat__")
            .map_err(|e| BackendError::Config(e.to_string()))
    }
}

impl StoreClient for RalphClient {
    fn name(&self) -> &str {
        "ralph_clickhouse"
    }

    fn ping(&self) -> Result<(), BackendError> {
        self.clickhouse.ping()?;
        let url = self.heartbeat_url()?;
        debug!("Checking LRS heartbeat at {}", url);
        check_response(self.client.get(url).send())?;
        Ok(())
    }

    fn insert_statements(&self, statements: &[Statement]) -> Result<(), BackendError> {
        let events: Vec<&serde_json::Value> = statements.iter().map(|s| &s.event).collect();
        let response = self
            .client
            .post(self.statements_url.clone())
            .basic_auth(&self.lrs.username, Some(&self.lrs.password))
            .json(&events)
            .send();
        check_response(response)?;
        Ok(())
    }

    fn count_rows(&self) -> Result<u64, BackendError> {
        self.clickhouse.count_rows()
    }

    fn insert_metadata(
        &self,
        table: MetadataTable,
        rows: &[serde_json::Value],
    ) -> Result<(), BackendError> {
        self.clickhouse.insert_metadata(table, rows)
    }

    fn run_queries(&self, targets: &QueryTargets) -> Result<(), BackendError> {
        self.clickhouse.run_queries(targets)
    }

    fn db_time(&self) -> Result<Option<String>, BackendError> {
        self.clickhouse.db_time()
    }
}
