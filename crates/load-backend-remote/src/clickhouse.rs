//! ClickHouse HTTP interface client.

use crate::client::{MetadataTable, StoreClient};
use load_backend::{BackendError, QueryTargets};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, info};
use xapi_generator::generators::{VERB_REGISTERED, VERB_UNREGISTERED};
use xapi_generator::Statement;

/// Where and how to reach ClickHouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickHouseConfig {
    pub host: String,
    /// HTTP interface port.
    pub port: u16,
    pub database: String,
    pub table: String,
    /// Database of the course, block and profile tables.
    pub event_sink_database: String,
    pub username: String,
    pub password: String,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8123,
            database: "xapi".to_string(),
            table: "xapi_events_all".to_string(),
            event_sink_database: "event_sink".to_string(),
            username: "default".to_string(),
            password: String::new(),
        }
    }
}

impl ClickHouseConfig {
    /// Base URL of the HTTP interface. A host given with a scheme is kept as is.
    pub fn url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            format!("{}:{}/", self.host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}/", self.host, self.port)
        }
    }

    /// `<database>.<table>`
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }

    /// Connection string with the password masked, for logs.
    pub fn display_url(&self) -> String {
        let url = self.url();
        let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
        format!(
            "{}{}:***@{}{}",
            &url[..scheme_end],
            self.username,
            &url[scheme_end..],
            self.qualified_table()
        )
    }

    /// Check the parameters a connection needs are present.
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.host.is_empty() {
            return Err(BackendError::Config(
                "db_host is required for ClickHouse backends".to_string(),
            ));
        }
        if self.database.is_empty() || self.table.is_empty() {
            return Err(BackendError::Config(
                "db_name and db_table must not be empty".to_string(),
            ));
        }
        if self.event_sink_database.is_empty() {
            return Err(BackendError::Config(
                "db_event_sink_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Blocking ClickHouse client talking to the HTTP interface.
pub struct ClickHouseClient {
    config: ClickHouseConfig,
    client: Client,
}

impl ClickHouseClient {
    /// Build a client. No request is sent until the first call.
    pub fn new(config: ClickHouseConfig) -> Result<Self, BackendError> {
        config.validate()?;
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }

    /// Run a query that returns a small text result.
    pub fn query(&self, query: &str) -> Result<String, BackendError> {
        debug!("ClickHouse query: {}", query);
        let response = self.post().body(query.to_string()).send();
        let response = check_response(response)?;
        response
            .text()
            .map_err(|e| BackendError::Connection(e.to_string()))
    }

    fn post(&self) -> RequestBuilder {
        self.client
            .post(self.config.url())
            .basic_auth(&self.config.username, Some(&self.config.password))
    }

    fn insert_query(&self) -> String {
        format!(
            "INSERT INTO {} (event_id, emission_time, event) FORMAT JSONEachRow",
            self.config.qualified_table()
        )
    }

    /// POST `body` as the data of `insert`.
    fn insert(&self, insert: &str, body: String) -> Result<(), BackendError> {
        let response = self
            .post()
            .query(&[
                ("query", insert),
                ("date_time_input_format", "best_effort"),
            ])
            .body(body)
            .send();
        check_response(response)?;
        Ok(())
    }
}

impl StoreClient for ClickHouseClient {
    fn name(&self) -> &str {
        "clickhouse"
    }

    fn ping(&self) -> Result<(), BackendError> {
        self.query("SELECT 1").map(|_| ())
    }

    fn insert_statements(&self, statements: &[Statement]) -> Result<(), BackendError> {
        let body = json_each_row(statements)?;
        self.insert(&self.insert_query(), body)
    }

    fn count_rows(&self) -> Result<u64, BackendError> {
        let query = format!("SELECT count() FROM {}", self.config.qualified_table());
        let text = self.query(&query)?;
        text.trim().parse::<u64>().map_err(|e| {
            BackendError::Serialization(format!("unexpected count result '{}': {e}", text.trim()))
        })
    }

    fn insert_metadata(
        &self,
        table: MetadataTable,
        rows: &[serde_json::Value],
    ) -> Result<(), BackendError> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut body = String::new();
        for row in rows {
            let line = serde_json::to_string(row)
                .map_err(|e| BackendError::Serialization(e.to_string()))?;
            body.push_str(&line);
            body.push('\n');
        }
        let insert = format!(
            "INSERT INTO {}.{} FORMAT JSONEachRow",
            self.config.event_sink_database,
            table.table_name()
        );
        self.insert(&insert, body)
    }

    fn run_queries(&self, targets: &QueryTargets) -> Result<(), BackendError> {
        for (label, query) in benchmark_queries(&self.config.qualified_table(), targets) {
            let start = Instant::now();
            let result = self.query(&query)?;
            info!(
                "{}: {} ({:.3}s)",
                label,
                result.trim(),
                start.elapsed().as_secs_f64()
            );
        }
        Ok(())
    }

    fn db_time(&self) -> Result<Option<String>, BackendError> {
        let text = self.query("SELECT timezone(), now()")?;
        Ok(Some(text.trim().replace('\t', " ")))
    }
}

/// Registration counts for the course, its org and one learner, then the
/// course's net enrollment.
pub(crate) fn benchmark_queries(table: &str, targets: &QueryTargets) -> Vec<(&'static str, String)> {
    let object = "JSONExtractString(event, 'object', 'id')";
    let verb = "JSONExtractString(event, 'verb', 'id')";
    let actor = "JSONExtractString(event, 'actor', 'account', 'name')";
    let course = quote(&targets.course_url);
    let org_pattern = quote(&format!("%course-v1:{}+%", targets.org));
    let actor_id = quote(&targets.actor_id.to_string());
    let registered = quote(VERB_REGISTERED);
    let unregistered = quote(VERB_UNREGISTERED);

    vec![
        (
            "Course registrations",
            format!("SELECT count() FROM {table} WHERE {object} = {course} AND {verb} = {registered}"),
        ),
        (
            "Org registrations",
            format!(
                "SELECT count() FROM {table} WHERE {object} LIKE {org_pattern} AND {verb} = {registered}"
            ),
        ),
        (
            "Learner registrations",
            format!("SELECT count() FROM {table} WHERE {actor} = {actor_id} AND {verb} = {registered}"),
        ),
        (
            "Course net enrollments",
            format!(
                "SELECT countIf({verb} = {registered}) - countIf({verb} = {unregistered}) \
                 FROM {table} WHERE {object} = {course}"
            ),
        ),
    ]
}

/// ClickHouse string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Newline-delimited insert body, one object per statement.
pub(crate) fn json_each_row(statements: &[Statement]) -> Result<String, BackendError> {
    let mut body = String::new();
    for statement in statements {
        let row = json!({
            "event_id": statement.event_id,
            "emission_time": statement.emission_time_str(),
            "event": statement.event_json(),
        });
        let line =
            serde_json::to_string(&row).map_err(|e| BackendError::Serialization(e.to_string()))?;
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}

/// Map transport failures to `Connection` and non-2xx answers to `Rejected`.
pub(crate) fn check_response(
    response: Result<Response, reqwest::Error>,
) -> Result<Response, BackendError> {
    let response = response.map_err(|e| BackendError::Connection(e.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(BackendError::Rejected {
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}
