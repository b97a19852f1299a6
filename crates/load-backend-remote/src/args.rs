//! CLI argument definitions for the remote backends.

use clap::Args;

/// ClickHouse connection arguments.
///
/// Used by both remote backends: `clickhouse` writes through it and
/// `ralph_clickhouse` reads row counts from it.
#[derive(Args, Clone, Debug, Default)]
pub struct ClickHouseArgs {
    /// ClickHouse host name
    #[arg(long, alias = "db_host")]
    pub db_host: Option<String>,

    /// ClickHouse HTTP port
    #[arg(long, alias = "db_port")]
    pub db_port: Option<u16>,

    /// ClickHouse database
    #[arg(long, alias = "db_name")]
    pub db_name: Option<String>,

    /// ClickHouse table statements are stored in
    #[arg(long, alias = "db_table")]
    pub db_table: Option<String>,

    /// ClickHouse database holding course and learner metadata
    #[arg(long, alias = "db_event_sink_name")]
    pub db_event_sink_name: Option<String>,

    /// ClickHouse user name
    #[arg(long, alias = "db_username")]
    pub db_username: Option<String>,

    /// ClickHouse password
    #[arg(long, alias = "db_password", env = "XAPI_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,
}

/// Ralph LRS arguments.
#[derive(Args, Clone, Debug, Default)]
pub struct LrsArgs {
    /// URL of the LRS statements endpoint
    #[arg(long, alias = "lrs_url")]
    pub lrs_url: Option<String>,

    /// LRS user name
    #[arg(long, alias = "lrs_username")]
    pub lrs_username: Option<String>,

    /// LRS password
    #[arg(long, alias = "lrs_password", env = "XAPI_LRS_PASSWORD", hide_env_values = true)]
    pub lrs_password: Option<String>,
}
