//! Merging of defaults, config file and command line into a [`LoadConfig`].

use super::args::LoadDbArgs;
use anyhow::Context;
use chrono::NaiveDate;
use load_backend::BackendKind;
use load_framework::LoadConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a `--config-file`.
///
/// Keys are the snake_case names of the command-line options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend: Option<BackendKind>,
    pub num_batches: Option<u64>,
    pub batch_size: Option<usize>,
    pub csv_output_file: Option<PathBuf>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_name: Option<String>,
    pub db_table: Option<String>,
    pub db_event_sink_name: Option<String>,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
    pub lrs_url: Option<String>,
    pub lrs_username: Option<String>,
    pub lrs_password: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub num_actors: Option<usize>,
    pub num_courses: Option<usize>,
    pub num_organizations: Option<usize>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub course_length_days: Option<u32>,
}

impl FileConfig {
    /// Parse a YAML config document.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse config file")
    }

    /// Load a YAML config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid config file {path:?}"))
    }
}

/// Build the run configuration. Command-line values win over the config
/// file, which wins over the defaults. The result is not validated yet.
pub fn build_load_config(args: LoadDbArgs) -> anyhow::Result<LoadConfig> {
    let file = match &args.config_file {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    Ok(merge(args, file))
}

fn merge(args: LoadDbArgs, file: FileConfig) -> LoadConfig {
    let mut config = LoadConfig::default();

    if let Some(backend) = args.common.backend.or(file.backend) {
        config.backend = backend;
    }
    if let Some(num_batches) = args.common.num_batches.or(file.num_batches) {
        config.num_batches = num_batches;
    }
    if let Some(batch_size) = args.common.batch_size.or(file.batch_size) {
        config.batch_size = batch_size;
    }
    config.csv_output_file = args.csv.csv_output_file.or(file.csv_output_file);
    if let Some(log_dir) = args.common.log_dir.or(file.log_dir) {
        config.log_dir = log_dir;
    }

    let clickhouse = &mut config.clickhouse;
    if let Some(host) = args.clickhouse.db_host.or(file.db_host) {
        clickhouse.host = host;
    }
    if let Some(port) = args.clickhouse.db_port.or(file.db_port) {
        clickhouse.port = port;
    }
    if let Some(database) = args.clickhouse.db_name.or(file.db_name) {
        clickhouse.database = database;
    }
    if let Some(table) = args.clickhouse.db_table.or(file.db_table) {
        clickhouse.table = table;
    }
    if let Some(event_sink) = args
        .clickhouse
        .db_event_sink_name
        .or(file.db_event_sink_name)
    {
        clickhouse.event_sink_database = event_sink;
    }
    if let Some(username) = args.clickhouse.db_username.or(file.db_username) {
        clickhouse.username = username;
    }
    if let Some(password) = args.clickhouse.db_password.or(file.db_password) {
        clickhouse.password = password;
    }

    let lrs = &mut config.lrs;
    if let Some(url) = args.lrs.lrs_url.or(file.lrs_url) {
        lrs.url = url;
    }
    if let Some(username) = args.lrs.lrs_username.or(file.lrs_username) {
        lrs.username = username;
    }
    if let Some(password) = args.lrs.lrs_password.or(file.lrs_password) {
        lrs.password = password;
    }

    let generator = &mut config.generator;
    if let Some(seed) = args.common.seed.or(file.seed) {
        generator.seed = seed;
    }
    if let Some(num_actors) = args.generator.num_actors.or(file.num_actors) {
        generator.num_actors = num_actors;
    }
    if let Some(num_courses) = args.generator.num_courses.or(file.num_courses) {
        generator.num_courses = num_courses;
    }
    if let Some(num_organizations) = args.generator.num_organizations.or(file.num_organizations) {
        generator.num_organizations = num_organizations;
    }
    if let Some(start_date) = args.generator.start_date.or(file.start_date) {
        generator.start_date = start_date;
    }
    if let Some(end_date) = args.generator.end_date.or(file.end_date) {
        generator.end_date = end_date;
    }
    if let Some(days) = args.generator.course_length_days.or(file.course_length_days) {
        generator.course_length_days = days;
    }

    config
}
