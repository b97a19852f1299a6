//! Remote store backends for xapi-db-load.
//!
//! Both destinations speak HTTP through a blocking `reqwest` client:
//!
//! - [`ClickHouseClient`] inserts rows directly through the ClickHouse HTTP
//!   interface using `FORMAT JSONEachRow`.
//! - [`RalphClient`] POSTs xAPI statements to a Ralph LRS, which persists
//!   them into ClickHouse; row counts are read from ClickHouse directly.
//!
//! Course metadata goes to the ClickHouse `event_sink` database either way,
//! and the periodic benchmark queries read the statements table.
//!
//! [`RemoteStoreBackend`] adapts any [`StoreClient`] to the
//! [`load_backend::Backend`] trait. No request is ever retried.

pub mod args;
mod backend;
mod clickhouse;
mod client;
mod mask;
mod ralph;

pub use args::{ClickHouseArgs, LrsArgs};
pub use backend::RemoteStoreBackend;
pub use clickhouse::{ClickHouseClient, ClickHouseConfig};
pub use client::{MetadataTable, StoreClient};
pub use mask::mask_url_password;
pub use ralph::{LrsConfig, RalphClient};
