//! Remote backends without a real store.

use axum::extract::{RawQuery, State};
use axum::Router;
use load_backend::{BackendError, BackendKind};
use load_backend_remote::{RemoteStoreBackend, StoreClient};
use load_framework::{LoadConfig, LoadPipeline, RunState};
use load_timing::TimingLog;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use xapi_db_load::load::write_report;
use xapi_db_load::{run_load_db, LoadDbArgs};
use xapi_generator::{Statement, StatementGenerator};

/// Store client counting rows in memory.
#[derive(Default)]
struct InMemoryStore {
    rows: Mutex<Vec<Statement>>,
}

impl StoreClient for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn ping(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn insert_statements(&self, statements: &[Statement]) -> Result<(), BackendError> {
        self.rows.lock().unwrap().extend_from_slice(statements);
        Ok(())
    }

    fn count_rows(&self) -> Result<u64, BackendError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

#[test]
fn test_mocked_remote_three_batches_of_five() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoadConfig::default()
        .with_backend(BackendKind::ClickHouse)
        .with_num_batches(3)
        .with_batch_size(5);
    let mut generator = StatementGenerator::new(config.generator.clone())?;
    let enrolled = generator.enrollment_count() as u64;
    let (timing, sink) = TimingLog::memory();
    let mut pipeline = LoadPipeline::new(config, timing);

    let backend = RemoteStoreBackend::connect(InMemoryStore::default())?;
    let report = pipeline.run_with(backend, &mut generator)?;

    let mut out = Vec::new();
    write_report(&report, &mut out)?;
    let summary = String::from_utf8(out)?;

    assert_eq!(pipeline.state(), RunState::Done);
    assert!(summary.contains("Done! Added 15 rows!"));
    assert!(summary.contains("Total run time"));
    assert_eq!(report.rows_before, Some(0));
    assert_eq!(report.rows_after, Some(15 + enrolled));
    assert_eq!(report.enrollment_rows, enrolled);
    assert_eq!(sink.events_of("batch_load").len(), 3);
    Ok(())
}

/// Rows counted by [`FakeClickHouse`].
#[derive(Clone, Default)]
struct StoreState {
    statements: Arc<AtomicU64>,
    metadata: Arc<AtomicU64>,
}

/// Minimal stand-in for the ClickHouse HTTP interface.
///
/// Counts the rows of every `JSONEachRow` insert, answers `SELECT count()`
/// from the statement count and anything else with `1`.
async fn clickhouse_handler(
    State(state): State<StoreState>,
    RawQuery(query): RawQuery,
    body: String,
) -> String {
    let insert = query.unwrap_or_default();
    if insert.contains("JSONEachRow") {
        let rows = body.lines().count() as u64;
        let counter = if insert.contains("xapi.xapi_events_all") {
            &state.statements
        } else {
            &state.metadata
        };
        counter.fetch_add(rows, Ordering::SeqCst);
        String::new()
    } else if body.trim() == "SELECT count() FROM xapi.xapi_events_all" {
        format!("{}\n", state.statements.load(Ordering::SeqCst))
    } else {
        "1\n".to_string()
    }
}

/// Axum server on a runtime of its own; the blocking client runs on the
/// test thread.
struct FakeClickHouse {
    port: u16,
    state: StoreState,
    _runtime: Runtime,
}

fn fake_clickhouse() -> FakeClickHouse {
    let state = StoreState::default();
    let app = Router::new()
        .fallback(clickhouse_handler)
        .with_state(state.clone());

    let runtime = Runtime::new().unwrap();
    let listener = runtime
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    runtime.spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeClickHouse {
        port,
        state,
        _runtime: runtime,
    }
}

#[test]
fn test_clickhouse_backend_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let server = fake_clickhouse();
    let temp_dir = TempDir::new()?;
    let enrolled = StatementGenerator::new(LoadConfig::default().generator)?.enrollment_count();

    let mut args = LoadDbArgs::default();
    args.common.backend = Some(BackendKind::ClickHouse);
    args.common.num_batches = Some(3);
    args.common.batch_size = Some(5);
    args.common.log_dir = Some(temp_dir.path().to_path_buf());
    args.clickhouse.db_host = Some("127.0.0.1".to_string());
    args.clickhouse.db_port = Some(server.port);
    args.clickhouse.db_password = Some("secret".to_string());

    let mut out = Vec::new();
    let report = run_load_db(args, &mut out)?;
    let summary = String::from_utf8(out)?;

    let statements = server.state.statements.load(Ordering::SeqCst);
    assert_eq!(statements, 15 + enrolled as u64);
    assert!(server.state.metadata.load(Ordering::SeqCst) > 0);
    assert_eq!(report.backend, "clickhouse");
    assert!(summary.contains("Done! Added 15 rows!"));
    assert!(summary.contains(&format!("Rows in destination: 0 -> {statements}")));
    Ok(())
}

#[test]
fn test_unreachable_clickhouse_fails_setup() {
    // Bind then drop to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let temp_dir = TempDir::new().unwrap();

    let mut args = LoadDbArgs::default();
    args.common.backend = Some(BackendKind::ClickHouse);
    args.common.log_dir = Some(temp_dir.path().to_path_buf());
    args.clickhouse.db_host = Some("127.0.0.1".to_string());
    args.clickhouse.db_port = Some(port);

    let mut out = Vec::new();
    let err = run_load_db(args, &mut out).unwrap_err();

    assert!(format!("{err:#}").starts_with("Connection error"));
    assert!(out.is_empty());
}
