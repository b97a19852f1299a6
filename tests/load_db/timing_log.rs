//! Timing log written by a run, and its summary.

use load_backend::BackendKind;
use load_timing::TimingEvent;
use std::path::PathBuf;
use tempfile::TempDir;
use xapi_db_load::{run_load_db, run_timing_summary, LoadDbArgs};

fn load_into(temp_dir: &TempDir) -> PathBuf {
    let log_dir = temp_dir.path().join("logs");
    std::fs::create_dir(&log_dir).unwrap();

    let mut args = LoadDbArgs::default();
    args.common.backend = Some(BackendKind::CsvFile);
    args.common.num_batches = Some(3);
    args.common.batch_size = Some(5);
    args.common.log_dir = Some(log_dir.clone());
    args.csv.csv_output_file = Some(temp_dir.path().join("xapi.csv.gz"));
    run_load_db(args, &mut Vec::new()).unwrap();

    let logs: Vec<PathBuf> = std::fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);
    logs.into_iter().next().unwrap()
}

#[test]
fn test_one_event_per_timed_step() {
    let temp_dir = TempDir::new().unwrap();
    let log_file = load_into(&temp_dir);

    assert!(log_file
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("_timing.log"));

    let events: Vec<TimingEvent> = std::fs::read_to_string(&log_file)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let timers: Vec<(&str, &str)> = events
        .iter()
        .map(|e| (e.timer.as_str(), e.key.as_str()))
        .collect();
    assert_eq!(
        timers,
        vec![
            ("setup", "full_setup"),
            ("insert_metadata", "course"),
            ("insert_metadata", "blocks"),
            ("insert_metadata", "user_data"),
            ("enrollment", "get_enrollment_events"),
            ("enrollment", "insert_events"),
            ("batch_generate", "Batch 1 of 3"),
            ("batch_load", "Batch 1 of 3"),
            ("batch_queries", "Batch 1 of 3"),
            ("batch_generate", "Batch 2 of 3"),
            ("batch_load", "Batch 2 of 3"),
            ("batch_generate", "Batch 3 of 3"),
            ("batch_load", "Batch 3 of 3"),
            ("batches", "total"),
            ("finalize", "csv_file"),
        ]
    );
    assert!(events.iter().all(|e| e.duration >= 0.0));
}

#[test]
fn test_timing_summary_table() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let log_file = load_into(&temp_dir);

    let mut out = Vec::new();
    run_timing_summary(&log_file, &mut out)?;
    let table = String::from_utf8(out)?;

    for timer in [
        "setup",
        "insert_metadata",
        "enrollment",
        "batch_generate",
        "batch_load",
        "batches",
        "finalize",
    ] {
        assert!(table.contains(timer), "missing {timer} in\n{table}");
    }
    Ok(())
}

#[test]
fn test_timing_summary_missing_file() {
    let err = run_timing_summary(&PathBuf::from("/nonexistent/timing.log"), &mut Vec::new())
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read timing log"));
}
