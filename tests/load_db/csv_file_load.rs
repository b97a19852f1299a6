//! `load-db` with the gzipped CSV file backend.

use flate2::read::GzDecoder;
use load_backend::BackendKind;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xapi_db_load::{run_load_db, LoadDbArgs};

fn csv_args(output: &Path, log_dir: &Path) -> LoadDbArgs {
    let mut args = LoadDbArgs::default();
    args.common.backend = Some(BackendKind::CsvFile);
    args.common.num_batches = Some(3);
    args.common.batch_size = Some(5);
    args.common.log_dir = Some(log_dir.to_path_buf());
    args.csv.csv_output_file = Some(output.to_path_buf());
    args
}

fn gz_lines(path: &Path) -> Vec<String> {
    BufReader::new(GzDecoder::new(File::open(path).unwrap()))
        .lines()
        .map(|l| l.unwrap())
        .collect()
}

#[test]
fn test_three_batches_of_five() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("xapi.csv.gz");

    let mut out = Vec::new();
    let report = run_load_db(csv_args(&output, temp_dir.path()), &mut out)?;
    let summary = String::from_utf8(out)?;

    assert_eq!(report.total_rows, 15);
    assert!(summary.contains("Done! Added 15 rows!"));
    assert!(summary.contains("Total run time"));
    assert!(summary.contains("Batch insert time"));
    assert_eq!(gz_lines(&output).len(), 15);

    // Metadata and registrations live next to the statements
    let companion = |table: &str| temp_dir.path().join(format!("xapi_{table}.csv.gz"));
    assert_eq!(gz_lines(&companion("courses")).len(), 10);
    assert_eq!(gz_lines(&companion("user_profiles")).len(), 100);
    assert!(!gz_lines(&companion("blocks")).is_empty());
    let enrollments = gz_lines(&companion("enrollments"));
    assert_eq!(enrollments.len() as u64, report.enrollment_rows);
    assert!(summary.contains(&format!("Enrollment events: {}", report.enrollment_rows)));
    Ok(())
}

#[test]
fn test_same_seed_same_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let first = temp_dir.path().join("first.csv.gz");
    let second = temp_dir.path().join("second.csv.gz");

    run_load_db(csv_args(&first, temp_dir.path()), &mut Vec::new())?;
    run_load_db(csv_args(&second, temp_dir.path()), &mut Vec::new())?;

    assert_eq!(gz_lines(&first), gz_lines(&second));
    Ok(())
}

#[test]
fn test_config_file_with_cli_override() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("from-file.csv.gz");
    let config_path = temp_dir.path().join("load.yaml");
    std::fs::write(
        &config_path,
        format!(
            "backend: csv_file\nnum_batches: 4\nbatch_size: 100\ncsv_output_file: {}\nlog_dir: {}\nnum_actors: 10\n",
            output.display(),
            temp_dir.path().display()
        ),
    )?;

    let mut args = LoadDbArgs {
        config_file: Some(config_path),
        ..Default::default()
    };
    args.common.batch_size = Some(2);

    let mut out = Vec::new();
    run_load_db(args, &mut out)?;

    assert!(String::from_utf8(out)?.contains("Done! Added 8 rows!"));
    assert_eq!(gz_lines(&output).len(), 8);
    Ok(())
}

#[test]
fn test_invalid_batch_size_fails_before_timing() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("logs");
    std::fs::create_dir(&log_dir).unwrap();
    let mut args = csv_args(&temp_dir.path().join("x.csv.gz"), &log_dir);
    args.common.batch_size = Some(0);

    let mut out = Vec::new();
    let err = run_load_db(args, &mut out).unwrap_err();

    assert!(format!("{err:#}").contains("batch_size must be greater than 0"));
    assert!(out.is_empty());
    assert_eq!(std::fs::read_dir(&log_dir).unwrap().count(), 0);
}

#[test]
fn test_missing_output_dir_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output: PathBuf = temp_dir.path().join("missing").join("x.csv.gz");

    let mut out = Vec::new();
    let err = run_load_db(csv_args(&output, temp_dir.path()), &mut out).unwrap_err();

    assert!(format!("{err:#}").starts_with("IO error"));
    assert!(out.is_empty());
}
