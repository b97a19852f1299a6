//! Gzipped CSV writer.

use csv::{Writer, WriterBuilder};
use flate2::write::GzEncoder;
use flate2::Compression;
use load_backend::{Backend, BackendError, CourseBlock, CourseOverview, UserProfile};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use xapi_generator::Statement;

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Column order of every row. No header row is written.
pub const CSV_COLUMNS: [&str; 7] = [
    "event_id",
    "verb",
    "actor_id",
    "org",
    "course_run_id",
    "emission_time",
    "event",
];

type GzCsvWriter = Writer<GzEncoder<BufWriter<File>>>;

/// Metrics from the writes done so far.
#[derive(Debug, Clone, Default)]
pub struct WriteMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Number of batches written.
    pub batches_written: u64,
    /// Time spent encoding and writing rows.
    pub write_duration: Duration,
}

impl WriteMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.write_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.write_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Backend writing statements to a local gzipped CSV file.
pub struct CsvFileBackend {
    path: PathBuf,
    writer: Option<GzCsvWriter>,
    metrics: WriteMetrics,
}

impl CsvFileBackend {
    /// Create (or truncate) the output file.
    ///
    /// Fails with an IO error if the parent directory does not exist or is
    /// not writable.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let encoder = GzEncoder::new(buf_writer, Compression::default());
        let writer = Writer::from_writer(encoder);

        info!("Writing gzipped CSV statements to '{}'", path.display());

        Ok(Self {
            path,
            writer: Some(writer),
            metrics: WriteMetrics::default(),
        })
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metrics about the writes so far.
    pub fn metrics(&self) -> &WriteMetrics {
        &self.metrics
    }

    /// Path of a companion file next to the statements, e.g.
    /// `xapi.csv.gz` becomes `xapi_courses.csv.gz` for `courses`.
    pub fn companion_path(&self, table: &str) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = match name.strip_suffix(".csv.gz") {
            Some(stem) => stem.to_string(),
            None => self
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        self.path.with_file_name(format!("{stem}_{table}.csv.gz"))
    }

    /// Whether `finalize` has already closed the file.
    pub fn is_finalized(&self) -> bool {
        self.writer.is_none()
    }

    fn ensure_open(&self) -> Result<(), BackendError> {
        if self.is_finalized() {
            return Err(BackendError::Io(std::io::Error::other(format!(
                "CSV backend for '{}' already finalized",
                self.path.display()
            ))));
        }
        Ok(())
    }

    /// Write `rows` as a whole gzipped companion file, without headers.
    fn write_companion<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<usize, BackendError> {
        self.ensure_open()?;
        let path = self.companion_path(table);
        let mut writer = companion_writer(&path)?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| BackendError::Csv(e.to_string()))?;
        }
        finish(writer)?;

        info!("Wrote {} {} rows to '{}'", rows.len(), table, path.display());
        Ok(rows.len())
    }

    fn close(&mut self) -> Result<(), BackendError> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };

        finish(writer)?;

        info!(
            "CSV output complete: {} rows in {} batches written to '{}' ({:.2} rows/sec)",
            self.metrics.rows_written,
            self.metrics.batches_written,
            self.path.display(),
            self.metrics.rows_per_second()
        );
        Ok(())
    }
}

impl Backend for CsvFileBackend {
    fn name(&self) -> &str {
        "csv_file"
    }

    fn write_batch(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            BackendError::Io(std::io::Error::other(format!(
                "CSV backend for '{}' already finalized",
                self.path.display()
            )))
        })?;

        let write_start = Instant::now();
        for record in records {
            writer
                .write_record(statement_to_csv_record(record))
                .map_err(|e| BackendError::Csv(e.to_string()))?;
        }

        self.metrics.rows_written += records.len() as u64;
        self.metrics.batches_written += 1;
        self.metrics.write_duration += write_start.elapsed();

        debug!(
            "Written {} rows to '{}'",
            self.metrics.rows_written,
            self.path.display()
        );

        Ok(records.len())
    }

    fn finalize(&mut self) -> Result<(), BackendError> {
        self.close()
    }

    fn insert_course_overviews(&mut self, rows: &[CourseOverview]) -> Result<usize, BackendError> {
        self.write_companion("courses", rows)
    }

    fn insert_course_blocks(&mut self, rows: &[CourseBlock]) -> Result<usize, BackendError> {
        self.write_companion("blocks", rows)
    }

    fn insert_user_profiles(&mut self, rows: &[UserProfile]) -> Result<usize, BackendError> {
        self.write_companion("user_profiles", rows)
    }

    /// Registrations go to their own file so the statements file holds
    /// exactly the batch rows.
    fn write_enrollments(&mut self, records: &[Statement]) -> Result<usize, BackendError> {
        self.ensure_open()?;
        let path = self.companion_path("enrollments");
        let mut writer = companion_writer(&path)?;
        for record in records {
            writer
                .write_record(statement_to_csv_record(record))
                .map_err(|e| BackendError::Csv(e.to_string()))?;
        }
        finish(writer)?;

        info!("Wrote {} enrollments to '{}'", records.len(), path.display());
        Ok(records.len())
    }
}

fn companion_writer(path: &Path) -> Result<GzCsvWriter, BackendError> {
    let file = File::create(path)?;
    let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
    Ok(WriterBuilder::new()
        .has_headers(false)
        .from_writer(GzEncoder::new(buf_writer, Compression::default())))
}

fn finish(writer: GzCsvWriter) -> Result<(), BackendError> {
    let encoder = writer
        .into_inner()
        .map_err(|e| BackendError::Io(std::io::Error::other(e.to_string())))?;
    let mut buf_writer = encoder.finish()?;
    buf_writer.flush()?;
    Ok(())
}

impl Drop for CsvFileBackend {
    fn drop(&mut self) {
        // Best effort: finish the gzip stream if finalize was never called
        if let Err(e) = self.close() {
            warn!(
                "Failed to close CSV output '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Convert a statement to a CSV record in [`CSV_COLUMNS`] order.
pub fn statement_to_csv_record(statement: &Statement) -> [String; 7] {
    [
        statement.event_id.to_string(),
        statement.verb.clone(),
        statement.actor_id.to_string(),
        statement.org.clone(),
        statement.course_run_id.clone(),
        statement.emission_time_str(),
        statement.event_json(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::{BufRead, BufReader};
    use tempfile::TempDir;
    use xapi_generator::{GeneratorConfig, StatementGenerator, StatementSource};

    fn generator() -> StatementGenerator {
        StatementGenerator::new(GeneratorConfig::default().with_seed(42)).unwrap()
    }

    fn read_lines(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        BufReader::new(GzDecoder::new(file))
            .lines()
            .map(|l| l.unwrap())
            .collect()
    }

    #[test]
    fn test_line_count_matches_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xapi.csv.gz");
        let mut generator = generator();

        let mut backend = CsvFileBackend::create(&path).unwrap();
        for _ in 0..3 {
            let batch = generator.next_batch(5).unwrap();
            assert_eq!(backend.write_batch(&batch).unwrap(), 5);
        }
        backend.finalize().unwrap();

        assert_eq!(read_lines(&path).len(), 15);
        assert_eq!(backend.metrics().rows_written, 15);
        assert_eq!(backend.metrics().batches_written, 3);
    }

    #[test]
    fn test_rows_parse_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xapi.csv.gz");
        let batch = generator().next_batch(4).unwrap();

        let mut backend = CsvFileBackend::create(&path).unwrap();
        backend.write_batch(&batch).unwrap();
        backend.finalize().unwrap();

        let file = File::open(&path).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(GzDecoder::new(file));
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 4);
        for (row, statement) in rows.iter().zip(&batch) {
            assert_eq!(row.len(), CSV_COLUMNS.len());
            assert_eq!(&row[0], statement.event_id.to_string());
            assert_eq!(&row[1], statement.verb);
            let event: serde_json::Value = serde_json::from_str(&row[6]).unwrap();
            assert_eq!(event, statement.event);
        }
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = CsvFileBackend::create(temp_dir.path().join("x.csv.gz")).unwrap();

        backend.finalize().unwrap();
        backend.finalize().unwrap();
        assert!(backend.is_finalized());
    }

    #[test]
    fn test_write_after_finalize_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = CsvFileBackend::create(temp_dir.path().join("x.csv.gz")).unwrap();
        backend.finalize().unwrap();

        let batch = generator().next_batch(1).unwrap();
        assert!(matches!(
            backend.write_batch(&batch),
            Err(BackendError::Io(_))
        ));
    }

    #[test]
    fn test_missing_parent_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("x.csv.gz");

        assert!(matches!(
            CsvFileBackend::create(path),
            Err(BackendError::Io(_))
        ));
    }

    #[test]
    fn test_drop_finishes_stream() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("x.csv.gz");
        {
            let mut backend = CsvFileBackend::create(&path).unwrap();
            backend.write_batch(&generator().next_batch(2).unwrap()).unwrap();
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_companion_paths() {
        let temp_dir = TempDir::new().unwrap();
        let backend = CsvFileBackend::create(temp_dir.path().join("xapi.csv.gz")).unwrap();
        assert_eq!(
            backend.companion_path("courses"),
            temp_dir.path().join("xapi_courses.csv.gz")
        );

        let plain = CsvFileBackend::create(temp_dir.path().join("out.csv")).unwrap();
        assert_eq!(
            plain.companion_path("blocks"),
            temp_dir.path().join("out_blocks.csv.gz")
        );
    }

    #[test]
    fn test_metadata_and_enrollments_in_companion_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xapi.csv.gz");
        let mut generator = generator();
        let metadata = generator.metadata();
        let enrollments = generator.enrollment_statements().unwrap();

        let mut backend = CsvFileBackend::create(&path).unwrap();
        assert_eq!(
            backend.insert_course_overviews(&metadata.courses).unwrap(),
            metadata.courses.len()
        );
        backend.insert_course_blocks(&metadata.blocks).unwrap();
        backend.insert_user_profiles(&metadata.profiles).unwrap();
        assert_eq!(
            backend.write_enrollments(&enrollments).unwrap(),
            enrollments.len()
        );
        backend.write_batch(&generator.next_batch(3).unwrap()).unwrap();
        backend.finalize().unwrap();

        assert_eq!(read_lines(&path).len(), 3);
        let courses = read_lines(&backend.companion_path("courses"));
        assert_eq!(courses.len(), metadata.courses.len());
        assert!(courses[0].starts_with(&format!(
            "{},{}",
            metadata.courses[0].org, metadata.courses[0].course_key
        )));
        assert_eq!(
            read_lines(&backend.companion_path("blocks")).len(),
            metadata.blocks.len()
        );
        assert_eq!(
            read_lines(&backend.companion_path("user_profiles")).len(),
            metadata.profiles.len()
        );
        let registrations = read_lines(&backend.companion_path("enrollments"));
        assert_eq!(registrations.len(), enrollments.len());
        assert!(registrations[0].contains("verbs/registered"));
    }

    #[test]
    fn test_companion_after_finalize_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = CsvFileBackend::create(temp_dir.path().join("x.csv.gz")).unwrap();
        backend.finalize().unwrap();

        let metadata = generator().metadata();
        assert!(matches!(
            backend.insert_course_overviews(&metadata.courses),
            Err(BackendError::Io(_))
        ));
        assert!(!backend.companion_path("courses").exists());
    }
}
