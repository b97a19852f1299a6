//! Command runners.

use super::args::LoadDbArgs;
use super::config::build_load_config;
use anyhow::Context;
use load_framework::{LoadPipeline, RunReport};
use load_timing::{TimingLog, TimingSummary};
use std::io::Write;
use std::path::Path;

/// Run the `load-db` command, writing the end-of-run summary to `out`.
pub fn run_load_db<W: Write>(args: LoadDbArgs, out: &mut W) -> anyhow::Result<RunReport> {
    let config = build_load_config(args)?;

    // Rejected before a timing log file is created
    config.validate()?;

    tracing::info!(
        "Generating {} rows with seed {} ({} actors, {} courses, {} organizations)",
        config.expected_rows(),
        config.generator.seed,
        config.generator.num_actors,
        config.generator.num_courses,
        config.generator.num_organizations
    );

    let timing = TimingLog::for_log_dir(&config.log_dir);
    tracing::debug!("Timing destination: {}", timing.destination());

    let mut pipeline = LoadPipeline::new(config, timing);
    let report = pipeline.run()?;

    write_report(&report, out)?;
    Ok(report)
}

/// Write the report summary.
pub fn write_report<W: Write>(report: &RunReport, out: &mut W) -> anyhow::Result<()> {
    write!(out, "{}", report.summary()).context("Failed to write run summary")?;
    out.flush().context("Failed to write run summary")?;
    Ok(())
}

/// Run the `timing-summary` command for a finished timing log.
pub fn run_timing_summary<W: Write>(log_file: &Path, out: &mut W) -> anyhow::Result<()> {
    let summary = TimingSummary::from_file(log_file)
        .with_context(|| format!("Failed to read timing log {log_file:?}"))?;

    if summary.event_count() == 0 {
        anyhow::bail!("No timing events found in {log_file:?}");
    }

    writeln!(out, "{}", summary.to_table())?;
    if summary.skipped_lines > 0 {
        writeln!(out, "Skipped {} non-timing lines", summary.skipped_lines)?;
    }
    Ok(())
}
