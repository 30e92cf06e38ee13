//! Writing run logs and run summaries to disk.
//!
//! Per-run logs (assignment log, cycle summary, courier timeline) go to CSV or
//! Parquet. The cross-run summary goes to CSV, JSON or Parquet.

use std::path::{Path, PathBuf};

use dispatch_core::telemetry_export::{
    write_assignment_log_parquet, write_courier_timeline_parquet, write_cycle_summary_parquet,
};

use crate::config::OutputFormat;
use crate::error::ExperimentError;
use crate::runner::RunResult;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/parquet.rs"]
mod parquet;
#[path = "export/writer_utils.rs"]
mod writer_utils;

pub use json::RunSummary;

/// Paths of the three logs written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogPaths {
    pub assignment_log: PathBuf,
    pub cycle_summary: PathBuf,
    pub courier_timeline: PathBuf,
}

impl RunLogPaths {
    pub fn for_run(out_dir: &Path, run_id: &str, format: OutputFormat) -> Self {
        let ext = format.extension();
        Self {
            assignment_log: out_dir.join(format!("{run_id}_assignment_log.{ext}")),
            cycle_summary: out_dir.join(format!("{run_id}_cycle_summary.{ext}")),
            courier_timeline: out_dir.join(format!("{run_id}_courier_timeline.{ext}")),
        }
    }
}

/// Write the three logs of one run into `out_dir`.
pub fn export_run_logs(
    result: &RunResult,
    out_dir: &Path,
    format: OutputFormat,
) -> Result<RunLogPaths, ExperimentError> {
    writer_utils::ensure_dir(out_dir)?;
    let paths = RunLogPaths::for_run(out_dir, &result.spec.run_id, format);
    let telemetry = &result.telemetry;

    match format {
        OutputFormat::Csv => {
            csv::write_records_csv(&paths.assignment_log, &telemetry.assignments)?;
            csv::write_records_csv(&paths.cycle_summary, &telemetry.cycles)?;
            csv::write_records_csv(&paths.courier_timeline, &telemetry.timeline)?;
        }
        OutputFormat::Parquet => {
            writer_utils::parquet_result(&paths.assignment_log, |path| {
                write_assignment_log_parquet(path, &telemetry.assignments)
            })?;
            writer_utils::parquet_result(&paths.cycle_summary, |path| {
                write_cycle_summary_parquet(path, &telemetry.cycles)
            })?;
            writer_utils::parquet_result(&paths.courier_timeline, |path| {
                write_courier_timeline_parquet(path, &telemetry.timeline)
            })?;
        }
    }

    Ok(paths)
}

/// Export one summary row per run to CSV.
pub fn export_to_csv(results: &[RunResult], path: impl AsRef<Path>) -> Result<(), ExperimentError> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_summary_csv_impl(results, file)
}

/// Export the per-run summaries (config echo, totals, scorecard) as a JSON array.
pub fn export_to_json(results: &[RunResult], path: impl AsRef<Path>) -> Result<(), ExperimentError> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export one summary row per run to Parquet.
pub fn export_to_parquet(
    results: &[RunResult],
    path: impl AsRef<Path>,
) -> Result<(), ExperimentError> {
    writer_utils::ensure_not_empty(results)?;
    let path = path.as_ref();
    let file = writer_utils::create_output_file(path)?;
    parquet::export_to_parquet_impl(results, file).map_err(|error| ExperimentError::Parquet {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

/// Index of the run with the lowest average accepted cost among runs that
/// accepted at least one assignment.
pub fn find_cheapest_run_index(results: &[RunResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.totals.accepted > 0)
        .min_by(|(_, a), (_, b)| {
            a.totals
                .average_cost()
                .total_cmp(&b.totals.average_cost())
        })
        .map(|(idx, _)| idx)
}
