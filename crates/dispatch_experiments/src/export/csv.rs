use std::path::Path;

use serde::Serialize;

use crate::error::ExperimentError;
use crate::runner::RunResult;

/// Serialize records with a header row taken from their field names.
pub(crate) fn write_records_csv<T: Serialize>(
    path: &Path,
    records: &[T],
) -> Result<(), ExperimentError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_summary_csv_impl(
    results: &[RunResult],
    file: std::fs::File,
) -> Result<(), ExperimentError> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "run_id",
        "strategy",
        "cost_function",
        "seed",
        "rejection_probability",
        "task_duration_secs",
        "dispatch_moments",
        "skipped_moments",
        "orders",
        "missing_orders",
        "proposed",
        "accepted",
        "rejected",
        "assignment_rate",
        "acceptance_rate",
        "agreement_rate",
        "platform_total_cost",
        "platform_avg_cost_per_assignment",
        "customer_median_wait_secs",
        "customer_p90_wait_secs",
        "courier_idle_hours",
        "courier_assignments_per_idle_hour",
    ])?;

    for result in results {
        let spec = &result.spec;
        let totals = &result.totals;
        let card = &result.scorecard;
        wtr.write_record([
            spec.run_id.clone(),
            spec.strategy.as_str().to_string(),
            spec.cost_function.as_str().to_string(),
            spec.config.seed.to_string(),
            spec.config.rejection_probability.to_string(),
            spec.config.task_duration_secs.to_string(),
            totals.dispatch_moments.to_string(),
            totals.skipped_moments.to_string(),
            totals.orders.to_string(),
            totals.missing_orders.to_string(),
            totals.proposed.to_string(),
            totals.accepted.to_string(),
            totals.rejected.to_string(),
            totals.assignment_rate().to_string(),
            totals.acceptance_rate().to_string(),
            totals.agreement_rate().to_string(),
            card.platform_total_cost.to_string(),
            card.platform_avg_cost_per_assignment.to_string(),
            card.customer_median_wait_secs
                .map(|v| v.to_string())
                .unwrap_or_default(),
            card.customer_p90_wait_secs
                .map(|v| v.to_string())
                .unwrap_or_default(),
            card.courier_idle_hours.to_string(),
            card.courier_assignments_per_idle_hour.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
