use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::runner::RunResult;

pub(crate) fn export_to_parquet_impl(
    results: &[RunResult],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch = build_record_batch(results)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn build_record_batch(results: &[RunResult]) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(parquet_schema());
    let arrays = build_arrays(results);

    RecordBatch::try_new(schema, arrays)
}

fn parquet_schema() -> Schema {
    Schema::new(vec![
        Field::new("run_id", DataType::Utf8, false),
        Field::new("strategy", DataType::Utf8, false),
        Field::new("cost_function", DataType::Utf8, false),
        Field::new("seed", DataType::UInt64, false),
        Field::new("rejection_probability", DataType::Float64, false),
        Field::new("dispatch_moments", DataType::UInt64, false),
        Field::new("skipped_moments", DataType::UInt64, false),
        Field::new("orders", DataType::UInt64, false),
        Field::new("proposed", DataType::UInt64, false),
        Field::new("accepted", DataType::UInt64, false),
        Field::new("rejected", DataType::UInt64, false),
        Field::new("assignment_rate", DataType::Float64, false),
        Field::new("acceptance_rate", DataType::Float64, false),
        Field::new("platform_total_cost", DataType::Float64, false),
        Field::new("platform_avg_cost_per_assignment", DataType::Float64, false),
        Field::new("customer_median_wait_secs", DataType::Float64, true),
        Field::new("courier_idle_hours", DataType::Float64, false),
        Field::new("courier_assignments_per_idle_hour", DataType::Float64, false),
    ])
}

fn u64_column(results: &[RunResult], f: impl Fn(&RunResult) -> usize) -> ArrayRef {
    Arc::new(UInt64Array::from(
        results.iter().map(|r| f(r) as u64).collect::<Vec<_>>(),
    ))
}

fn f64_column(results: &[RunResult], f: impl Fn(&RunResult) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(
        results.iter().map(f).collect::<Vec<_>>(),
    ))
}

fn build_arrays(results: &[RunResult]) -> Vec<ArrayRef> {
    vec![
        Arc::new(StringArray::from(
            results
                .iter()
                .map(|r| r.spec.run_id.as_str())
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            results
                .iter()
                .map(|r| r.spec.strategy.as_str())
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            results
                .iter()
                .map(|r| r.spec.cost_function.as_str())
                .collect::<Vec<_>>(),
        )),
        Arc::new(UInt64Array::from(
            results
                .iter()
                .map(|r| r.spec.config.seed)
                .collect::<Vec<_>>(),
        )),
        f64_column(results, |r| r.spec.config.rejection_probability),
        u64_column(results, |r| r.totals.dispatch_moments),
        u64_column(results, |r| r.totals.skipped_moments),
        u64_column(results, |r| r.totals.orders),
        u64_column(results, |r| r.totals.proposed),
        u64_column(results, |r| r.totals.accepted),
        u64_column(results, |r| r.totals.rejected),
        f64_column(results, |r| r.totals.assignment_rate()),
        f64_column(results, |r| r.totals.acceptance_rate()),
        f64_column(results, |r| r.scorecard.platform_total_cost),
        f64_column(results, |r| r.scorecard.platform_avg_cost_per_assignment),
        Arc::new(Float64Array::from(
            results
                .iter()
                .map(|r| r.scorecard.customer_median_wait_secs)
                .collect::<Vec<_>>(),
        )),
        f64_column(results, |r| r.scorecard.courier_idle_hours),
        f64_column(results, |r| r.scorecard.courier_assignments_per_idle_hour),
    ]
}
