use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::Schema;

use crate::telemetry::CycleSummaryRecord;

use super::utils::{bool_field, f64_field, i64_field, u64_field, utf8_field, write_record_batch};

pub fn write_cycle_summary_parquet<P: AsRef<Path>>(
    path: P,
    records: &[CycleSummaryRecord],
) -> Result<(), Box<dyn Error>> {
    let n = records.len();
    let mut dispatch_time = Vec::with_capacity(n);
    let mut num_orders = Vec::with_capacity(n);
    let mut num_couriers = Vec::with_capacity(n);
    let mut supply_demand_ratio = Vec::with_capacity(n);
    let mut num_proposed = Vec::with_capacity(n);
    let mut num_accepted = Vec::with_capacity(n);
    let mut num_rejections = Vec::with_capacity(n);
    let mut assignment_rate = Vec::with_capacity(n);
    let mut acceptance_rate = Vec::with_capacity(n);
    let mut total_cost = Vec::with_capacity(n);
    let mut avg_cost = Vec::with_capacity(n);
    let mut agreement_rate = Vec::with_capacity(n);
    let mut num_missing = Vec::with_capacity(n);
    let mut utilization = Vec::with_capacity(n);
    let mut skipped = Vec::with_capacity(n);
    let mut cost_function = Vec::with_capacity(n);

    for record in records {
        dispatch_time.push(record.dispatch_time);
        num_orders.push(record.num_orders_in_batch as u64);
        num_couriers.push(record.num_available_couriers as u64);
        supply_demand_ratio.push(record.supply_demand_ratio);
        num_proposed.push(record.num_proposed_assignments as u64);
        num_accepted.push(record.num_accepted_assignments as u64);
        num_rejections.push(record.num_rejections as u64);
        assignment_rate.push(record.assignment_rate);
        acceptance_rate.push(record.acceptance_rate);
        total_cost.push(record.total_cost_of_cycle);
        avg_cost.push(record.avg_cost_per_assignment);
        agreement_rate.push(record.agreement_rate_with_actual);
        num_missing.push(record.num_missing_orders as u64);
        utilization.push(record.courier_utilization);
        skipped.push(record.skipped);
        cost_function.push(record.cost_function.as_str());
    }

    let schema = Schema::new(vec![
        i64_field("dispatch_time"),
        u64_field("num_orders_in_batch"),
        u64_field("num_available_couriers"),
        f64_field("supply_demand_ratio"),
        u64_field("num_proposed_assignments"),
        u64_field("num_accepted_assignments"),
        u64_field("num_rejections"),
        f64_field("assignment_rate"),
        f64_field("acceptance_rate"),
        f64_field("total_cost_of_cycle"),
        f64_field("avg_cost_per_assignment"),
        f64_field("agreement_rate_with_actual"),
        u64_field("num_missing_orders"),
        f64_field("courier_utilization"),
        bool_field("skipped"),
        utf8_field("cost_function"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(dispatch_time)),
        Arc::new(UInt64Array::from(num_orders)),
        Arc::new(UInt64Array::from(num_couriers)),
        Arc::new(Float64Array::from(supply_demand_ratio)),
        Arc::new(UInt64Array::from(num_proposed)),
        Arc::new(UInt64Array::from(num_accepted)),
        Arc::new(UInt64Array::from(num_rejections)),
        Arc::new(Float64Array::from(assignment_rate)),
        Arc::new(Float64Array::from(acceptance_rate)),
        Arc::new(Float64Array::from(total_cost)),
        Arc::new(Float64Array::from(avg_cost)),
        Arc::new(Float64Array::from(agreement_rate)),
        Arc::new(UInt64Array::from(num_missing)),
        Arc::new(Float64Array::from(utilization)),
        Arc::new(BooleanArray::from(skipped)),
        Arc::new(StringArray::from(cost_function)),
    ];

    write_record_batch(path, schema, arrays)
}
