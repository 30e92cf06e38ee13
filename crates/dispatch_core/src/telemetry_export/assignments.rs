use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::Schema;

use crate::telemetry::AssignmentLogRecord;

use super::utils::{
    bool_field, i64_field, nullable_f64_field, nullable_i64_field, nullable_u64_field,
    u64_field, utf8_field, write_record_batch,
};

pub fn write_assignment_log_parquet<P: AsRef<Path>>(
    path: P,
    records: &[AssignmentLogRecord],
) -> Result<(), Box<dyn Error>> {
    let n = records.len();
    let mut dispatch_time = Vec::with_capacity(n);
    let mut order_id = Vec::with_capacity(n);
    let mut proposed_courier_id = Vec::with_capacity(n);
    let mut proposed_cost = Vec::with_capacity(n);
    let mut is_proposed = Vec::with_capacity(n);
    let mut was_accepted = Vec::with_capacity(n);
    let mut actual_courier_id = Vec::with_capacity(n);
    let mut is_match = Vec::with_capacity(n);
    let mut num_orders = Vec::with_capacity(n);
    let mut num_couriers = Vec::with_capacity(n);
    let mut in_lookup = Vec::with_capacity(n);
    let mut pickup_lat = Vec::with_capacity(n);
    let mut pickup_lng = Vec::with_capacity(n);
    let mut proposed_lat = Vec::with_capacity(n);
    let mut proposed_lng = Vec::with_capacity(n);
    let mut actual_lat = Vec::with_capacity(n);
    let mut actual_lng = Vec::with_capacity(n);
    let mut platform_order_time = Vec::with_capacity(n);
    let mut wait_secs = Vec::with_capacity(n);
    let mut cost_function = Vec::with_capacity(n);

    for record in records {
        dispatch_time.push(record.dispatch_time);
        order_id.push(record.order_id.0);
        proposed_courier_id.push(record.proposed_courier_id.map(|id| id.0));
        proposed_cost.push(record.proposed_cost);
        is_proposed.push(record.is_proposed);
        was_accepted.push(record.was_accepted);
        actual_courier_id.push(record.actual_courier_id.map(|id| id.0));
        is_match.push(record.is_match_with_actual);
        num_orders.push(record.num_orders_in_batch as u64);
        num_couriers.push(record.num_couriers_in_pool as u64);
        in_lookup.push(record.in_lookup);
        pickup_lat.push(record.order_pickup_lat);
        pickup_lng.push(record.order_pickup_lng);
        proposed_lat.push(record.proposed_courier_lat);
        proposed_lng.push(record.proposed_courier_lng);
        actual_lat.push(record.actual_courier_lat);
        actual_lng.push(record.actual_courier_lng);
        platform_order_time.push(record.platform_order_time);
        wait_secs.push(record.wait_for_assignment_secs);
        cost_function.push(record.cost_function.as_str());
    }

    let schema = Schema::new(vec![
        i64_field("dispatch_time"),
        u64_field("order_id"),
        nullable_u64_field("proposed_courier_id"),
        nullable_f64_field("proposed_cost"),
        bool_field("is_proposed"),
        bool_field("was_accepted"),
        nullable_u64_field("actual_courier_id"),
        bool_field("is_match_with_actual"),
        u64_field("num_orders_in_batch"),
        u64_field("num_couriers_in_pool"),
        bool_field("in_lookup"),
        nullable_f64_field("order_pickup_lat"),
        nullable_f64_field("order_pickup_lng"),
        nullable_f64_field("proposed_courier_lat"),
        nullable_f64_field("proposed_courier_lng"),
        nullable_f64_field("actual_courier_lat"),
        nullable_f64_field("actual_courier_lng"),
        nullable_i64_field("platform_order_time"),
        nullable_i64_field("wait_for_assignment_secs"),
        utf8_field("cost_function"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(dispatch_time)),
        Arc::new(UInt64Array::from(order_id)),
        Arc::new(UInt64Array::from(proposed_courier_id)),
        Arc::new(Float64Array::from(proposed_cost)),
        Arc::new(BooleanArray::from(is_proposed)),
        Arc::new(BooleanArray::from(was_accepted)),
        Arc::new(UInt64Array::from(actual_courier_id)),
        Arc::new(BooleanArray::from(is_match)),
        Arc::new(UInt64Array::from(num_orders)),
        Arc::new(UInt64Array::from(num_couriers)),
        Arc::new(BooleanArray::from(in_lookup)),
        Arc::new(Float64Array::from(pickup_lat)),
        Arc::new(Float64Array::from(pickup_lng)),
        Arc::new(Float64Array::from(proposed_lat)),
        Arc::new(Float64Array::from(proposed_lng)),
        Arc::new(Float64Array::from(actual_lat)),
        Arc::new(Float64Array::from(actual_lng)),
        Arc::new(Int64Array::from(platform_order_time)),
        Arc::new(Int64Array::from(wait_secs)),
        Arc::new(StringArray::from(cost_function)),
    ];

    write_record_batch(path, schema, arrays)
}
