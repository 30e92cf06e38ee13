use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::Schema;

use crate::telemetry::CourierTimelineRecord;

use super::utils::{i64_field, u64_field, utf8_field, write_record_batch};

pub fn write_courier_timeline_parquet<P: AsRef<Path>>(
    path: P,
    records: &[CourierTimelineRecord],
) -> Result<(), Box<dyn Error>> {
    let mut timestamp = Vec::with_capacity(records.len());
    let mut courier_id = Vec::with_capacity(records.len());
    let mut event_type = Vec::with_capacity(records.len());
    let mut new_state = Vec::with_capacity(records.len());
    let mut reason = Vec::with_capacity(records.len());

    for record in records {
        timestamp.push(record.timestamp);
        courier_id.push(record.courier_id.0);
        event_type.push(record.event_type);
        new_state.push(record.new_state.as_str());
        reason.push(record.reason.as_str());
    }

    let schema = Schema::new(vec![
        i64_field("timestamp"),
        u64_field("courier_id"),
        utf8_field("event_type"),
        utf8_field("new_state"),
        utf8_field("reason"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(timestamp)),
        Arc::new(UInt64Array::from(courier_id)),
        Arc::new(StringArray::from(event_type)),
        Arc::new(StringArray::from(new_state)),
        Arc::new(StringArray::from(reason)),
    ];

    write_record_batch(path, schema, arrays)
}
