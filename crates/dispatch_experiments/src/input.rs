//! Loading the historical tables from CSV.
//!
//! Three files are read, each with a header row. Columns not listed on the row
//! types below are ignored.

use std::fs::File;
use std::path::Path;

use dispatch_core::history::HistoricalData;
use dispatch_core::model::{
    CourierId, CourierSnapshot, Order, OrderId, OrderLocation, Timestamp, WaitingOrder,
};
use dispatch_core::spatial::Location;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ExperimentError;

pub const DEFAULT_WAYBILL_FILE: &str = "all_waybill_info_meituan_0322.csv";
pub const DEFAULT_RIDER_SNAPSHOT_FILE: &str = "dispatch_rider_meituan.csv";
pub const DEFAULT_DISPATCH_WAYBILL_FILE: &str = "dispatch_waybill_meituan.csv";

/// File names of the three input tables, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub waybills: String,
    pub rider_snapshots: String,
    pub dispatch_waybills: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            waybills: DEFAULT_WAYBILL_FILE.to_string(),
            rider_snapshots: DEFAULT_RIDER_SNAPSHOT_FILE.to_string(),
            dispatch_waybills: DEFAULT_DISPATCH_WAYBILL_FILE.to_string(),
        }
    }
}

/// One historical waybill: an order with its pickup, delivery and the courier
/// that actually grabbed it.
#[derive(Debug, Clone, Deserialize)]
pub struct WaybillRow {
    pub order_id: u64,
    pub sender_lat: f64,
    pub sender_lng: f64,
    pub recipient_lat: f64,
    pub recipient_lng: f64,
    pub courier_id: Option<u64>,
    pub platform_order_time: Timestamp,
}

impl From<WaybillRow> for Order {
    fn from(row: WaybillRow) -> Self {
        Order {
            order_id: OrderId(row.order_id),
            location: OrderLocation {
                pickup: Location::new(row.sender_lat, row.sender_lng),
                delivery: Location::new(row.recipient_lat, row.recipient_lng),
            },
            platform_order_time: row.platform_order_time,
            actual_courier_id: row.courier_id.map(CourierId),
        }
    }
}

/// One courier row of a dispatch-moment snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct RiderSnapshotRow {
    pub dispatch_time: Timestamp,
    pub courier_id: u64,
    pub rider_lat: f64,
    pub rider_lng: f64,
    #[serde(default)]
    pub courier_waybills: Option<String>,
}

impl RiderSnapshotRow {
    pub fn snapshot(&self) -> CourierSnapshot {
        CourierSnapshot {
            courier_id: CourierId(self.courier_id),
            location: Location::new(self.rider_lat, self.rider_lng),
            has_in_flight_load: has_in_flight_load(self.courier_waybills.as_deref()),
        }
    }
}

/// One order waiting at a dispatch moment.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DispatchWaybillRow {
    pub dispatch_time: Timestamp,
    pub order_id: u64,
}

impl From<DispatchWaybillRow> for WaitingOrder {
    fn from(row: DispatchWaybillRow) -> Self {
        WaitingOrder {
            order_id: OrderId(row.order_id),
            dispatch_time: row.dispatch_time,
        }
    }
}

/// A waybill list cell marks an in-flight load when it is a non-empty list.
/// Blank cells and `[]` mean the courier is idle.
pub fn has_in_flight_load(courier_waybills: Option<&str>) -> bool {
    match courier_waybills.map(str::trim) {
        Some(cell) => !cell.is_empty() && cell != "[]" && cell.len() > 2,
        None => false,
    }
}

/// Row counts observed while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub waybill_rows: usize,
    pub duplicate_orders: usize,
    pub duplicate_waiting_orders: usize,
    pub rider_snapshot_rows: usize,
    pub dispatch_waybill_rows: usize,
    pub dispatch_moments: usize,
}

/// Reads the three tables from `data_dir` into [`HistoricalData`].
pub fn load_historical_data(
    data_dir: &Path,
    files: &InputFiles,
) -> Result<(HistoricalData, LoadStats), ExperimentError> {
    let mut builder = HistoricalData::builder();
    let mut stats = LoadStats::default();

    let waybills = data_dir.join(&files.waybills);
    stats.waybill_rows = read_rows::<WaybillRow, _>(&waybills, |row| {
        check_finite(
            &waybills,
            &[row.sender_lat, row.sender_lng, row.recipient_lat, row.recipient_lng],
            row.order_id,
        )?;
        builder.push_order(row.into());
        Ok(())
    })?;

    let riders = data_dir.join(&files.rider_snapshots);
    stats.rider_snapshot_rows = read_rows::<RiderSnapshotRow, _>(&riders, |row| {
        check_finite(&riders, &[row.rider_lat, row.rider_lng], row.courier_id)?;
        builder.push_courier_snapshot(row.dispatch_time, row.snapshot());
        Ok(())
    })?;

    let dispatch = data_dir.join(&files.dispatch_waybills);
    stats.dispatch_waybill_rows = read_rows::<DispatchWaybillRow, _>(&dispatch, |row| {
        builder.push_waiting_order(row.into());
        Ok(())
    })?;

    let data = builder.build();
    stats.duplicate_orders = data.duplicate_orders();
    stats.duplicate_waiting_orders = data.duplicate_waiting_orders();
    stats.dispatch_moments = data.dispatch_moments().len();
    if stats.duplicate_orders > 0 {
        warn!(
            duplicates = stats.duplicate_orders,
            "duplicate order ids in waybill table; keeping first row"
        );
    }
    if stats.duplicate_waiting_orders > 0 {
        warn!(
            duplicates = stats.duplicate_waiting_orders,
            "order listed twice at one dispatch moment; keeping first row"
        );
    }
    info!(
        orders = data.orders().len(),
        rider_snapshots = stats.rider_snapshot_rows,
        waiting_orders = stats.dispatch_waybill_rows,
        dispatch_moments = stats.dispatch_moments,
        "historical data loaded"
    );
    Ok((data, stats))
}

fn read_rows<T, F>(path: &Path, mut on_row: F) -> Result<usize, ExperimentError>
where
    T: for<'de> Deserialize<'de>,
    F: FnMut(T) -> Result<(), ExperimentError>,
{
    let file = File::open(path).map_err(|error| ExperimentError::InvalidInput {
        file: path.to_path_buf(),
        message: error.to_string(),
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let mut count = 0;
    for row in reader.deserialize::<T>() {
        on_row(row?)?;
        count += 1;
    }
    Ok(count)
}

fn check_finite(file: &Path, values: &[f64], id: u64) -> Result<(), ExperimentError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ExperimentError::InvalidInput {
            file: file.to_path_buf(),
            message: format!("non-finite coordinate on row for id {id}"),
        })
    }
}
