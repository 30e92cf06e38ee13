//! Telemetry: the three run logs and the sinks that collect them.

use serde::Serialize;

use crate::courier_state::{CourierStatus, CourierTransition, TransitionReason};
use crate::model::{CourierId, OrderId, Timestamp};

/// One row per (dispatch moment, waiting order), proposed or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentLogRecord {
    pub dispatch_time: Timestamp,
    pub order_id: OrderId,
    pub proposed_courier_id: Option<CourierId>,
    pub proposed_cost: Option<f64>,
    pub is_proposed: bool,
    pub was_accepted: bool,
    pub actual_courier_id: Option<CourierId>,
    /// Proposed courier equals the historical courier, accepted or not.
    pub is_match_with_actual: bool,
    pub num_orders_in_batch: usize,
    pub num_couriers_in_pool: usize,
    /// Order was present in the location lookup.
    pub in_lookup: bool,
    pub order_pickup_lat: Option<f64>,
    pub order_pickup_lng: Option<f64>,
    pub proposed_courier_lat: Option<f64>,
    pub proposed_courier_lng: Option<f64>,
    pub actual_courier_lat: Option<f64>,
    pub actual_courier_lng: Option<f64>,
    pub platform_order_time: Option<Timestamp>,
    /// Dispatch time minus order creation time, accepted orders only.
    pub wait_for_assignment_secs: Option<i64>,
    pub cost_function: String,
}

/// One row per dispatch moment, including skipped ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSummaryRecord {
    pub dispatch_time: Timestamp,
    pub num_orders_in_batch: usize,
    pub num_available_couriers: usize,
    pub supply_demand_ratio: f64,
    pub num_proposed_assignments: usize,
    pub num_accepted_assignments: usize,
    pub num_rejections: usize,
    pub assignment_rate: f64,
    pub acceptance_rate: f64,
    pub total_cost_of_cycle: f64,
    pub avg_cost_per_assignment: f64,
    pub agreement_rate_with_actual: f64,
    pub num_missing_orders: usize,
    /// Busy share of the fleet before this moment's assignments.
    pub courier_utilization: f64,
    pub skipped: bool,
    pub cost_function: String,
}

impl CycleSummaryRecord {
    /// Fills in the ratio columns from the raw counts. Every ratio is 0 when
    /// its denominator is 0.
    #[allow(clippy::too_many_arguments)]
    pub fn from_counts(
        dispatch_time: Timestamp,
        num_orders: usize,
        num_couriers: usize,
        num_proposed: usize,
        num_accepted: usize,
        total_cost: f64,
        num_matches: usize,
        num_missing_orders: usize,
        courier_utilization: f64,
        skipped: bool,
        cost_function: &str,
    ) -> Self {
        Self {
            dispatch_time,
            num_orders_in_batch: num_orders,
            num_available_couriers: num_couriers,
            supply_demand_ratio: ratio(num_couriers as f64, num_orders),
            num_proposed_assignments: num_proposed,
            num_accepted_assignments: num_accepted,
            num_rejections: num_proposed - num_accepted,
            assignment_rate: ratio(num_accepted as f64, num_orders),
            acceptance_rate: ratio(num_accepted as f64, num_proposed),
            total_cost_of_cycle: total_cost,
            avg_cost_per_assignment: ratio(total_cost, num_accepted),
            agreement_rate_with_actual: ratio(num_matches as f64, num_orders),
            num_missing_orders,
            courier_utilization,
            skipped,
            cost_function: cost_function.to_string(),
        }
    }
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// One row per courier state transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourierTimelineRecord {
    pub timestamp: Timestamp,
    pub courier_id: CourierId,
    pub event_type: &'static str,
    pub new_state: CourierStatus,
    pub reason: TransitionReason,
}

impl From<CourierTransition> for CourierTimelineRecord {
    fn from(transition: CourierTransition) -> Self {
        Self {
            timestamp: transition.timestamp,
            courier_id: transition.courier_id,
            event_type: "state_change",
            new_state: transition.new_status,
            reason: transition.reason,
        }
    }
}

/// Destination for run logs. The driver calls it synchronously, in order.
pub trait TelemetrySink {
    fn record_assignment(&mut self, record: AssignmentLogRecord);
    fn record_cycle(&mut self, record: CycleSummaryRecord);
    fn record_transition(&mut self, record: CourierTimelineRecord);
}

/// Collects all three logs in memory.
#[derive(Debug, Clone, Default)]
pub struct SimTelemetry {
    pub assignments: Vec<AssignmentLogRecord>,
    pub cycles: Vec<CycleSummaryRecord>,
    pub timeline: Vec<CourierTimelineRecord>,
}

impl SimTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepted(&self) -> impl Iterator<Item = &AssignmentLogRecord> {
        self.assignments.iter().filter(|r| r.was_accepted)
    }

    pub fn last_dispatch_time(&self) -> Option<Timestamp> {
        self.cycles.last().map(|c| c.dispatch_time)
    }
}

impl TelemetrySink for SimTelemetry {
    fn record_assignment(&mut self, record: AssignmentLogRecord) {
        self.assignments.push(record);
    }

    fn record_cycle(&mut self, record: CycleSummaryRecord) {
        self.cycles.push(record);
    }

    fn record_transition(&mut self, record: CourierTimelineRecord) {
        self.timeline.push(record);
    }
}

/// Keeps only the cycle summaries. Used where per-order rows are not needed.
#[derive(Debug, Clone, Default)]
pub struct CycleOnlyTelemetry {
    pub cycles: Vec<CycleSummaryRecord>,
}

impl TelemetrySink for CycleOnlyTelemetry {
    fn record_assignment(&mut self, _record: AssignmentLogRecord) {}

    fn record_cycle(&mut self, record: CycleSummaryRecord) {
        self.cycles.push(record);
    }

    fn record_transition(&mut self, _record: CourierTimelineRecord) {}
}
