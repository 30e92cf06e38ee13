//! Stakeholder scorecard: one headline number each for the platform, the
//! customer and the courier.

use std::collections::BTreeMap;

use dispatch_core::courier_state::CourierStatus;
use dispatch_core::model::{CourierId, Timestamp};
use dispatch_core::telemetry::{CourierTimelineRecord, SimTelemetry};
use serde::Serialize;

const SECS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    /// Sum of accepted assignment costs.
    pub platform_total_cost: f64,
    pub platform_avg_cost_per_assignment: f64,
    pub accepted_assignments: usize,
    /// Order creation to accepted assignment, over accepted orders only.
    pub customer_median_wait_secs: Option<f64>,
    pub customer_mean_wait_secs: Option<f64>,
    pub customer_p90_wait_secs: Option<f64>,
    /// Total time couriers spent AVAILABLE. A courier still AVAILABLE after
    /// its last transition is counted up to the last dispatch moment, so this
    /// is larger than a sum over closed intervals only.
    pub courier_idle_hours: f64,
    pub courier_assignments_per_idle_hour: f64,
}

/// Mean, median and p90 of `values`, or `None` when empty.
fn wait_stats(values: &[i64]) -> Option<(f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();

    let mean = sorted.iter().sum::<i64>() as f64 / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    } else {
        sorted[n / 2] as f64
    };
    let p90_idx = ((n - 1) as f64 * 0.9) as usize;
    let p90 = sorted[p90_idx.min(n - 1)] as f64;

    Some((mean, median, p90))
}

/// Seconds every courier spent AVAILABLE.
///
/// Each AVAILABLE state lasts until the courier's next transition; a courier
/// still AVAILABLE at the end is counted up to `run_end`.
pub fn idle_seconds(timeline: &[CourierTimelineRecord], run_end: Option<Timestamp>) -> i64 {
    let mut by_courier: BTreeMap<CourierId, Vec<&CourierTimelineRecord>> = BTreeMap::new();
    for record in timeline {
        by_courier.entry(record.courier_id).or_default().push(record);
    }

    let mut total = 0;
    for events in by_courier.values_mut() {
        events.sort_by_key(|r| r.timestamp);
        for pair in events.windows(2) {
            if pair[0].new_state == CourierStatus::Available {
                total += pair[1].timestamp - pair[0].timestamp;
            }
        }
        if let (Some(last), Some(end)) = (events.last(), run_end) {
            if last.new_state == CourierStatus::Available && end > last.timestamp {
                total += end - last.timestamp;
            }
        }
    }
    total
}

pub fn compute_scorecard(telemetry: &SimTelemetry) -> Scorecard {
    let platform_total_cost: f64 = telemetry.cycles.iter().map(|c| c.total_cost_of_cycle).sum();
    let accepted_assignments: usize = telemetry
        .cycles
        .iter()
        .map(|c| c.num_accepted_assignments)
        .sum();
    let platform_avg_cost_per_assignment = if accepted_assignments == 0 {
        0.0
    } else {
        platform_total_cost / accepted_assignments as f64
    };

    let waits: Vec<i64> = telemetry
        .accepted()
        .filter_map(|r| r.wait_for_assignment_secs)
        .collect();
    let stats = wait_stats(&waits);

    let idle_hours =
        idle_seconds(&telemetry.timeline, telemetry.last_dispatch_time()) as f64 / SECS_PER_HOUR;
    let per_idle_hour = if idle_hours > 0.0 {
        accepted_assignments as f64 / idle_hours
    } else {
        0.0
    };

    Scorecard {
        platform_total_cost,
        platform_avg_cost_per_assignment,
        accepted_assignments,
        customer_median_wait_secs: stats.map(|(_, median, _)| median),
        customer_mean_wait_secs: stats.map(|(mean, _, _)| mean),
        customer_p90_wait_secs: stats.map(|(_, _, p90)| p90),
        courier_idle_hours: idle_hours,
        courier_assignments_per_idle_hour: per_idle_hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::courier_state::{CourierTransition, TransitionReason};

    fn event(
        timestamp: Timestamp,
        courier: u64,
        new_status: CourierStatus,
        reason: TransitionReason,
    ) -> CourierTimelineRecord {
        CourierTransition {
            timestamp,
            courier_id: CourierId(courier),
            new_status,
            reason,
        }
        .into()
    }

    #[test]
    fn wait_stats_median_mean_p90() {
        assert_eq!(wait_stats(&[]), None);
        let (mean, median, p90) = wait_stats(&[40, 10, 30, 20]).expect("stats");
        assert_eq!(mean, 25.0);
        assert_eq!(median, 25.0);
        assert_eq!(p90, 30.0);
        let (_, median, _) = wait_stats(&[5, 1, 3]).expect("stats");
        assert_eq!(median, 3.0);
    }

    #[test]
    fn idle_time_sums_available_intervals_and_closes_open_ones() {
        use CourierStatus::{Available, Busy};
        use TransitionReason::{AssignedOrder, CompletedDelivery, Initialized};

        let timeline = vec![
            event(0, 1, Available, Initialized),
            event(0, 2, Busy, Initialized),
            event(100, 1, Busy, AssignedOrder),
            event(600, 2, Available, CompletedDelivery),
            event(700, 1, Available, CompletedDelivery),
        ];
        // Courier 1: 0..100 and 700..1000. Courier 2: 600..1000.
        assert_eq!(idle_seconds(&timeline, Some(1_000)), 100 + 300 + 400);
        assert_eq!(idle_seconds(&timeline, None), 100);
    }

    #[test]
    fn empty_run_scores_zero() {
        let card = compute_scorecard(&SimTelemetry::new());
        assert_eq!(card.accepted_assignments, 0);
        assert_eq!(card.platform_avg_cost_per_assignment, 0.0);
        assert_eq!(card.customer_median_wait_secs, None);
        assert_eq!(card.courier_assignments_per_idle_hour, 0.0);
    }
}
