use std::collections::HashMap;

use crate::courier_state::{CourierStatus, TransitionReason};
use crate::model::CourierId;
use crate::telemetry::CourierTimelineRecord;

/// Checks that every courier's timeline is well formed:
/// it starts with `initialized`, timestamps never go backwards,
/// `completed_delivery` only follows a BUSY state and always lands on AVAILABLE,
/// and `assigned_order` always lands on BUSY.
/// Returns an error message for the first violation, None if valid.
pub fn validate_courier_timeline(records: &[CourierTimelineRecord]) -> Option<String> {
    let mut last: HashMap<CourierId, &CourierTimelineRecord> = HashMap::new();

    for record in records {
        let previous = last.get(&record.courier_id).copied();
        match (previous, record.reason) {
            (None, TransitionReason::Initialized) => {}
            (None, reason) => {
                return Some(format!(
                    "Courier {}: first transition is {} instead of initialized",
                    record.courier_id,
                    reason.as_str()
                ));
            }
            (Some(_), TransitionReason::Initialized) => {
                return Some(format!(
                    "Courier {}: initialized twice",
                    record.courier_id
                ));
            }
            (Some(prev), reason) => {
                if record.timestamp < prev.timestamp {
                    return Some(format!(
                        "Courier {}: timestamp {} precedes previous transition at {}",
                        record.courier_id, record.timestamp, prev.timestamp
                    ));
                }
                if reason == TransitionReason::CompletedDelivery
                    && prev.new_state != CourierStatus::Busy
                {
                    return Some(format!(
                        "Courier {}: completed_delivery at {} while not busy",
                        record.courier_id, record.timestamp
                    ));
                }
            }
        }

        let expected = match record.reason {
            TransitionReason::AssignedOrder => Some(CourierStatus::Busy),
            TransitionReason::CompletedDelivery => Some(CourierStatus::Available),
            TransitionReason::Initialized => None,
        };
        if let Some(expected) = expected {
            if record.new_state != expected {
                return Some(format!(
                    "Courier {}: {} at {} lands on {} instead of {}",
                    record.courier_id,
                    record.reason.as_str(),
                    record.timestamp,
                    record.new_state.as_str(),
                    expected.as_str()
                ));
            }
        }

        last.insert(record.courier_id, record);
    }

    None
}
