//! Mutable courier availability, owned by the simulation driver.
//!
//! Transitions are explicit: [`CourierStateStore::advance_time`] releases every
//! courier whose task has finished, and [`CourierStateStore::available_couriers`]
//! is a pure read. [`CourierStateStore::available_at`] combines the two.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::{AvailableCourier, CourierId, CourierSnapshot, Timestamp};
use crate::spatial::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourierStatus {
    Available,
    Busy,
}

impl CourierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourierStatus::Available => "AVAILABLE",
            CourierStatus::Busy => "BUSY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    Initialized,
    AssignedOrder,
    CompletedDelivery,
}

impl TransitionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionReason::Initialized => "initialized",
            TransitionReason::AssignedOrder => "assigned_order",
            TransitionReason::CompletedDelivery => "completed_delivery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourierState {
    pub courier_id: CourierId,
    pub status: CourierStatus,
    /// Only meaningful while [`CourierStatus::Busy`].
    pub becomes_available_at: Timestamp,
    pub location: Location,
}

impl CourierState {
    pub fn is_available(&self) -> bool {
        self.status == CourierStatus::Available
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourierTransition {
    pub timestamp: Timestamp,
    pub courier_id: CourierId,
    pub new_status: CourierStatus,
    pub reason: TransitionReason,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourierSummary {
    pub total: usize,
    pub available: usize,
    pub busy: usize,
    /// `busy / total`, 0 for an empty fleet.
    pub utilization: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CourierStateStore {
    couriers: BTreeMap<CourierId, CourierState>,
}

impl CourierStateStore {
    /// Builds the fleet from the first snapshot.
    ///
    /// Couriers already carrying a load are BUSY until
    /// `snapshot_time + initial_busy_offset_secs`; the true remaining time of
    /// those tasks is not observable. Repeated courier ids keep their first row.
    pub fn initialize(
        snapshot_time: Timestamp,
        snapshot: &[CourierSnapshot],
        initial_busy_offset_secs: i64,
    ) -> (Self, Vec<CourierTransition>) {
        let mut couriers = BTreeMap::new();
        for row in snapshot {
            let (status, becomes_available_at) = if row.has_in_flight_load {
                (CourierStatus::Busy, snapshot_time + initial_busy_offset_secs)
            } else {
                (CourierStatus::Available, snapshot_time)
            };
            couriers.entry(row.courier_id).or_insert(CourierState {
                courier_id: row.courier_id,
                status,
                becomes_available_at,
                location: row.location,
            });
        }
        let transitions = couriers
            .values()
            .map(|state| CourierTransition {
                timestamp: snapshot_time,
                courier_id: state.courier_id,
                new_status: state.status,
                reason: TransitionReason::Initialized,
            })
            .collect();
        (Self { couriers }, transitions)
    }

    /// Releases every BUSY courier whose task ends at or before `time`.
    ///
    /// Each release is stamped with the courier's `becomes_available_at`.
    pub fn advance_time(&mut self, time: Timestamp) -> Vec<CourierTransition> {
        let mut transitions = Vec::new();
        for state in self.couriers.values_mut() {
            if state.status == CourierStatus::Busy && state.becomes_available_at <= time {
                state.status = CourierStatus::Available;
                transitions.push(CourierTransition {
                    timestamp: state.becomes_available_at,
                    courier_id: state.courier_id,
                    new_status: CourierStatus::Available,
                    reason: TransitionReason::CompletedDelivery,
                });
            }
        }
        transitions
    }

    /// AVAILABLE couriers in ascending id order. Does not release anyone;
    /// call [`advance_time`](Self::advance_time) first.
    pub fn available_couriers(&self) -> Vec<AvailableCourier> {
        self.couriers
            .values()
            .filter(|state| state.is_available())
            .map(|state| AvailableCourier {
                courier_id: state.courier_id,
                location: state.location,
            })
            .collect()
    }

    /// Releases due couriers, then lists everyone available at `time`.
    pub fn available_at(
        &mut self,
        time: Timestamp,
    ) -> (Vec<AvailableCourier>, Vec<CourierTransition>) {
        let transitions = self.advance_time(time);
        (self.available_couriers(), transitions)
    }

    /// Marks the courier BUSY until `time + task_duration_secs` and moves it
    /// to the delivery point. A courier that is already BUSY (a bundle) has
    /// its release time and location overwritten.
    pub fn apply_assignment(
        &mut self,
        courier_id: CourierId,
        time: Timestamp,
        delivery_location: Location,
        task_duration_secs: i64,
    ) -> Result<CourierTransition, SimError> {
        let state = self
            .couriers
            .get_mut(&courier_id)
            .ok_or(SimError::UnknownCourier {
                courier_id,
                dispatch_time: time,
            })?;
        state.status = CourierStatus::Busy;
        state.becomes_available_at = time + task_duration_secs;
        state.location = delivery_location;
        Ok(CourierTransition {
            timestamp: time,
            courier_id,
            new_status: CourierStatus::Busy,
            reason: TransitionReason::AssignedOrder,
        })
    }

    /// Read-only fleet aggregate as of `time`.
    ///
    /// A busy courier whose task has finished by `time` counts as available,
    /// but its stored status only changes on [`advance_time`](Self::advance_time).
    pub fn summary(&self, time: Timestamp) -> CourierSummary {
        let total = self.couriers.len();
        let available = self
            .couriers
            .values()
            .filter(|s| s.is_available() || s.becomes_available_at <= time)
            .count();
        let busy = total - available;
        let utilization = if total == 0 {
            0.0
        } else {
            busy as f64 / total as f64
        };
        CourierSummary {
            total,
            available,
            busy,
            utilization,
        }
    }

    pub fn get(&self, courier_id: CourierId) -> Option<&CourierState> {
        self.couriers.get(&courier_id)
    }

    pub fn location_of(&self, courier_id: CourierId) -> Option<Location> {
        self.couriers.get(&courier_id).map(|state| state.location)
    }

    pub fn len(&self) -> usize {
        self.couriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couriers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourierState> {
        self.couriers.values()
    }
}
