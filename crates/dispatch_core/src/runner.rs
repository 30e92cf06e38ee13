//! Simulation driver: replays dispatch moments in order.
//!
//! Each step pops the next moment from the [DispatchSchedule], releases couriers
//! whose tasks have finished, asks the strategy for proposals, rolls the
//! acceptance model for each proposal in the order returned, applies accepted
//! ones to the [CourierStateStore] and writes every outcome to the sink.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::acceptance::{AcceptanceModel, Decision};
use crate::clock::DispatchSchedule;
use crate::config::SimulationConfig;
use crate::courier_state::{CourierStateStore, CourierTransition};
use crate::error::SimError;
use crate::history::HistoricalData;
use crate::matching::AssignmentStrategy;
use crate::model::{Assignment, CourierId, OrderId, Timestamp};
use crate::spatial::Location;
use crate::telemetry::{AssignmentLogRecord, CycleSummaryRecord, TelemetrySink};

/// Run-level counters accumulated across every dispatch moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunTotals {
    pub dispatch_moments: usize,
    pub skipped_moments: usize,
    pub orders: usize,
    pub missing_orders: usize,
    pub proposed: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub agreements: usize,
    pub total_cost: f64,
}

impl RunTotals {
    /// Accepted assignments over all waiting orders.
    pub fn assignment_rate(&self) -> f64 {
        if self.orders == 0 {
            0.0
        } else {
            self.accepted as f64 / self.orders as f64
        }
    }

    /// Accepted over proposed.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }

    pub fn average_cost(&self) -> f64 {
        if self.accepted == 0 {
            0.0
        } else {
            self.total_cost / self.accepted as f64
        }
    }

    pub fn agreement_rate(&self) -> f64 {
        if self.orders == 0 {
            0.0
        } else {
            self.agreements as f64 / self.orders as f64
        }
    }

    fn absorb(&mut self, cycle: &CycleSummaryRecord, agreements: usize) {
        self.dispatch_moments += 1;
        if cycle.skipped {
            self.skipped_moments += 1;
        }
        self.orders += cycle.num_orders_in_batch;
        self.missing_orders += cycle.num_missing_orders;
        self.proposed += cycle.num_proposed_assignments;
        self.accepted += cycle.num_accepted_assignments;
        self.rejected += cycle.num_rejections;
        self.agreements += agreements;
        self.total_cost += cycle.total_cost_of_cycle;
    }
}

/// One replay of the historical data under a single strategy.
#[derive(Debug)]
pub struct Simulation<'a> {
    config: SimulationConfig,
    data: &'a HistoricalData,
    strategy: Box<dyn AssignmentStrategy>,
    schedule: DispatchSchedule,
    couriers: CourierStateStore,
    acceptance: AcceptanceModel,
    pending_transitions: Vec<CourierTransition>,
    totals: RunTotals,
}

impl<'a> Simulation<'a> {
    /// Validates the config, orders the dispatch moments and builds the fleet
    /// from the first moment's courier snapshot.
    pub fn new(
        config: SimulationConfig,
        data: &'a HistoricalData,
        strategy: Box<dyn AssignmentStrategy>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let schedule = DispatchSchedule::new(data.dispatch_moments())?;
        let acceptance = AcceptanceModel::new(config.rejection_probability, config.seed)?;

        let (couriers, pending_transitions) = match schedule.first() {
            Some(first) => {
                let snapshot = data.courier_snapshot_at(first);
                if snapshot.is_empty() {
                    warn!(
                        dispatch_time = first,
                        "no courier snapshot at first dispatch moment; fleet is empty"
                    );
                }
                CourierStateStore::initialize(first, snapshot, config.initial_busy_offset_secs)
            }
            None => (CourierStateStore::default(), Vec::new()),
        };

        Ok(Self {
            config,
            data,
            strategy,
            schedule,
            couriers,
            acceptance,
            pending_transitions,
            totals: RunTotals::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn strategy(&self) -> &dyn AssignmentStrategy {
        self.strategy.as_ref()
    }

    pub fn couriers(&self) -> &CourierStateStore {
        &self.couriers
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    pub fn remaining_moments(&self) -> usize {
        self.schedule.remaining()
    }

    pub fn total_moments(&self) -> usize {
        self.schedule.len()
    }

    /// Most recently processed dispatch moment.
    pub fn now(&self) -> Option<Timestamp> {
        self.schedule.now()
    }

    /// Processes exactly one dispatch moment.
    ///
    /// Returns `Ok(None)` once every moment has been processed.
    pub fn step(
        &mut self,
        sink: &mut dyn TelemetrySink,
    ) -> Result<Option<CycleSummaryRecord>, SimError> {
        for transition in self.pending_transitions.drain(..) {
            sink.record_transition(transition.into());
        }

        let Some(time) = self.schedule.pop_next() else {
            return Ok(None);
        };
        let data = self.data;
        let lookup = data.orders().locations();
        let waiting = data.waiting_orders_at(time);

        let (available, released) = self.couriers.available_at(time);
        for transition in released {
            sink.record_transition(transition.into());
        }
        let utilization = self.couriers.summary(time).utilization;

        let missing = waiting
            .iter()
            .filter(|order| !lookup.contains(order.order_id))
            .count();
        if missing > 0 {
            warn!(
                dispatch_time = time,
                missing, "waiting orders absent from order table"
            );
        }

        let skipped = waiting.is_empty() || available.is_empty();
        let proposals = if skipped {
            debug!(
                dispatch_time = time,
                orders = waiting.len(),
                couriers = available.len(),
                "skipping dispatch moment"
            );
            Vec::new()
        } else {
            self.strategy
                .make_assignments(waiting, &available, lookup)
        };

        let mut outcomes: HashMap<OrderId, (Assignment, Decision)> =
            HashMap::with_capacity(proposals.len());
        let mut accepted = 0;
        let mut total_cost = 0.0;
        for assignment in proposals.iter().copied() {
            let decision = self.acceptance.decide();
            if decision == Decision::Accepted {
                let delivery = lookup
                    .get(assignment.order.order_id)
                    .map(|location| location.delivery)
                    .unwrap_or(assignment.courier.location);
                let transition = self.couriers.apply_assignment(
                    assignment.courier.courier_id,
                    time,
                    delivery,
                    self.config.task_duration_secs,
                )?;
                sink.record_transition(transition.into());
                accepted += 1;
                total_cost += assignment.cost;
            }
            outcomes.insert(assignment.order.order_id, (assignment, decision));
        }

        let snapshot_locations: HashMap<CourierId, Location> = data
            .courier_snapshot_at(time)
            .iter()
            .map(|row| (row.courier_id, row.location))
            .collect();
        let cost_function = self.strategy.cost_function_name();

        let mut matches = 0;
        for order in waiting {
            let historical = data.orders().get(order.order_id);
            let actual_courier_id = historical.and_then(|o| o.actual_courier_id);
            let actual_location =
                actual_courier_id.and_then(|id| snapshot_locations.get(&id).copied());
            let outcome = outcomes.get(&order.order_id);
            let proposed = outcome.map(|(assignment, _)| assignment.courier);
            let was_accepted = matches!(outcome, Some((_, Decision::Accepted)));
            let is_match = match (proposed, actual_courier_id) {
                (Some(courier), Some(actual)) => courier.courier_id == actual,
                _ => false,
            };
            if is_match {
                matches += 1;
            }

            sink.record_assignment(AssignmentLogRecord {
                dispatch_time: time,
                order_id: order.order_id,
                proposed_courier_id: proposed.map(|c| c.courier_id),
                proposed_cost: outcome.map(|(assignment, _)| assignment.cost),
                is_proposed: outcome.is_some(),
                was_accepted,
                actual_courier_id,
                is_match_with_actual: is_match,
                num_orders_in_batch: waiting.len(),
                num_couriers_in_pool: available.len(),
                in_lookup: historical.is_some(),
                order_pickup_lat: historical.map(|o| o.location.pickup.lat),
                order_pickup_lng: historical.map(|o| o.location.pickup.lng),
                proposed_courier_lat: proposed.map(|c| c.location.lat),
                proposed_courier_lng: proposed.map(|c| c.location.lng),
                actual_courier_lat: actual_location.map(|l| l.lat),
                actual_courier_lng: actual_location.map(|l| l.lng),
                platform_order_time: historical.map(|o| o.platform_order_time),
                wait_for_assignment_secs: historical
                    .filter(|_| was_accepted)
                    .map(|o| time - o.platform_order_time),
                cost_function: cost_function.to_string(),
            });
        }

        let cycle = CycleSummaryRecord::from_counts(
            time,
            waiting.len(),
            available.len(),
            proposals.len(),
            accepted,
            total_cost,
            matches,
            missing,
            utilization,
            skipped,
            cost_function,
        );
        self.totals.absorb(&cycle, matches);
        debug!(
            dispatch_time = time,
            orders = cycle.num_orders_in_batch,
            couriers = cycle.num_available_couriers,
            proposed = cycle.num_proposed_assignments,
            accepted = cycle.num_accepted_assignments,
            rejected = cycle.num_rejections,
            "dispatch moment processed"
        );
        sink.record_cycle(cycle.clone());
        Ok(Some(cycle))
    }

    /// Steps through every remaining moment.
    pub fn run(&mut self, sink: &mut dyn TelemetrySink) -> Result<RunTotals, SimError> {
        self.run_with_hook(sink, |_| {})
    }

    /// Steps through every remaining moment and invokes `hook` after each one.
    pub fn run_with_hook<F>(
        &mut self,
        sink: &mut dyn TelemetrySink,
        mut hook: F,
    ) -> Result<RunTotals, SimError>
    where
        F: FnMut(&CycleSummaryRecord),
    {
        info!(
            strategy = self.strategy.name(),
            cost_function = self.strategy.cost_function_name(),
            moments = self.schedule.remaining(),
            couriers = self.couriers.len(),
            "simulation started"
        );
        while let Some(cycle) = self.step(sink)? {
            hook(&cycle);
        }
        info!(
            strategy = self.strategy.name(),
            moments = self.totals.dispatch_moments,
            skipped = self.totals.skipped_moments,
            orders = self.totals.orders,
            accepted = self.totals.accepted,
            rejected = self.totals.rejected,
            assignment_rate = self.totals.assignment_rate(),
            "simulation finished"
        );
        Ok(self.totals.clone())
    }
}
