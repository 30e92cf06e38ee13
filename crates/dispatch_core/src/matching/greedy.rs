use crate::cost::CostFunction;
use crate::model::{Assignment, AvailableCourier, LocationLookup, WaitingOrder};

use super::algorithm::AssignmentStrategy;

/// First-come-first-served greedy assignment.
///
/// Orders are taken in the order given (callers pass them in arrival order).
/// Each order gets the cheapest courier not already taken earlier in the same
/// pass. Ties go to the first courier in input order. Not globally optimal:
/// this trades total cost for never holding an order back.
#[derive(Debug)]
pub struct OnlineGreedy {
    cost_function: Box<dyn CostFunction>,
}

impl OnlineGreedy {
    pub const NAME: &'static str = "online_greedy";

    pub fn new(cost_function: Box<dyn CostFunction>) -> Self {
        Self { cost_function }
    }
}

impl AssignmentStrategy for OnlineGreedy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn cost_function_name(&self) -> &'static str {
        self.cost_function.name()
    }

    fn make_assignments(
        &self,
        waiting_orders: &[WaitingOrder],
        available_couriers: &[AvailableCourier],
        locations: LocationLookup<'_>,
    ) -> Vec<Assignment> {
        let mut results = Vec::new();
        let mut taken = vec![false; available_couriers.len()];
        let mut remaining = available_couriers.len();

        for order in waiting_orders {
            if remaining == 0 {
                break;
            }
            let Some(location) = locations.get(order.order_id) else {
                continue;
            };

            let mut best: Option<(usize, f64)> = None;
            for (idx, courier) in available_couriers.iter().enumerate() {
                if taken[idx] {
                    continue;
                }
                let cost = self.cost_function.compute_cost(courier, order, location);
                if !cost.is_finite() {
                    continue;
                }
                // Strict comparison keeps the first courier on ties.
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((idx, cost));
                }
            }

            if let Some((idx, cost)) = best {
                taken[idx] = true;
                remaining -= 1;
                results.push(Assignment {
                    order: *order,
                    courier: available_couriers[idx],
                    cost,
                });
            }
        }

        results
    }
}
