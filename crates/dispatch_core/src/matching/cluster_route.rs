//! Cluster-then-route batching.
//!
//! Pickup locations are grouped with k-means, clusters are matched to couriers
//! by centroid distance with the same optimal solver as
//! [`super::OptimalBipartite`], and every order in a cluster goes to that
//! cluster's courier. One courier may therefore receive a bundle of orders.
//!
//! There is no in-cluster route sequencing: each order is costed as if it were
//! a direct assignment to the bundle's courier.

use crate::cost::CostFunction;
use crate::model::{Assignment, AvailableCourier, LocationLookup, OrderLocation, WaitingOrder};
use crate::spatial::Location;

use super::algorithm::AssignmentStrategy;
use super::hungarian::solve_min_cost;
use super::kmeans::kmeans;

#[derive(Debug)]
pub struct BatchClusterRoute {
    cost_function: Box<dyn CostFunction>,
    max_bundle_size: usize,
    max_iterations: usize,
    seed: u64,
}

impl BatchClusterRoute {
    pub const NAME: &'static str = "batch_cluster_route";

    pub fn new(
        cost_function: Box<dyn CostFunction>,
        max_bundle_size: usize,
        max_iterations: usize,
        seed: u64,
    ) -> Self {
        Self {
            cost_function,
            max_bundle_size: max_bundle_size.max(1),
            max_iterations: max_iterations.max(1),
            seed,
        }
    }

    /// `max(1, ceil(orders / max_bundle_size))`, clamped to the courier count.
    pub fn cluster_count(&self, orders: usize, couriers: usize) -> usize {
        orders
            .div_ceil(self.max_bundle_size)
            .max(1)
            .min(couriers.max(1))
    }
}

impl AssignmentStrategy for BatchClusterRoute {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn cost_function_name(&self) -> &'static str {
        self.cost_function.name()
    }

    fn allows_bundles(&self) -> bool {
        true
    }

    fn make_assignments(
        &self,
        waiting_orders: &[WaitingOrder],
        available_couriers: &[AvailableCourier],
        locations: LocationLookup<'_>,
    ) -> Vec<Assignment> {
        if waiting_orders.is_empty() || available_couriers.is_empty() {
            return Vec::new();
        }

        // Orders the lookup cannot place are left out of clustering entirely.
        let located: Vec<(&WaitingOrder, &OrderLocation)> = waiting_orders
            .iter()
            .filter_map(|order| locations.get(order.order_id).map(|loc| (order, loc)))
            .collect();
        if located.is_empty() {
            return Vec::new();
        }

        let k = self.cluster_count(located.len(), available_couriers.len());
        let pickups: Vec<Location> = located.iter().map(|(_, loc)| loc.pickup).collect();
        let clustering = kmeans(&pickups, k, self.max_iterations, self.seed);

        let centroid_costs: Vec<Vec<f64>> = clustering
            .centroids
            .iter()
            .map(|c| {
                available_couriers
                    .iter()
                    .map(|courier| courier.location.distance_to(c))
                    .collect()
            })
            .collect();

        let mut courier_for_cluster = vec![None; clustering.cluster_count()];
        for (cluster, courier_idx) in solve_min_cost(&centroid_costs) {
            courier_for_cluster[cluster] = Some(courier_idx);
        }

        located
            .iter()
            .zip(clustering.labels.iter())
            .filter_map(|((order, location), &cluster)| {
                let courier = &available_couriers[courier_for_cluster[cluster]?];
                let cost = self.cost_function.compute_cost(courier, order, location);
                cost.is_finite().then_some(Assignment {
                    order: **order,
                    courier: *courier,
                    cost,
                })
            })
            .collect()
    }
}
