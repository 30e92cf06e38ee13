//! Hungarian (Kuhn-Munkres) minimum-cost bipartite assignment.
//!
//! Builds the full |orders| x |couriers| cost matrix with the configured cost
//! function and solves for the global minimum total cost, each order and each
//! courier used at most once.

use pathfinding::kuhn_munkres::{kuhn_munkres, Weights};

use crate::cost::CostFunction;
use crate::model::{Assignment, AvailableCourier, LocationLookup, WaitingOrder};

use super::algorithm::AssignmentStrategy;

/// Cost of a pair the solver must never return.
pub const UNREACHABLE_COST: f64 = f64::INFINITY;

/// Scale factor to convert f64 costs to i64 weights (milli grid units).
const SCALE: f64 = 1_000.0;

/// Largest weight magnitude a reachable pair can take.
const MAX_REACHABLE_WEIGHT: i64 = 10_000_000_000_000; // 1e13

/// Weight for unreachable pairs in a matrix with `rows` solver rows whose
/// reachable weights are at most `max_reachable` in magnitude.
///
/// It dominates any sum of `rows` reachable weights, and `rows` of it still
/// fit in an i64 when the solver totals an assignment.
fn unreachable_weight(max_reachable: i64, rows: usize) -> i64 {
    let n = rows as i64 + 1;
    let dominating = max_reachable.saturating_add(1).saturating_mul(n);
    let ceiling = i64::MAX / n.saturating_mul(4);
    debug_assert!(
        dominating <= ceiling,
        "batch of {rows} rows too large for i64 weights"
    );
    -dominating.min(ceiling)
}

/// Simple matrix type implementing pathfinding's Weights for i64.
struct I64Weights(Vec<Vec<i64>>);

impl Weights<i64> for I64Weights {
    fn rows(&self) -> usize {
        self.0.len()
    }

    fn columns(&self) -> usize {
        self.0.first().map_or(0, |r| r.len())
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.0[row][col]
    }

    fn neg(&self) -> Self {
        I64Weights(
            self.0
                .iter()
                .map(|r| r.iter().map(|&x| x.saturating_neg()).collect())
                .collect(),
        )
    }
}

fn is_reachable(cost: f64) -> bool {
    cost.is_finite() && cost >= 0.0
}

/// Negated, scaled and clamped weight for a reachable cost.
fn cost_to_weight(cost: f64) -> i64 {
    let w = (cost * SCALE).round();
    if w >= MAX_REACHABLE_WEIGHT as f64 {
        -MAX_REACHABLE_WEIGHT
    } else {
        -(w as i64)
    }
}

/// Solve a rectangular minimum-cost assignment.
///
/// `costs[row][col]` is the cost of pairing `row` with `col`; non-finite or
/// negative entries are unreachable. Returns `(row, col)` pairs sorted by row,
/// at most `min(rows, cols)` of them, never containing an unreachable pair.
pub fn solve_min_cost(costs: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let rows = costs.len();
    let cols = costs.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    // Kuhn-Munkres requires rows <= columns, so the smaller side goes on rows.
    let transposed = rows > cols;
    let (solver_rows, solver_cols) = if transposed { (cols, rows) } else { (rows, cols) };

    let mut matrix = vec![vec![None; solver_cols]; solver_rows];
    let mut max_reachable: Option<i64> = None;
    for (i, row) in costs.iter().enumerate() {
        debug_assert_eq!(row.len(), cols, "cost matrix must be rectangular");
        for (j, &cost) in row.iter().enumerate().take(cols) {
            if !is_reachable(cost) {
                continue;
            }
            let weight = cost_to_weight(cost);
            max_reachable = Some(max_reachable.map_or(-weight, |m| m.max(-weight)));
            if transposed {
                matrix[j][i] = Some(weight);
            } else {
                matrix[i][j] = Some(weight);
            }
        }
    }

    let Some(max_reachable) = max_reachable else {
        return Vec::new();
    };
    let sentinel = unreachable_weight(max_reachable, solver_rows);
    let matrix: Vec<Vec<i64>> = matrix
        .into_iter()
        .map(|row| row.into_iter().map(|w| w.unwrap_or(sentinel)).collect())
        .collect();

    let weights = I64Weights(matrix);
    let (_total, assignments) = kuhn_munkres(&weights);

    let mut pairs: Vec<(usize, usize)> = assignments
        .iter()
        .enumerate()
        .filter(|&(row, &col)| weights.at(row, col) > sentinel)
        .map(|(row, &col)| if transposed { (col, row) } else { (row, col) })
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Optimal bipartite matching: global minimum total cost per dispatch moment.
///
/// Orders missing from the location lookup get an unreachable row and are
/// never returned. O(n^3) in batch size; dispatch batches are tens of orders.
#[derive(Debug)]
pub struct OptimalBipartite {
    cost_function: Box<dyn CostFunction>,
}

impl OptimalBipartite {
    pub const NAME: &'static str = "optimal_bipartite";

    pub fn new(cost_function: Box<dyn CostFunction>) -> Self {
        Self { cost_function }
    }

    /// Full cost matrix, `UNREACHABLE_COST` for rows the lookup cannot place.
    pub fn cost_matrix(
        &self,
        waiting_orders: &[WaitingOrder],
        available_couriers: &[AvailableCourier],
        locations: LocationLookup<'_>,
    ) -> Vec<Vec<f64>> {
        waiting_orders
            .iter()
            .map(|order| match locations.get(order.order_id) {
                Some(location) => available_couriers
                    .iter()
                    .map(|courier| self.cost_function.compute_cost(courier, order, location))
                    .collect(),
                None => vec![UNREACHABLE_COST; available_couriers.len()],
            })
            .collect()
    }
}

impl AssignmentStrategy for OptimalBipartite {
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
        if waiting_orders.is_empty() || available_couriers.is_empty() {
            return Vec::new();
        }

        let costs = self.cost_matrix(waiting_orders, available_couriers, locations);
        solve_min_cost(&costs)
            .into_iter()
            .map(|(order_idx, courier_idx)| Assignment {
                order: waiting_orders[order_idx],
                courier: available_couriers[courier_idx],
                cost: costs[order_idx][courier_idx],
            })
            .collect()
    }
}
