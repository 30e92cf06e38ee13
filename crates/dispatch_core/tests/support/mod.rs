#![allow(dead_code)]

use dispatch_core::model::{AvailableCourier, Order, OrderBook, WaitingOrder};
use dispatch_core::spatial::Location;
use dispatch_core::test_helpers::{courier_at, order_at, waiting};
use proptest::prelude::*;

/// A synthetic dispatch batch: orders with pickups, their waiting rows and a courier pool.
#[derive(Debug, Clone)]
pub struct Batch {
    pub book: OrderBook,
    pub waiting: Vec<WaitingOrder>,
    pub couriers: Vec<AvailableCourier>,
}

impl Batch {
    pub fn new(pickups: &[(f64, f64)], couriers: &[(f64, f64)]) -> Self {
        let orders: Vec<Order> = pickups
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng))| order_at(i as u64 + 1, lat, lng))
            .collect();
        let waiting = orders
            .iter()
            .map(|order| waiting(order.order_id.0, 0))
            .collect();
        let couriers = couriers
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng))| courier_at(i as u64 + 100, lat, lng))
            .collect();
        Self {
            book: orders.into_iter().collect(),
            waiting,
            couriers,
        }
    }
}

pub fn point() -> impl Strategy<Value = (f64, f64)> {
    (0.0..100.0f64, 0.0..100.0f64)
}

/// Batches of up to `max` orders and `max` couriers.
pub fn batch(max: usize) -> impl Strategy<Value = Batch> {
    (
        prop::collection::vec(point(), 0..=max),
        prop::collection::vec(point(), 0..=max),
    )
        .prop_map(|(orders, couriers)| Batch::new(&orders, &couriers))
}

/// Minimum total cost over every one-to-one pairing that covers the smaller side.
pub fn brute_force_min_cost(costs: &[Vec<f64>]) -> f64 {
    let rows = costs.len();
    let cols = costs.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return 0.0;
    }
    if rows > cols {
        let transposed: Vec<Vec<f64>> = (0..cols)
            .map(|c| (0..rows).map(|r| costs[r][c]).collect())
            .collect();
        return brute_force_min_cost(&transposed);
    }
    let mut used = vec![false; cols];
    search(costs, 0, &mut used)
}

fn search(costs: &[Vec<f64>], row: usize, used: &mut [bool]) -> f64 {
    if row == costs.len() {
        return 0.0;
    }
    let mut best = f64::INFINITY;
    for col in 0..used.len() {
        if used[col] {
            continue;
        }
        used[col] = true;
        let total = costs[row][col] + search(costs, row + 1, used);
        used[col] = false;
        if total < best {
            best = total;
        }
    }
    best
}

pub fn distance(a: Location, b: Location) -> f64 {
    a.distance_to(&b)
}
