//! Historical input tables, partitioned by dispatch moment.

use std::collections::{BTreeMap, HashSet};

use crate::model::{CourierSnapshot, Order, OrderBook, OrderId, Timestamp, WaitingOrder};

/// Orders plus per-moment courier snapshots and waiting-order batches.
///
/// Dispatch moments are the distinct dispatch times of the waiting-order
/// table. Within a moment, waiting orders keep their input order and an order
/// id appears at most once.
#[derive(Debug, Clone, Default)]
pub struct HistoricalData {
    orders: OrderBook,
    courier_snapshots: BTreeMap<Timestamp, Vec<CourierSnapshot>>,
    waiting_orders: BTreeMap<Timestamp, Vec<WaitingOrder>>,
    duplicate_orders: usize,
    duplicate_waiting_orders: usize,
}

impl HistoricalData {
    pub fn builder() -> HistoricalDataBuilder {
        HistoricalDataBuilder::default()
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    /// Ascending distinct dispatch times.
    pub fn dispatch_moments(&self) -> Vec<Timestamp> {
        self.waiting_orders.keys().copied().collect()
    }

    pub fn waiting_orders_at(&self, time: Timestamp) -> &[WaitingOrder] {
        self.waiting_orders
            .get(&time)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn courier_snapshot_at(&self, time: Timestamp) -> &[CourierSnapshot] {
        self.courier_snapshots
            .get(&time)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Order rows dropped because their id was already present.
    pub fn duplicate_orders(&self) -> usize {
        self.duplicate_orders
    }

    /// Waiting-order rows dropped because the order was already waiting at
    /// the same dispatch moment.
    pub fn duplicate_waiting_orders(&self) -> usize {
        self.duplicate_waiting_orders
    }

    pub fn waiting_order_count(&self) -> usize {
        self.waiting_orders.values().map(Vec::len).sum()
    }

    pub fn courier_snapshot_count(&self) -> usize {
        self.courier_snapshots.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Default)]
pub struct HistoricalDataBuilder {
    data: HistoricalData,
    seen_waiting: HashSet<(Timestamp, OrderId)>,
}

impl HistoricalDataBuilder {
    pub fn order(mut self, order: Order) -> Self {
        self.push_order(order);
        self
    }

    pub fn courier_snapshot(mut self, time: Timestamp, snapshot: CourierSnapshot) -> Self {
        self.push_courier_snapshot(time, snapshot);
        self
    }

    pub fn waiting_order(mut self, order: WaitingOrder) -> Self {
        self.push_waiting_order(order);
        self
    }

    pub fn push_order(&mut self, order: Order) {
        if !self.data.orders.insert(order) {
            self.data.duplicate_orders += 1;
        }
    }

    pub fn push_courier_snapshot(&mut self, time: Timestamp, snapshot: CourierSnapshot) {
        self.data
            .courier_snapshots
            .entry(time)
            .or_default()
            .push(snapshot);
    }

    pub fn push_waiting_order(&mut self, order: WaitingOrder) {
        if !self.seen_waiting.insert((order.dispatch_time, order.order_id)) {
            self.data.duplicate_waiting_orders += 1;
            return;
        }
        self.data
            .waiting_orders
            .entry(order.dispatch_time)
            .or_default()
            .push(order);
    }

    pub fn build(self) -> HistoricalData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{order_at, snapshot, waiting};

    #[test]
    fn partitions_by_dispatch_time_in_order() {
        let data = HistoricalData::builder()
            .order(order_at(1, 0.0, 0.0))
            .order(order_at(1, 9.0, 9.0))
            .waiting_order(waiting(3, 200))
            .waiting_order(waiting(1, 100))
            .waiting_order(waiting(2, 200))
            .courier_snapshot(100, snapshot(7, 0.0, 0.0, false))
            .build();

        assert_eq!(data.dispatch_moments(), vec![100, 200]);
        let at_200: Vec<_> = data.waiting_orders_at(200).iter().map(|w| w.order_id).collect();
        assert_eq!(at_200, vec![OrderId(3), OrderId(2)]);
        assert_eq!(data.courier_snapshot_at(100).len(), 1);
        assert!(data.courier_snapshot_at(200).is_empty());
        assert!(data.waiting_orders_at(300).is_empty());
        assert_eq!(data.duplicate_orders(), 1);
        assert_eq!(data.waiting_order_count(), 3);
        assert_eq!(data.duplicate_waiting_orders(), 0);
    }

    #[test]
    fn repeated_waiting_rows_keep_first_per_moment() {
        let data = HistoricalData::builder()
            .waiting_order(waiting(1, 100))
            .waiting_order(waiting(2, 100))
            .waiting_order(waiting(1, 100))
            .waiting_order(waiting(1, 200))
            .build();

        let at_100: Vec<_> = data.waiting_orders_at(100).iter().map(|w| w.order_id).collect();
        assert_eq!(at_100, vec![OrderId(1), OrderId(2)]);
        assert_eq!(data.waiting_orders_at(200).len(), 1);
        assert_eq!(data.duplicate_waiting_orders(), 1);
        assert_eq!(data.waiting_order_count(), 3);
    }
}
