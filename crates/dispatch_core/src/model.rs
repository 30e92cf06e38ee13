//! Orders, courier snapshots and assignments.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spatial::Location;

/// Unix timestamp in seconds.
pub type Timestamp = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourierId(pub u64);

impl fmt::Display for CourierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an order is picked up and where it is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderLocation {
    pub pickup: Location,
    pub delivery: Location,
}

/// One historical order. Read-only for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub location: OrderLocation,
    pub platform_order_time: Timestamp,
    /// Courier the real system assigned. Used for evaluation only.
    pub actual_courier_id: Option<CourierId>,
}

/// All historical orders keyed by id.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: HashMap<OrderId, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an order. Returns `false` and keeps the existing row when the id
    /// is already present.
    pub fn insert(&mut self, order: Order) -> bool {
        if self.orders.contains_key(&order.order_id) {
            return false;
        }
        self.orders.insert(order.order_id, order);
        true
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Location-only view handed to assignment strategies.
    pub fn locations(&self) -> LocationLookup<'_> {
        LocationLookup { orders: &self.orders }
    }
}

impl FromIterator<Order> for OrderBook {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        let mut book = OrderBook::new();
        for order in iter {
            book.insert(order);
        }
        book
    }
}

/// Read-only view of order locations.
///
/// Strategies only ever see this view, so the historical courier id stored on
/// [`Order`] cannot leak into an assignment decision.
#[derive(Debug, Clone, Copy)]
pub struct LocationLookup<'a> {
    orders: &'a HashMap<OrderId, Order>,
}

impl<'a> LocationLookup<'a> {
    pub fn get(&self, order_id: OrderId) -> Option<&'a OrderLocation> {
        self.orders.get(&order_id).map(|order| &order.location)
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }
}

/// An order waiting for a courier at a dispatch moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingOrder {
    pub order_id: OrderId,
    pub dispatch_time: Timestamp,
}

/// One courier row of a historical per-moment snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourierSnapshot {
    pub courier_id: CourierId,
    pub location: Location,
    /// The courier already carries at least one waybill at this moment.
    pub has_in_flight_load: bool,
}

/// A courier free to take work, as seen by assignment strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailableCourier {
    pub courier_id: CourierId,
    pub location: Location,
}

/// A proposed pairing for one dispatch moment. Logged, never stored as state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub order: WaitingOrder,
    pub courier: AvailableCourier,
    pub cost: f64,
}
