//! Test helpers for common test setup and utilities.
//!
//! Builders for synthetic orders, couriers and small historical datasets.

use crate::history::HistoricalData;
use crate::model::{
    AvailableCourier, CourierId, CourierSnapshot, Order, OrderId, OrderLocation, Timestamp,
    WaitingOrder,
};
use crate::spatial::Location;

/// Order picked up at `(lat, lng)` and delivered one unit north-east of it.
pub fn order_at(id: u64, lat: f64, lng: f64) -> Order {
    order_with_delivery(id, Location::new(lat, lng), Location::new(lat + 1.0, lng + 1.0))
}

pub fn order_with_delivery(id: u64, pickup: Location, delivery: Location) -> Order {
    Order {
        order_id: OrderId(id),
        location: OrderLocation { pickup, delivery },
        platform_order_time: 0,
        actual_courier_id: None,
    }
}

pub fn courier_at(id: u64, lat: f64, lng: f64) -> AvailableCourier {
    AvailableCourier {
        courier_id: CourierId(id),
        location: Location::new(lat, lng),
    }
}

pub fn waiting(id: u64, dispatch_time: Timestamp) -> WaitingOrder {
    WaitingOrder {
        order_id: OrderId(id),
        dispatch_time,
    }
}

pub fn snapshot(id: u64, lat: f64, lng: f64, has_in_flight_load: bool) -> CourierSnapshot {
    CourierSnapshot {
        courier_id: CourierId(id),
        location: Location::new(lat, lng),
        has_in_flight_load,
    }
}

/// One dispatch moment at `time` with every order waiting and every courier idle.
pub fn single_moment_history(
    time: Timestamp,
    orders: Vec<Order>,
    couriers: &[(u64, f64, f64)],
) -> HistoricalData {
    let waiting_orders: Vec<WaitingOrder> =
        orders.iter().map(|o| waiting(o.order_id.0, time)).collect();
    let mut builder = HistoricalData::builder();
    for order in orders {
        builder = builder.order(order);
    }
    for &(id, lat, lng) in couriers {
        builder = builder.courier_snapshot(time, snapshot(id, lat, lng, false));
    }
    for w in waiting_orders {
        builder = builder.waiting_order(w);
    }
    builder.build()
}
