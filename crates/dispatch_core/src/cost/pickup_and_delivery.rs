use crate::model::{AvailableCourier, OrderLocation, WaitingOrder};

use super::function::CostFunction;

/// Courier to pickup plus pickup to delivery, both Euclidean.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickupAndDelivery;

impl PickupAndDelivery {
    pub const NAME: &'static str = "pickup_and_delivery";
}

impl CostFunction for PickupAndDelivery {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Minimizes total travel: courier to pickup plus pickup to delivery"
    }

    fn compute_cost(
        &self,
        courier: &AvailableCourier,
        _order: &WaitingOrder,
        order_location: &OrderLocation,
    ) -> f64 {
        courier.location.distance_to(&order_location.pickup)
            + order_location.pickup.distance_to(&order_location.delivery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourierId, OrderId};
    use crate::spatial::Location;

    #[test]
    fn cost_adds_delivery_leg() {
        let courier = AvailableCourier {
            courier_id: CourierId(1),
            location: Location::new(0.0, 0.0),
        };
        let order = WaitingOrder {
            order_id: OrderId(2),
            dispatch_time: 0,
        };
        let location = OrderLocation {
            pickup: Location::new(3.0, 4.0),
            delivery: Location::new(3.0, 10.0),
        };
        assert_eq!(PickupAndDelivery.compute_cost(&courier, &order, &location), 11.0);
    }
}
