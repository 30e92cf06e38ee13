use crate::model::{AvailableCourier, OrderLocation, WaitingOrder};

use super::function::CostFunction;

/// Euclidean distance from the courier to the restaurant.
///
/// Ignores the delivery leg, any detour for orders already carried, and time
/// windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceToPickup;

impl DistanceToPickup {
    pub const NAME: &'static str = "distance_to_pickup";
}

impl CostFunction for DistanceToPickup {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Minimizes Euclidean distance from courier to restaurant pickup location"
    }

    fn compute_cost(
        &self,
        courier: &AvailableCourier,
        _order: &WaitingOrder,
        order_location: &OrderLocation,
    ) -> f64 {
        courier.location.distance_to(&order_location.pickup)
    }
}
