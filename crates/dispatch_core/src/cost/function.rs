use crate::model::{AvailableCourier, OrderLocation, WaitingOrder};

/// Scores a courier-order pair.
///
/// Implementations must be pure: the same inputs always give the same cost.
/// Both the matching solvers and the tests rely on it.
pub trait CostFunction: Send + Sync + std::fmt::Debug {
    /// Stable identifier written into every log row.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Finite, non-negative cost for valid inputs.
    fn compute_cost(
        &self,
        courier: &AvailableCourier,
        order: &WaitingOrder,
        order_location: &OrderLocation,
    ) -> f64;
}
