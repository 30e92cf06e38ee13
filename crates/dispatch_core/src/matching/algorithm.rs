use crate::model::{Assignment, AvailableCourier, LocationLookup, WaitingOrder};

/// Trait for algorithms that pair waiting orders with available couriers.
///
/// Strategies are stateless across calls and only borrow their inputs. Courier
/// state changes happen in the driver after the call returns.
pub trait AssignmentStrategy: Send + Sync + std::fmt::Debug {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// Name of the cost function the strategy scores pairs with.
    fn cost_function_name(&self) -> &'static str;

    /// Propose assignments for one dispatch moment.
    ///
    /// Every order appears at most once in the result. Every courier appears at
    /// most once too, unless the strategy bundles orders (see
    /// [`AssignmentStrategy::allows_bundles`]).
    fn make_assignments(
        &self,
        waiting_orders: &[WaitingOrder],
        available_couriers: &[AvailableCourier],
        locations: LocationLookup<'_>,
    ) -> Vec<Assignment>;

    /// Whether one courier may receive several orders in the same moment.
    fn allows_bundles(&self) -> bool {
        false
    }
}
