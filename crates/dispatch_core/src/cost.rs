//! Pluggable courier-order cost functions. Lower is better.

pub mod distance_to_pickup;
pub mod function;
pub mod pickup_and_delivery;

use serde::{Deserialize, Serialize};

pub use distance_to_pickup::DistanceToPickup;
pub use function::CostFunction;
pub use pickup_and_delivery::PickupAndDelivery;

/// Which cost function a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunctionKind {
    #[default]
    DistanceToPickup,
    PickupAndDelivery,
}

impl CostFunctionKind {
    pub const ALL: [CostFunctionKind; 2] = [
        CostFunctionKind::DistanceToPickup,
        CostFunctionKind::PickupAndDelivery,
    ];

    pub fn build(self) -> Box<dyn CostFunction> {
        match self {
            CostFunctionKind::DistanceToPickup => Box::new(DistanceToPickup),
            CostFunctionKind::PickupAndDelivery => Box::new(PickupAndDelivery),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CostFunctionKind::DistanceToPickup => DistanceToPickup::NAME,
            CostFunctionKind::PickupAndDelivery => PickupAndDelivery::NAME,
        }
    }
}

impl std::str::FromStr for CostFunctionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CostFunctionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown cost function `{s}`"))
    }
}
