pub mod algorithm;
pub mod cluster_route;
pub mod greedy;
pub mod hungarian;
pub mod kmeans;

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::cost::CostFunctionKind;

pub use algorithm::AssignmentStrategy;
pub use cluster_route::BatchClusterRoute;
pub use greedy::OnlineGreedy;
pub use hungarian::{solve_min_cost, OptimalBipartite, UNREACHABLE_COST};

/// Type of assignment strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    OptimalBipartite,
    BatchClusterRoute,
    OnlineGreedy,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::OptimalBipartite,
        StrategyKind::BatchClusterRoute,
        StrategyKind::OnlineGreedy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::OptimalBipartite => OptimalBipartite::NAME,
            StrategyKind::BatchClusterRoute => BatchClusterRoute::NAME,
            StrategyKind::OnlineGreedy => OnlineGreedy::NAME,
        }
    }

    /// Build the strategy with a fresh instance of the chosen cost function.
    pub fn build(
        self,
        cost_function: CostFunctionKind,
        config: &SimulationConfig,
    ) -> Box<dyn AssignmentStrategy> {
        let cost = cost_function.build();
        match self {
            StrategyKind::OptimalBipartite => Box::new(OptimalBipartite::new(cost)),
            StrategyKind::BatchClusterRoute => Box::new(BatchClusterRoute::new(
                cost,
                config.max_bundle_size,
                config.kmeans_max_iterations,
                config.seed,
            )),
            StrategyKind::OnlineGreedy => Box::new(OnlineGreedy::new(cost)),
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown strategy `{s}`"))
    }
}
