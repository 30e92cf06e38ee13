//! Single and parallel replays of the historical data.
//!
//! Each run owns its strategy, courier store, acceptance RNG and telemetry, so
//! runs share nothing but the read-only [`HistoricalData`].

use dispatch_core::config::SimulationConfig;
use dispatch_core::cost::CostFunctionKind;
use dispatch_core::history::HistoricalData;
use dispatch_core::matching::StrategyKind;
use dispatch_core::runner::{RunTotals, Simulation};
use dispatch_core::telemetry::SimTelemetry;
use dispatch_core::SimError;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ExperimentError;
use crate::scorecard::{compute_scorecard, Scorecard};

/// One (strategy, cost function, config) combination to replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSpec {
    pub run_id: String,
    pub strategy: StrategyKind,
    pub cost_function: CostFunctionKind,
    pub config: SimulationConfig,
}

impl RunSpec {
    pub fn new(
        strategy: StrategyKind,
        cost_function: CostFunctionKind,
        config: SimulationConfig,
    ) -> Self {
        Self {
            run_id: format!("{}__{}", strategy.as_str(), cost_function.as_str()),
            strategy,
            cost_function,
            config,
        }
    }

    /// Cross product of strategies and cost functions over one base config.
    pub fn grid(
        strategies: &[StrategyKind],
        cost_functions: &[CostFunctionKind],
        base_config: SimulationConfig,
    ) -> Vec<RunSpec> {
        strategies
            .iter()
            .flat_map(|&strategy| {
                cost_functions
                    .iter()
                    .map(move |&cost_function| RunSpec::new(strategy, cost_function, base_config))
            })
            .collect()
    }
}

/// Outcome of one replay.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub spec: RunSpec,
    pub totals: RunTotals,
    pub scorecard: Scorecard,
    pub telemetry: SimTelemetry,
}

/// Replays every dispatch moment under `spec`.
pub fn run_single(data: &HistoricalData, spec: &RunSpec) -> Result<RunResult, SimError> {
    let strategy = spec.strategy.build(spec.cost_function, &spec.config);
    let mut simulation = Simulation::new(spec.config, data, strategy)?;
    let mut telemetry = SimTelemetry::new();
    let totals = simulation.run(&mut telemetry)?;
    let scorecard = compute_scorecard(&telemetry);

    Ok(RunResult {
        spec: spec.clone(),
        totals,
        scorecard,
        telemetry,
    })
}

/// Run several specs in parallel.
///
/// Results come back in the same order as `specs`. A run that aborts on a
/// simulation error does not stop the others.
pub fn run_parallel(
    data: &HistoricalData,
    specs: Vec<RunSpec>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<Result<RunResult, SimError>>, ExperimentError> {
    let total = specs.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    info!(runs = total, threads = pool.current_num_threads(), "starting runs");
    let pb_clone = pb.clone();
    let results: Vec<Result<RunResult, SimError>> = pool.install(|| {
        specs
            .par_iter()
            .map(|spec| {
                let result = run_single(data, spec);
                if let Err(error) = &result {
                    warn!(run_id = %spec.run_id, %error, "run aborted");
                }
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.set_message(spec.run_id.clone());
                    progress_bar.inc(1);
                }
                result
            })
            .collect()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    Ok(results)
}
