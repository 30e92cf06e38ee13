use dispatch_core::config::SimulationConfig;
use dispatch_core::cost::CostFunctionKind;
use dispatch_core::matching::StrategyKind;
use dispatch_core::runner::RunTotals;
use serde::Serialize;

use crate::error::ExperimentError;
use crate::runner::RunResult;
use crate::scorecard::Scorecard;

/// JSON view of a run: everything but the raw logs.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    pub run_id: &'a str,
    pub strategy: StrategyKind,
    pub cost_function: CostFunctionKind,
    pub config: &'a SimulationConfig,
    pub totals: &'a RunTotals,
    pub assignment_rate: f64,
    pub acceptance_rate: f64,
    pub agreement_rate: f64,
    pub scorecard: &'a Scorecard,
}

impl<'a> From<&'a RunResult> for RunSummary<'a> {
    fn from(result: &'a RunResult) -> Self {
        Self {
            run_id: &result.spec.run_id,
            strategy: result.spec.strategy,
            cost_function: result.spec.cost_function,
            config: &result.spec.config,
            totals: &result.totals,
            assignment_rate: result.totals.assignment_rate(),
            acceptance_rate: result.totals.acceptance_rate(),
            agreement_rate: result.totals.agreement_rate(),
            scorecard: &result.scorecard,
        }
    }
}

pub(crate) fn export_to_json_impl(
    results: &[RunResult],
    file: std::fs::File,
) -> Result<(), ExperimentError> {
    let summaries: Vec<RunSummary<'_>> = results.iter().map(RunSummary::from).collect();
    serde_json::to_writer_pretty(file, &summaries)?;
    Ok(())
}
