//! Replays the historical dispatch data under the chosen strategies and writes
//! the run logs and a summary to the output directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dispatch_core::cost::CostFunctionKind;
use dispatch_core::matching::StrategyKind;
use dispatch_experiments::{
    export_run_logs, export_to_csv, export_to_json, export_to_parquet, find_cheapest_run_index,
    load_historical_data, run_parallel, ExperimentError, OutputFormat, RunConfig, RunSpec,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dispatch_replay",
    about = "Replay historical courier dispatch under alternative assignment strategies"
)]
struct Cli {
    /// Directory holding the three historical CSV tables
    #[arg(long, env = "DISPATCH_DATA_DIR")]
    data_dir: PathBuf,
    /// Directory for run logs and the summary
    #[arg(long, default_value = "logs")]
    out_dir: PathBuf,
    /// JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Strategy to run (repeatable)
    #[arg(long = "strategy")]
    strategies: Vec<StrategyKind>,
    /// Cost function to run (repeatable)
    #[arg(long = "cost-function")]
    cost_functions: Vec<CostFunctionKind>,
    /// Seed for the acceptance model and clustering
    #[arg(long)]
    seed: Option<u64>,
    /// Probability that a courier rejects a proposal
    #[arg(long)]
    rejection_probability: Option<f64>,
    /// Format of the per-run logs
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Worker threads for parallel runs
    #[arg(long)]
    threads: Option<usize>,
    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn run_config(&self) -> Result<RunConfig, ExperimentError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };
        if !self.strategies.is_empty() {
            config.strategies = self.strategies.clone();
        }
        if !self.cost_functions.is_empty() {
            config.cost_functions = self.cost_functions.clone();
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(p) = self.rejection_probability {
            config.simulation.rejection_probability = p;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<(), ExperimentError> {
    let config = cli.run_config()?;
    let (data, _stats) = load_historical_data(&cli.data_dir, &config.files)?;

    let specs = RunSpec::grid(&config.strategies, &config.cost_functions, config.simulation);
    let outcomes = run_parallel(&data, specs, config.threads, !cli.no_progress)?;

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let result = outcome?;
        let paths = export_run_logs(&result, &cli.out_dir, config.format)?;
        info!(
            run_id = %result.spec.run_id,
            accepted = result.totals.accepted,
            assignment_rate = result.totals.assignment_rate(),
            avg_cost = result.scorecard.platform_avg_cost_per_assignment,
            assignment_log = %paths.assignment_log.display(),
            "run exported"
        );
        results.push(result);
    }

    export_to_csv(&results, cli.out_dir.join("summary.csv"))?;
    export_to_json(&results, cli.out_dir.join("summary.json"))?;
    if config.format == OutputFormat::Parquet {
        export_to_parquet(&results, cli.out_dir.join("summary.parquet"))?;
    }
    if let Some(best) = find_cheapest_run_index(&results) {
        let best = &results[best];
        info!(
            run_id = %best.spec.run_id,
            avg_cost = best.totals.average_cost(),
            "cheapest run"
        );
    }
    info!(out_dir = %cli.out_dir.display(), runs = results.len(), "done");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "replay failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
