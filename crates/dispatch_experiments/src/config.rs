//! Run configuration files.
//!
//! A JSON document; every field is optional and falls back to its default.
//!
//! ```json
//! {
//!   "simulation": { "rejection_probability": 0.1311, "seed": 42 },
//!   "strategies": ["optimal_bipartite", "online_greedy"],
//!   "cost_functions": ["distance_to_pickup"],
//!   "files": { "waybills": "all_waybill_info_meituan_0322.csv" },
//!   "format": "csv"
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use clap::ValueEnum;
use dispatch_core::config::SimulationConfig;
use dispatch_core::cost::CostFunctionKind;
use dispatch_core::matching::StrategyKind;
use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;
use crate::input::InputFiles;

/// File format for the per-run logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub simulation: SimulationConfig,
    pub strategies: Vec<StrategyKind>,
    pub cost_functions: Vec<CostFunctionKind>,
    pub files: InputFiles,
    pub format: OutputFormat,
    pub threads: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            strategies: vec![StrategyKind::default()],
            cost_functions: vec![CostFunctionKind::default()],
            files: InputFiles::default(),
            format: OutputFormat::default(),
            threads: None,
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ExperimentError> {
        let file = File::open(path).map_err(|error| ExperimentError::InvalidInput {
            file: path.to_path_buf(),
            message: error.to_string(),
        })?;
        let config: RunConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        self.simulation.validate()?;
        if self.threads == Some(0) {
            return Err(dispatch_core::SimError::InvalidConfig(
                "threads must be at least 1".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: RunConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config: RunConfig = serde_json::from_str(
            r#"{
                "simulation": { "rejection_probability": 0.0, "seed": 7 },
                "strategies": ["batch_cluster_route", "online_greedy"],
                "cost_functions": ["pickup_and_delivery"],
                "files": { "waybills": "orders.csv" },
                "format": "parquet"
            }"#,
        )
        .expect("parse");
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.rejection_probability, 0.0);
        assert_eq!(config.simulation.task_duration_secs, 1451);
        assert_eq!(
            config.strategies,
            vec![StrategyKind::BatchClusterRoute, StrategyKind::OnlineGreedy]
        );
        assert_eq!(config.cost_functions, vec![CostFunctionKind::PickupAndDelivery]);
        assert_eq!(config.files.waybills, "orders.csv");
        assert_eq!(config.files.rider_snapshots, "dispatch_rider_meituan.csv");
        assert_eq!(config.format, OutputFormat::Parquet);
    }

    #[test]
    fn invalid_probability_fails_validation() {
        let mut config = RunConfig::default();
        config.simulation.rejection_probability = 1.5;
        assert!(config.validate().is_err());
    }
}
