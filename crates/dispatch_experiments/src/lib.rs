//! Batch replays of the historical dispatch data.
//!
//! This crate loads the historical CSV tables, replays them under one or more
//! (strategy, cost function) pairs in parallel, scores every run and writes the
//! per-run logs plus a cross-run summary.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use dispatch_core::config::SimulationConfig;
//! use dispatch_core::cost::CostFunctionKind;
//! use dispatch_core::matching::StrategyKind;
//! use dispatch_experiments::{load_historical_data, run_parallel, InputFiles, RunSpec};
//!
//! let (data, _stats) =
//!     load_historical_data(Path::new("data"), &InputFiles::default()).expect("load");
//! let specs = RunSpec::grid(
//!     &StrategyKind::ALL,
//!     &[CostFunctionKind::DistanceToPickup],
//!     SimulationConfig::default(),
//! );
//! let results = run_parallel(&data, specs, None, true).expect("thread pool");
//! ```
//!
//! # Architecture
//!
//! - [`input`]: CSV loaders for orders, courier snapshots and waiting orders
//! - [`config`]: JSON run configuration
//! - [`runner`]: single and parallel runs using rayon
//! - [`scorecard`]: platform / customer / courier metrics for a finished run
//! - [`export`]: run logs and summaries to CSV, JSON and Parquet

pub mod config;
pub mod error;
pub mod export;
pub mod input;
pub mod runner;
pub mod scorecard;

pub use config::{OutputFormat, RunConfig};
pub use error::ExperimentError;
pub use export::{
    export_run_logs, export_to_csv, export_to_json, export_to_parquet, find_cheapest_run_index,
    RunLogPaths,
};
pub use input::{load_historical_data, InputFiles, LoadStats};
pub use runner::{run_parallel, run_single, RunResult, RunSpec};
pub use scorecard::{compute_scorecard, Scorecard};
