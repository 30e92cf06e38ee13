use std::path::PathBuf;

use dispatch_core::SimError;
use thiserror::Error;

/// Errors raised while loading data, running experiments or writing results.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet export failed for {path}: {message}")]
    Parquet { path: PathBuf, message: String },

    #[error("invalid input in {file}: {message}")]
    InvalidInput { file: PathBuf, message: String },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("no results to export")]
    NoResults,
}
