//! Run configuration.
//!
//! The two calibrated constants (median task duration, empirical rejection
//! probability) are derived offline from the historical waybills and are
//! consumed here as plain inputs.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Median assign-to-delivered duration of the historical waybills (seconds).
pub const DEFAULT_TASK_DURATION_SECS: i64 = 1451;

/// Share of historical dispatch attempts the courier did not grab.
pub const DEFAULT_REJECTION_PROBABILITY: f64 = 0.1311;

/// Assumed remaining time for a courier already carrying a waybill at the first
/// dispatch moment. The true remaining duration is not observable in the data.
pub const DEFAULT_INITIAL_BUSY_OFFSET_SECS: i64 = 600;

pub const DEFAULT_MAX_BUNDLE_SIZE: usize = 3;

pub const DEFAULT_KMEANS_MAX_ITERATIONS: usize = 100;

pub const DEFAULT_SEED: u64 = 42;

/// Parameters shared by every strategy and the driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// How long an accepted assignment keeps a courier busy.
    pub task_duration_secs: i64,
    /// Probability (0.0–1.0) that a courier rejects a proposed assignment.
    pub rejection_probability: f64,
    /// Grace period for couriers that start the run with an in-flight load.
    pub initial_busy_offset_secs: i64,
    /// Target orders per courier for cluster-then-route batching.
    pub max_bundle_size: usize,
    /// Lloyd iteration cap for k-means clustering.
    pub kmeans_max_iterations: usize,
    /// Seed for the acceptance model and k-means seeding.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            task_duration_secs: DEFAULT_TASK_DURATION_SECS,
            rejection_probability: DEFAULT_REJECTION_PROBABILITY,
            initial_busy_offset_secs: DEFAULT_INITIAL_BUSY_OFFSET_SECS,
            max_bundle_size: DEFAULT_MAX_BUNDLE_SIZE,
            kmeans_max_iterations: DEFAULT_KMEANS_MAX_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rejection_probability(mut self, probability: f64) -> Self {
        self.rejection_probability = probability;
        self
    }

    pub fn with_task_duration_secs(mut self, secs: i64) -> Self {
        self.task_duration_secs = secs;
        self
    }

    pub fn with_max_bundle_size(mut self, size: usize) -> Self {
        self.max_bundle_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.rejection_probability) {
            return Err(SimError::InvalidConfig(format!(
                "rejection_probability must be within [0, 1], got {}",
                self.rejection_probability
            )));
        }
        if self.task_duration_secs < 0 {
            return Err(SimError::InvalidConfig(format!(
                "task_duration_secs must be non-negative, got {}",
                self.task_duration_secs
            )));
        }
        if self.initial_busy_offset_secs < 0 {
            return Err(SimError::InvalidConfig(format!(
                "initial_busy_offset_secs must be non-negative, got {}",
                self.initial_busy_offset_secs
            )));
        }
        if self.max_bundle_size == 0 {
            return Err(SimError::InvalidConfig(
                "max_bundle_size must be at least 1".to_string(),
            ));
        }
        if self.kmeans_max_iterations == 0 {
            return Err(SimError::InvalidConfig(
                "kmeans_max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
