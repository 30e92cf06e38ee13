//! Stochastic courier accept/reject model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected,
}

/// Bernoulli trial with one global rejection probability.
///
/// The RNG is owned by the model and seeded at construction, so a run is
/// reproducible and isolated from any other run in the same process.
#[derive(Debug, Clone)]
pub struct AcceptanceModel {
    rejection_probability: f64,
    rng: StdRng,
}

impl AcceptanceModel {
    pub fn new(rejection_probability: f64, seed: u64) -> Result<Self, SimError> {
        if !(0.0..=1.0).contains(&rejection_probability) {
            return Err(SimError::InvalidConfig(format!(
                "rejection_probability must be within [0, 1], got {rejection_probability}"
            )));
        }
        Ok(Self {
            rejection_probability,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn rejection_probability(&self) -> f64 {
        self.rejection_probability
    }

    /// Rejected iff a uniform draw in [0, 1) falls below the rejection probability.
    pub fn decide(&mut self) -> Decision {
        if self.rng.gen::<f64>() < self.rejection_probability {
            Decision::Rejected
        } else {
            Decision::Accepted
        }
    }
}
