//! Discrete-time replay of historical courier dispatch.
//!
//! Dispatch moments are processed one at a time in ascending timestamp order.
//! At each moment the [runner::Simulation] pulls the waiting orders, asks the
//! [courier_state::CourierStateStore] who is free, hands both to an
//! [matching::AssignmentStrategy], rolls the acceptance model for every
//! proposal and records the outcome through a [telemetry::TelemetrySink].

pub mod acceptance;
pub mod clock;
pub mod config;
pub mod cost;
pub mod courier_state;
pub mod error;
pub mod history;
pub mod matching;
pub mod model;
pub mod runner;
pub mod spatial;
pub mod telemetry;
pub mod telemetry_export;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use error::SimError;
