use thiserror::Error;

use crate::model::{CourierId, Timestamp};

/// Fatal simulation errors.
///
/// Data gaps (an order missing from the lookup, an unknown historical courier)
/// are not errors: they are absorbed where they are detected and show up only
/// in the telemetry. Everything here aborts the run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("unknown courier {courier_id} in state mutation at dispatch moment {dispatch_time}")]
    UnknownCourier {
        courier_id: CourierId,
        dispatch_time: Timestamp,
    },

    #[error("negative dispatch moment {0}")]
    NegativeDispatchMoment(Timestamp),

    #[error("dispatch moment {next} does not follow {previous}")]
    NonMonotonicDispatchMoment { previous: Timestamp, next: Timestamp },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
