use thiserror::Error;

use mf_core::{SimTime, TourId};

/// Problems with a freight tour plan or its source file.
///
/// A plan that fails conversion is never partially inserted: the caller
/// receives the error and the vehicle's schedule is untouched.
#[derive(Debug, Error)]
pub enum FreightError {
    #[error("tour {0} has no service stops")]
    MalformedPlan(TourId),

    #[error("tour {tour}: {reason} (at {at})")]
    InconsistentTiming {
        tour:   TourId,
        at:     SimTime,
        reason: &'static str,
    },

    #[error("tour file parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FreightResult<T> = Result<T, FreightError>;
