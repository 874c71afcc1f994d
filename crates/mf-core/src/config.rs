//! Dispatch policy configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature enabled) and passed to the dispatcher.  Every field has a
//! default, so a config file only needs to list what it overrides.

use crate::{CoreError, CoreResult, SimTime};

/// Policy switches and fixed durations used by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Re-route every freight leg against live travel times at the moment the
    /// tour is inserted, instead of keeping the plan-time leg durations.
    pub re_route_tours: bool,

    /// Let a vehicle that just finished a freight tour request the next one
    /// before driving back to its owner.
    pub allow_multiple_tours_in_a_row: bool,

    /// Seconds of set-up overhead when switching between passenger and
    /// freight duty.  Applied once at the start and once at the end of a tour.
    pub retool_duration: u64,

    /// Global acceptance cutoff: no freight tour is handed out after this time.
    pub freight_tour_latest_start: SimTime,

    /// Seconds before the pickup window opens at which an owner's trip is
    /// submitted to the dispatcher.
    pub submission_look_ahead: u64,

    /// Fixed boarding duration of a PICKUP task.
    pub pickup_duration: u64,

    /// Fixed alighting duration of a DROPOFF task.
    pub dropoff_duration: u64,

    /// Whether a trip's destination is known when it is booked.  If not, the
    /// occupied drive and dropoff are synthesized when the pickup completes.
    pub destination_known: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            re_route_tours:                false,
            allow_multiple_tours_in_a_row: true,
            retool_duration:               15 * 60,
            freight_tour_latest_start:     SimTime::hms(17, 0, 0),
            submission_look_ahead:         15 * 60,
            pickup_duration:               120,
            dropoff_duration:              60,
            destination_known:             true,
        }
    }
}

impl DispatchConfig {
    /// Reject configurations the dispatcher cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.retool_duration == 0 {
            return Err(CoreError::Config("retool_duration must be > 0".into()));
        }
        if self.freight_tour_latest_start < SimTime(self.retool_duration) {
            return Err(CoreError::Config(format!(
                "freight_tour_latest_start {} leaves no room for a {}s retool",
                self.freight_tour_latest_start, self.retool_duration
            )));
        }
        Ok(())
    }

    /// Time at which a trip whose pickup window opens at `earliest_start`
    /// is submitted to the dispatcher.
    #[inline]
    pub fn submission_time(&self, earliest_start: SimTime) -> SimTime {
        earliest_start
            .checked_sub_secs(self.submission_look_ahead)
            .unwrap_or(SimTime::ZERO)
    }
}
