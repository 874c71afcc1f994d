//! Passenger trip requests.

use mf_core::{DispatchConfig, LinkId, RequestId, SimTime};

/// Lifecycle of a passenger request.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestStatus {
    Unplanned,
    Planned,
    PickedUp,
    Performed,
}

/// A trip the vehicle's owner wants to make.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassengerRequest {
    pub id:              RequestId,
    pub from:            LinkId,
    pub to:              LinkId,
    /// Boarding never starts earlier than this.
    pub earliest_start:  SimTime,
    /// When the request reaches the dispatcher.
    pub submission_time: SimTime,
    pub status:          RequestStatus,
    /// When the owner will need the vehicle again after this trip, if known.
    /// Becomes the vehicle's next must-return obligation at pickup.
    pub return_deadline: Option<SimTime>,
}

impl PassengerRequest {
    /// An owner's pre-booked trip, submitted `config.submission_look_ahead`
    /// seconds before it starts.
    pub fn owner_trip(
        id:              RequestId,
        from:            LinkId,
        to:              LinkId,
        earliest_start:  SimTime,
        return_deadline: Option<SimTime>,
        config:          &DispatchConfig,
    ) -> Self {
        Self {
            id,
            from,
            to,
            earliest_start,
            submission_time: config.submission_time(earliest_start),
            status: RequestStatus::Unplanned,
            return_deadline,
        }
    }
}
