//! Per-vehicle dispatch state.

use mf_core::{LinkId, SimTime, VehicleId};
use mf_schedule::{ObligationStack, Schedule};

use crate::PassengerRequest;

/// Everything the dispatcher knows about one vehicle.
///
/// The dispatcher holds no per-vehicle state of its own; each call receives
/// the vehicle's state by `&mut`.
#[derive(Clone, Debug)]
pub struct VehicleState {
    pub id:              VehicleId,
    pub schedule:        Schedule,
    pub obligations:     ObligationStack,
    pub freight_capable: bool,
    /// End of the vehicle's service day; the closing STAY never ends earlier.
    pub service_end:     SimTime,
    /// The owner's booked trip that has not been picked up yet.
    pub pending_request: Option<PassengerRequest>,
    /// The trip whose passenger is on board, between PICKUP and DROPOFF.
    pub on_board:        Option<PassengerRequest>,
    /// Trips dropped off so far, in order.
    pub served:          Vec<PassengerRequest>,
    /// Set while a freight tour sits in the schedule, cleared when its
    /// closing retool has been left behind.
    pub on_freight_tour: bool,
}

impl VehicleState {
    /// A vehicle waiting at `home` for the whole service day.
    pub fn new(
        id:              VehicleId,
        home:            LinkId,
        service_begin:   SimTime,
        service_end:     SimTime,
        freight_capable: bool,
    ) -> Self {
        Self {
            id,
            schedule: Schedule::with_stay(id, home, service_begin, service_end),
            obligations: ObligationStack::new(),
            freight_capable,
            service_end,
            pending_request: None,
            on_board: None,
            served: Vec::new(),
            on_freight_tour: false,
        }
    }

    #[inline]
    pub fn has_pending_request(&self) -> bool {
        self.pending_request.is_some()
    }
}
