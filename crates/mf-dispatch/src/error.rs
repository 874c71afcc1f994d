use thiserror::Error;

use mf_core::{CoreError, RequestId, VehicleId};
use mf_freight::FreightError;
use mf_routing::RoutingError;
use mf_schedule::{ScheduleError, TaskType};

use crate::RequestStatus;

/// Dispatch failures.
///
/// Most variants mean the vehicle's state is inconsistent and the run should
/// stop; see [`DispatchError::is_fatal`].  Business rejections (no tour, the
/// cutoff has passed, an obligation conflict) are not errors at all and go
/// to the [`DispatchObserver`][crate::DispatchObserver] instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("freight tour error: {0}")]
    Freight(#[from] FreightError),

    #[error("{vehicle} completed a DROPOFF but cannot carry freight")]
    NotFreightCapable { vehicle: VehicleId },

    #[error("{vehicle} completed a PICKUP for {request} without a matching pending request")]
    UnexpectedPickup { vehicle: VehicleId, request: RequestId },

    #[error("{vehicle} completed a DROPOFF for {request} without that passenger on board")]
    UnexpectedDropoff { vehicle: VehicleId, request: RequestId },

    #[error("{vehicle} finished a freight tour it was not flagged as driving")]
    NotOnFreightTour { vehicle: VehicleId },

    #[error("{vehicle}: expected tail {expected:?} after the current task, found {found:?}")]
    TailMismatch {
        vehicle:  VehicleId,
        expected: Vec<TaskType>,
        found:    Vec<TaskType>,
    },

    #[error("{vehicle}: no obligation link and no passenger drop-off to return to")]
    NoReturnLocation { vehicle: VehicleId },

    #[error("{vehicle}: cancelling a freight tour in progress is not supported")]
    CancellationUnsupported { vehicle: VehicleId },

    #[error("{vehicle} has no current task")]
    NoCurrentTask { vehicle: VehicleId },

    #[error("request {request} is {status:?}, only unplanned requests can be scheduled")]
    RequestNotUnplanned { request: RequestId, status: RequestStatus },

    #[error("{vehicle}: schedule ends with {found}, a STAY is required to insert a trip")]
    TailNotStay { vehicle: VehicleId, found: TaskType },

    #[error("{vehicle} already has pending request {pending}")]
    RequestPending { vehicle: VehicleId, pending: RequestId },
}

impl DispatchError {
    /// `false` for errors that leave the vehicle untouched and only reject
    /// the call that caused them.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DispatchError::RequestNotUnplanned { .. }
                | DispatchError::TailNotStay { .. }
                | DispatchError::RequestPending { .. }
        )
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
