//! Dispatch events and the observer that receives them.
//!
//! Successful insertions, finished tours, and rejected tour requests are
//! reported through [`DispatchObserver`].  The dispatcher never depends on
//! what an observer does with them.

use mf_core::{LinkId, SimTime, TourId, VehicleId};
use mf_schedule::Obligation;

// ── Records ───────────────────────────────────────────────────────────────────

/// Reporting record of a freight tour inserted into a vehicle's schedule.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchedTourRecord {
    pub vehicle:                  VehicleId,
    /// Where the vehicle was (or was heading) when it asked for the tour.
    pub request_link:             LinkId,
    pub dispatch_time:            SimTime,
    pub must_return:              Option<Obligation>,
    pub tour:                     TourId,
    pub depot:                    LinkId,
    /// Seconds from the leading retool's begin to the closing retool's end.
    pub planned_duration:         u64,
    /// Metres of every drive inserted for the tour, return drive included.
    pub planned_distance_m:       f64,
    /// Share of `planned_distance_m` driven empty.
    pub empty_distance_fraction:  f64,
    pub distance_to_depot_m:      f64,
    pub distance_back_to_owner_m: f64,
    pub total_demand:             u32,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectionReason {
    /// The request came after `freight_tour_latest_start`.
    CutoffPassed,
    /// The tour manager had no tour.
    NoPlan,
    /// The tour would end after the vehicle's must-return deadline.
    ObligationConflict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourRejection {
    pub vehicle:      VehicleId,
    pub request_link: LinkId,
    pub must_return:  Option<Obligation>,
    pub reason:       RejectionReason,
    pub time:         SimTime,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked by the [`Dispatcher`][crate::Dispatcher].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait DispatchObserver {
    /// A freight tour was inserted.
    fn on_tour_scheduled(&mut self, _record: &DispatchedTourRecord) {}

    /// `vehicle` finished a freight tour at `time`.
    fn on_tour_completed(&mut self, _vehicle: VehicleId, _time: SimTime) {}

    /// A tour request was turned down; the schedule is unchanged.
    fn on_tour_rejected(&mut self, _rejection: &TourRejection) {}
}

/// A [`DispatchObserver`] that ignores everything.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

// ── EventLog ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchEvent {
    TourScheduled(DispatchedTourRecord),
    TourCompleted { vehicle: VehicleId, time: SimTime },
    TourRequestRejected(TourRejection),
}

/// Observer that keeps every event in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<DispatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> impl Iterator<Item = &DispatchedTourRecord> {
        self.events.iter().filter_map(|e| match e {
            DispatchEvent::TourScheduled(r) => Some(r),
            _ => None,
        })
    }

    pub fn rejections(&self) -> impl Iterator<Item = &TourRejection> {
        self.events.iter().filter_map(|e| match e {
            DispatchEvent::TourRequestRejected(r) => Some(r),
            _ => None,
        })
    }

    pub fn completed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DispatchEvent::TourCompleted { .. }))
            .count()
    }
}

impl DispatchObserver for EventLog {
    fn on_tour_scheduled(&mut self, record: &DispatchedTourRecord) {
        self.events.push(DispatchEvent::TourScheduled(record.clone()));
    }

    fn on_tour_completed(&mut self, vehicle: VehicleId, time: SimTime) {
        self.events.push(DispatchEvent::TourCompleted { vehicle, time });
    }

    fn on_tour_rejected(&mut self, rejection: &TourRejection) {
        self.events.push(DispatchEvent::TourRequestRejected(rejection.clone()));
    }
}
