//! `FreightTourPlan` — an optimized tour as handed out by the tour manager.
//!
//! All stop times are offsets from the first-leg departure at the depot, so a
//! plan can be stored once and anchored at whatever time it is dispatched.
//! Plans are read-only to the dispatcher.

use mf_core::{LinkId, ServiceId, SimTime, TourId};

/// One service stop of a tour.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourStop {
    pub service:          ServiceId,
    pub location:         LinkId,
    /// Expected arrival, in seconds after the first-leg departure.
    pub arrival_offset:   u64,
    pub service_duration: u64,
    /// Capacity units delivered or collected at this stop.
    pub demand:           u32,
}

/// An ordered multi-stop delivery tour.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FreightTourPlan {
    pub id:              TourId,
    /// Depot the tour starts from.
    pub depot:           LinkId,
    /// Depot the tour ends at; usually equal to `depot`.
    pub end_location:    LinkId,
    /// Expected departure of the first leg.
    pub departure:       SimTime,
    /// Expected departure of the final leg into `end_location`.
    pub final_departure: SimTime,
    pub stops:           Vec<TourStop>,
}

impl FreightTourPlan {
    /// Span from the first-leg departure to the final-leg departure, or 0
    /// for a plan whose final departure comes first.
    #[inline]
    pub fn span(&self) -> u64 {
        self.final_departure.0.saturating_sub(self.departure.0)
    }

    /// Seconds from the leading retool's begin to the closing retool's end,
    /// as the converter lays the tour out.
    #[inline]
    pub fn planned_duration(&self, retool_duration: u64) -> u64 {
        self.span().saturating_add(retool_duration.saturating_mul(2))
    }

    pub fn total_demand(&self) -> u32 {
        self.stops.iter().map(|s| s.demand).sum()
    }
}
