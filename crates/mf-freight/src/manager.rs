//! The tour-manager seam.
//!
//! Which stops make up a tour is decided outside the dispatcher, by a tour
//! optimizer.  The dispatcher only asks for "a tour for this vehicle, now"
//! through [`TourManager`] and gets back a finished [`FreightTourPlan`] or
//! nothing.
//!
//! [`TourQueue`] is the deterministic reference implementation: it hands out
//! pre-planned tours in order.

use std::collections::VecDeque;

use tracing::debug;

use mf_core::{LinkId, SimTime, VehicleId};
use mf_schedule::Obligation;

use crate::FreightTourPlan;

// ── Request ───────────────────────────────────────────────────────────────────

/// Where the vehicle is when it asks for a tour.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TourRequestContext {
    /// Just dropped off a passenger at `location`.
    AwayFromDepot { location: LinkId },
    /// Driving into `depot` at the end of a tour.
    TowardDepot { depot: LinkId },
    /// Finished retooling at `depot` at the end of a tour.
    AtDepot { depot: LinkId },
}

impl TourRequestContext {
    /// The link the vehicle is at or heading to.
    pub fn link(&self) -> LinkId {
        match *self {
            TourRequestContext::AwayFromDepot { location } => location,
            TourRequestContext::TowardDepot { depot } | TourRequestContext::AtDepot { depot } => depot,
        }
    }

    /// The depot the vehicle is at or heading to, if any.
    pub fn depot(&self) -> Option<LinkId> {
        match *self {
            TourRequestContext::AwayFromDepot { .. } => None,
            TourRequestContext::TowardDepot { depot } | TourRequestContext::AtDepot { depot } => {
                Some(depot)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TourRequest {
    pub vehicle:         VehicleId,
    pub now:             SimTime,
    pub context:         TourRequestContext,
    /// Top of the vehicle's obligation stack.
    pub must_return:     Option<Obligation>,
    /// Retool time the dispatcher adds at both ends of a tour.
    pub retool_duration: u64,
}

// ── Manager trait ─────────────────────────────────────────────────────────────

/// Source of freight tours.
pub trait TourManager {
    /// Hand out a tour for `request`, or `None` if there is nothing suitable.
    fn request_plan(&mut self, request: &TourRequest) -> Option<FreightTourPlan>;

    /// Take back a plan the dispatcher declined after [`request_plan`].
    ///
    /// [`request_plan`]: TourManager::request_plan
    fn return_plan(&mut self, _plan: FreightTourPlan) {}
}

impl<M: TourManager + ?Sized> TourManager for &mut M {
    fn request_plan(&mut self, request: &TourRequest) -> Option<FreightTourPlan> {
        (**self).request_plan(request)
    }

    fn return_plan(&mut self, plan: FreightTourPlan) {
        (**self).return_plan(plan)
    }
}

// ── TourQueue ─────────────────────────────────────────────────────────────────

/// Pre-planned tours handed out first come, first served.
///
/// A vehicle at or heading to a depot gets the first queued tour from that
/// depot if there is one.  Tours that would run past the vehicle's
/// must-return deadline are skipped, not dropped.
#[derive(Clone, Debug, Default)]
pub struct TourQueue {
    tours: VecDeque<FreightTourPlan>,
}

impl TourQueue {
    pub fn new(tours: impl IntoIterator<Item = FreightTourPlan>) -> Self {
        Self { tours: tours.into_iter().collect() }
    }

    pub fn push(&mut self, plan: FreightTourPlan) {
        self.tours.push_back(plan);
    }

    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    fn fits(plan: &FreightTourPlan, request: &TourRequest) -> bool {
        request
            .must_return
            .is_none_or(|o| {
                let duration = plan.planned_duration(request.retool_duration);
                request.now.saturating_add(duration) <= o.deadline
            })
    }
}

impl TourManager for TourQueue {
    fn request_plan(&mut self, request: &TourRequest) -> Option<FreightTourPlan> {
        let at_depot = request.context.depot().and_then(|depot| {
            self.tours
                .iter()
                .position(|p| p.depot == depot && Self::fits(p, request))
        });
        let index = at_depot.or_else(|| self.tours.iter().position(|p| Self::fits(p, request)))?;
        let plan = self.tours.remove(index)?;
        debug!(
            vehicle = %request.vehicle,
            tour = %plan.id,
            depot = %plan.depot,
            remaining = self.tours.len(),
            "tour handed out"
        );
        Some(plan)
    }

    fn return_plan(&mut self, plan: FreightTourPlan) {
        debug!(tour = %plan.id, "tour returned to queue");
        self.tours.push_front(plan);
    }
}
