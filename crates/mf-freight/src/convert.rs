//! Tour-to-task conversion.
//!
//! A [`FreightTourPlan`] becomes the task sequence
//!
//! ```text
//! RETOOL  [dep − R, dep]                       at depot
//! SERVICE [dep + offset_i, + service_duration] at stop i   (for each stop)
//! RETOOL  [final_dep, final_dep + R]           at end location
//! ```
//!
//! where `R` is the configured retool duration.  The tasks are *unattached*:
//! they carry the plan's times and are neither continuous with each other nor
//! with any schedule.  The dispatcher joins them with drives and re-anchors
//! them to the vehicle's actual timeline.

use mf_core::{LinkId, SimTime};
use mf_schedule::Task;

use crate::{FreightError, FreightResult, FreightTourPlan};

/// Converter output.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertedTour {
    /// Leading retool, one service per stop, closing retool.
    pub tasks:                       Vec<Task>,
    pub depot:                       LinkId,
    pub end_location:                LinkId,
    /// `closing_retool.end − leading_retool.begin`.
    pub planned_duration:            u64,
    /// Seconds from the first-leg departure to arrival at the last stop.
    pub travel_time_to_last_service: u64,
    pub total_demand:                u32,
}

/// Convert `plan` into unattached tasks.
///
/// Fails with [`FreightError::MalformedPlan`] for a tour without stops and
/// [`FreightError::InconsistentTiming`] when the plan's times do not describe
/// a feasible sequence.
pub fn convert_tour(plan: &FreightTourPlan, retool_duration: u64) -> FreightResult<ConvertedTour> {
    let last_stop = plan.stops.last().ok_or(FreightError::MalformedPlan(plan.id))?;
    let timing = |at: SimTime, reason: &'static str| FreightError::InconsistentTiming {
        tour: plan.id,
        at,
        reason,
    };

    let retool_begin = plan
        .departure
        .checked_sub_secs(retool_duration)
        .ok_or_else(|| timing(plan.departure, "departure leaves no time for the leading retool"))?;

    let mut tasks = Vec::with_capacity(plan.stops.len() + 2);
    tasks.push(Task::retool(retool_begin, plan.departure, plan.depot));

    let mut prev_offset = 0;
    let mut prev_end = plan.departure;
    for stop in &plan.stops {
        let begin = plan
            .departure
            .checked_add_secs(stop.arrival_offset)
            .ok_or_else(|| timing(plan.departure, "arrival offset out of range"))?;
        if stop.arrival_offset < prev_offset {
            return Err(timing(begin, "arrival offsets decrease"));
        }
        if begin < prev_end {
            return Err(timing(begin, "service stops overlap"));
        }
        let end = begin
            .checked_add_secs(stop.service_duration)
            .ok_or_else(|| timing(begin, "service duration out of range"))?;
        tasks.push(Task::freight_service(begin, end, stop.location, stop.service, stop.demand));
        prev_offset = stop.arrival_offset;
        prev_end = end;
    }

    if plan.final_departure < prev_end {
        return Err(timing(plan.final_departure, "final departure before the last stop is served"));
    }
    let closing_end = plan
        .final_departure
        .checked_add_secs(retool_duration)
        .ok_or_else(|| timing(plan.final_departure, "closing retool ends out of range"))?;
    tasks.push(Task::retool(plan.final_departure, closing_end, plan.end_location));

    Ok(ConvertedTour {
        tasks,
        depot: plan.depot,
        end_location: plan.end_location,
        planned_duration: closing_end - retool_begin,
        travel_time_to_last_service: last_stop.arrival_offset,
        total_demand: plan.total_demand(),
    })
}
