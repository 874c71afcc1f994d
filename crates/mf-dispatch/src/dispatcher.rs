//! The dispatch state machine.
//!
//! # When decisions are made
//!
//! The host reports every task completion through
//! [`Dispatcher::on_task_completed`].  The dispatcher first repairs the
//! vehicle's timeline with the actual completion time, then looks at what
//! kind of task just ended:
//!
//! | Completed task                         | Decision                                   |
//! |----------------------------------------|--------------------------------------------|
//! | PICKUP                                 | consume pending request, update obligations |
//! | DROPOFF                                | close the trip, request a tour (`AwayFromDepot`) |
//! | closing RETOOL, return drive next      | request another tour (`AtDepot`)           |
//! | EMPTY_DRIVE into the closing RETOOL    | request another tour (`TowardDepot`)       |
//! | return drive after the closing RETOOL  | tour completed                             |
//! | anything else                          | nothing                                    |
//!
//! # Tour insertion
//!
//! A successful tour request replaces the speculative tail after the current
//! task (the closing STAY, plus the return drive and closing retool of a
//! finished tour) with
//!
//! ```text
//! [access drive] RETOOL (leg? SERVICE)* [leg] RETOOL  return drive  STAY
//! ```
//!
//! The whole replacement is built first and swapped in with one
//! [`Schedule::replace_tail`][mf_schedule::Schedule::replace_tail] call.

use tracing::{debug, info, warn};

use mf_core::{DispatchConfig, LinkId, RequestId, SimTime};
use mf_freight::{ConvertedTour, TourManager, TourRequest, TourRequestContext, convert_tour};
use mf_routing::Router;
use mf_schedule::{
    Load, Obligation, ScheduleError, ScheduleStatus, Task, TaskKind, TaskStatus, TaskType,
    repair_from_current,
};

use crate::{
    DispatchError, DispatchObserver, DispatchResult, DispatchedTourRecord, PassengerRequest,
    RejectionReason, RequestStatus, TourRejection, VehicleState,
};

/// Tail expected after a DROPOFF when a tour is requested.
const AFTER_DROPOFF: &[TaskType] = &[TaskType::Stay];
/// Tail expected after a closing RETOOL.
const AFTER_CLOSING_RETOOL: &[TaskType] = &[TaskType::EmptyDrive, TaskType::Stay];
/// Tail expected after the drive into the closing RETOOL.
const BEFORE_CLOSING_RETOOL: &[TaskType] = &[TaskType::Retool, TaskType::EmptyDrive, TaskType::Stay];

/// Decides what each vehicle does next.
///
/// Holds only policy and collaborators; all per-vehicle state is passed in.
pub struct Dispatcher<R: Router, M: TourManager> {
    config: DispatchConfig,
    router: R,
    tours:  M,
}

impl<R: Router, M: TourManager> Dispatcher<R, M> {
    pub fn new(config: DispatchConfig, router: R, tours: M) -> DispatchResult<Self> {
        config.validate()?;
        Ok(Self { config, router, tours })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn tours(&self) -> &M {
        &self.tours
    }

    pub fn tours_mut(&mut self) -> &mut M {
        &mut self.tours
    }

    // ── Task completion ───────────────────────────────────────────────────

    /// Handle the completion of `vehicle`'s current task at `now`.
    ///
    /// The current task stays STARTED; the host advances the schedule
    /// afterwards.
    pub fn on_task_completed(
        &mut self,
        vehicle:  &mut VehicleState,
        now:      SimTime,
        observer: &mut impl DispatchObserver,
    ) -> DispatchResult<()> {
        let current = current_index(vehicle)?;
        repair_from_current(&mut vehicle.schedule, now, vehicle.service_end)?;

        let kind = vehicle.schedule.tasks()[current].kind().clone();
        debug!(vehicle = %vehicle.id, task = %kind.task_type(), now = %now, "task completed");

        match kind {
            TaskKind::Pickup { request, .. } => self.on_pickup_completed(vehicle, current, request, now),
            TaskKind::Dropoff { link, request } => {
                finish_trip(vehicle, request)?;
                self.on_dropoff_completed(vehicle, current, link, now, observer)
            }
            TaskKind::Retool { link } => self.on_retool_completed(vehicle, current, link, now, observer),
            TaskKind::EmptyDrive { .. } => self.on_empty_drive_completed(vehicle, current, now, observer),
            TaskKind::Stay { .. } | TaskKind::OccupiedDrive { .. } | TaskKind::FreightService { .. } => {
                Ok(())
            }
        }
    }

    fn on_pickup_completed(
        &mut self,
        vehicle: &mut VehicleState,
        current: usize,
        picked:  RequestId,
        now:     SimTime,
    ) -> DispatchResult<()> {
        let Some(request) = vehicle.pending_request.as_ref().filter(|r| r.id == picked) else {
            return Err(DispatchError::UnexpectedPickup { vehicle: vehicle.id, request: picked });
        };

        // A booking made without a destination ends in this PICKUP.
        if current + 1 == vehicle.schedule.len() {
            let pickup_end = vehicle.schedule.tasks()[current].end();
            let suffix = self.trip_tasks(request, pickup_end, vehicle.service_end)?;
            vehicle.schedule.replace_tail(current + 1, suffix)?;
        }
        let Some(mut request) = vehicle.pending_request.take() else {
            return Err(DispatchError::UnexpectedPickup { vehicle: vehicle.id, request: picked });
        };
        request.status = RequestStatus::PickedUp;

        if let Some(done) = vehicle.obligations.pop() {
            if done.link.is_some_and(|link| link != request.from) {
                warn!(
                    vehicle = %vehicle.id,
                    obligation = %done,
                    pickup = %request.from,
                    "owner picked up away from the promised return link"
                );
            }
        }
        if let Some(deadline) = request.return_deadline {
            vehicle.obligations.push(Obligation::new(request.to, deadline));
        }

        info!(vehicle = %vehicle.id, request = %request.id, now = %now, "passenger picked up");
        vehicle.on_board = Some(request);
        Ok(())
    }

    fn on_dropoff_completed(
        &mut self,
        vehicle:  &mut VehicleState,
        current:  usize,
        location: LinkId,
        now:      SimTime,
        observer: &mut impl DispatchObserver,
    ) -> DispatchResult<()> {
        if !vehicle.freight_capable {
            return Err(DispatchError::NotFreightCapable { vehicle: vehicle.id });
        }
        if let Some(pending) = &vehicle.pending_request {
            debug!(vehicle = %vehicle.id, pending = %pending.id, "owner trip pending, no tour request");
            return Ok(());
        }
        self.request_freight_tour(
            vehicle,
            current,
            now,
            TourRequestContext::AwayFromDepot { location },
            AFTER_DROPOFF,
            observer,
        )
    }

    fn on_retool_completed(
        &mut self,
        vehicle:  &mut VehicleState,
        current:  usize,
        depot:    LinkId,
        now:      SimTime,
        observer: &mut impl DispatchObserver,
    ) -> DispatchResult<()> {
        let tasks = vehicle.schedule.tasks();
        let return_drive_next =
            matches!(tasks.get(current + 1).map(Task::task_type), Some(TaskType::EmptyDrive));
        if !return_drive_next || has_tour_tasks_after(tasks, current) || !self.may_chain(vehicle) {
            return Ok(());
        }
        self.request_freight_tour(
            vehicle,
            current,
            now,
            TourRequestContext::AtDepot { depot },
            AFTER_CLOSING_RETOOL,
            observer,
        )
    }

    fn on_empty_drive_completed(
        &mut self,
        vehicle:  &mut VehicleState,
        current:  usize,
        now:      SimTime,
        observer: &mut impl DispatchObserver,
    ) -> DispatchResult<()> {
        let tasks = vehicle.schedule.tasks();

        let closing_retool_next = matches!(
            tasks.get(current + 1).map(Task::task_type),
            Some(TaskType::Retool)
        ) && !has_tour_tasks_after(tasks, current + 1);
        if closing_retool_next {
            if !self.may_chain(vehicle) {
                return Ok(());
            }
            let depot = tasks[current + 1].end_link();
            return self.request_freight_tour(
                vehicle,
                current,
                now,
                TourRequestContext::TowardDepot { depot },
                BEFORE_CLOSING_RETOOL,
                observer,
            );
        }

        let after_retool = current
            .checked_sub(1)
            .is_some_and(|p| tasks[p].task_type() == TaskType::Retool);
        if after_retool && !has_tour_tasks_after(tasks, current) {
            if !vehicle.on_freight_tour {
                return Err(DispatchError::NotOnFreightTour { vehicle: vehicle.id });
            }
            vehicle.on_freight_tour = false;
            info!(vehicle = %vehicle.id, now = %now, "freight tour completed");
            observer.on_tour_completed(vehicle.id, now);
        }
        Ok(())
    }

    fn may_chain(&self, vehicle: &VehicleState) -> bool {
        self.config.allow_multiple_tours_in_a_row && !vehicle.has_pending_request()
    }

    // ── Freight tours ─────────────────────────────────────────────────────

    /// Ask the tour manager for a tour and insert it after the current task,
    /// replacing the `cleanup` tail.
    ///
    /// Rejections are reported to `observer` and leave the schedule as it
    /// was.
    fn request_freight_tour(
        &mut self,
        vehicle:  &mut VehicleState,
        current:  usize,
        now:      SimTime,
        context:  TourRequestContext,
        cleanup:  &[TaskType],
        observer: &mut impl DispatchObserver,
    ) -> DispatchResult<()> {
        let must_return = vehicle.obligations.peek().copied();
        let rejection = |reason| TourRejection {
            vehicle: vehicle.id,
            request_link: context.link(),
            must_return,
            reason,
            time: now,
        };

        if now > self.config.freight_tour_latest_start {
            reject(observer, rejection(RejectionReason::CutoffPassed));
            return Ok(());
        }
        check_tail(vehicle, current, cleanup)?;

        let request = TourRequest {
            vehicle: vehicle.id,
            now,
            context,
            must_return,
            retool_duration: self.config.retool_duration,
        };
        let Some(plan) = self.tours.request_plan(&request) else {
            reject(observer, rejection(RejectionReason::NoPlan));
            return Ok(());
        };
        let tour = convert_tour(&plan, self.config.retool_duration)?;
        if !vehicle.obligations.admits(now, tour.planned_duration) {
            self.tours.return_plan(plan);
            reject(observer, rejection(RejectionReason::ObligationConflict));
            return Ok(());
        }

        let (suffix, distances) = self.tour_tail(vehicle, current, &tour)?;
        vehicle.schedule.replace_tail(current + 1, suffix)?;
        vehicle.on_freight_tour = true;

        if matches!(
            context,
            TourRequestContext::TowardDepot { .. } | TourRequestContext::AtDepot { .. }
        ) {
            info!(vehicle = %vehicle.id, now = %now, "freight tour completed");
            observer.on_tour_completed(vehicle.id, now);
        }

        let record = DispatchedTourRecord {
            vehicle: vehicle.id,
            request_link: context.link(),
            dispatch_time: now,
            must_return,
            tour: plan.id,
            depot: tour.depot,
            planned_duration: tour.planned_duration,
            planned_distance_m: distances.total_m,
            empty_distance_fraction: distances.empty_fraction(),
            distance_to_depot_m: distances.to_depot_m,
            distance_back_to_owner_m: distances.back_to_owner_m,
            total_demand: tour.total_demand,
        };
        info!(
            vehicle = %vehicle.id,
            tour = %plan.id,
            depot = %plan.depot,
            now = %now,
            planned_duration = record.planned_duration,
            "freight tour scheduled"
        );
        observer.on_tour_scheduled(&record);
        Ok(())
    }

    /// Build the replacement tail for `tour`, starting at the end of the
    /// current task.  Nothing is modified.
    fn tour_tail(
        &self,
        vehicle: &VehicleState,
        current: usize,
        tour:    &ConvertedTour,
    ) -> DispatchResult<(Vec<Task>, TourDistances)> {
        let anchor = &vehicle.schedule.tasks()[current];
        let mut t = anchor.end();
        let mut at = anchor.end_link();
        let mut suffix = Vec::with_capacity(tour.tasks.len() * 2 + 3);
        let mut d = TourDistances::default();

        // Access drive to the depot.
        let access = self.router.route(at, tour.depot, t)?;
        d.to_depot_m = access.distance_m;
        if !access.is_trivial() {
            d.total_m += access.distance_m;
            d.empty_m += access.distance_m;
            let drive = Task::empty_drive(t, access);
            t = drive.end();
            suffix.push(drive);
        }
        at = tour.depot;

        // Tour tasks, joined by legs and re-anchored to the actual timeline.
        let mut planned_prev_end: Option<SimTime> = None;
        for task in &tour.tasks {
            let link = task.start_link();
            if link != at {
                let departure = match planned_prev_end {
                    Some(planned) if !self.config.re_route_tours => planned,
                    _ => t,
                };
                let mut leg = self.router.route(at, link, departure)?;
                leg.departure = t;
                d.total_m += leg.distance_m;
                let drive = match task.task_type() {
                    TaskType::FreightService => Task::occupied_drive(t, leg, Load::Freight),
                    _ => {
                        d.empty_m += leg.distance_m;
                        Task::empty_drive(t, leg)
                    }
                };
                t = drive.end();
                suffix.push(drive);
                at = link;
            }
            let anchored = task.shifted_to(t);
            t = anchored.end();
            planned_prev_end = Some(task.end());
            suffix.push(anchored);
        }

        // Return drive to the owner and the closing stay.
        let home = self.return_location(vehicle)?;
        let back = self.router.route(at, home, t)?;
        d.back_to_owner_m = back.distance_m;
        d.total_m += back.distance_m;
        d.empty_m += back.distance_m;
        let drive = Task::empty_drive(t, back);
        t = drive.end();
        suffix.push(drive);
        suffix.push(Task::stay(t, t.max(vehicle.service_end), home));

        Ok((suffix, d))
    }

    /// The owner's location: the top obligation's link, or else the most
    /// recent passenger drop-off.
    fn return_location(&self, vehicle: &VehicleState) -> DispatchResult<LinkId> {
        if let Some(link) = vehicle.obligations.peek().and_then(|o| o.link) {
            return Ok(link);
        }
        vehicle
            .schedule
            .tasks()
            .iter()
            .rev()
            .find_map(|t| match t.kind() {
                TaskKind::Dropoff { link, .. } => Some(*link),
                _ => None,
            })
            .ok_or(DispatchError::NoReturnLocation { vehicle: vehicle.id })
    }

    /// Cancel the freight tour `vehicle` is driving.  Not supported.
    pub fn cancel_freight_tour(&mut self, vehicle: &VehicleState) -> DispatchResult<()> {
        Err(DispatchError::CancellationUnsupported { vehicle: vehicle.id })
    }

    // ── Passenger trips ───────────────────────────────────────────────────

    /// Insert the owner's trip `request` at the end of `vehicle`'s schedule.
    ///
    /// The trailing STAY is cut at the departure time (or dropped if it would
    /// last zero seconds and has not started).  On error the vehicle is left
    /// untouched.
    pub fn schedule_request(
        &mut self,
        vehicle: &mut VehicleState,
        mut request: PassengerRequest,
        now: SimTime,
    ) -> DispatchResult<()> {
        if request.status != RequestStatus::Unplanned {
            return Err(DispatchError::RequestNotUnplanned { request: request.id, status: request.status });
        }
        if let Some(pending) = &vehicle.pending_request {
            return Err(DispatchError::RequestPending { vehicle: vehicle.id, pending: pending.id });
        }
        let stay = vehicle.schedule.last_task().ok_or(ScheduleError::Empty)?;
        if stay.task_type() != TaskType::Stay {
            return Err(DispatchError::TailNotStay { vehicle: vehicle.id, found: stay.task_type() });
        }
        let stay_index = vehicle.schedule.len() - 1;
        let stay_begin = stay.begin();
        let stay_status = stay.status();
        let from = stay.end_link();

        // Build everything before touching the schedule.
        let departure = stay_begin.max(now);
        let mut tail = Vec::with_capacity(5);
        let mut t = departure;
        let access = self.router.route(from, request.from, departure)?;
        if !access.is_trivial() {
            let drive = Task::empty_drive(t, access);
            t = drive.end();
            tail.push(drive);
        }
        let pickup = Task::pickup(
            t,
            request.from,
            request.id,
            request.earliest_start,
            self.config.pickup_duration,
        );
        t = pickup.end();
        tail.push(pickup);
        if self.config.destination_known {
            tail.extend(self.trip_tasks(&request, t, vehicle.service_end)?);
        }

        match stay_status {
            TaskStatus::Planned if stay_begin == departure => {
                vehicle.schedule.replace_tail(stay_index, tail)?;
            }
            TaskStatus::Planned => {
                let mut staged = Vec::with_capacity(tail.len() + 1);
                staged.push(Task::stay(stay_begin, departure, from));
                staged.extend(tail);
                vehicle.schedule.replace_tail(stay_index, staged)?;
            }
            TaskStatus::Started | TaskStatus::Performed => {
                vehicle.schedule.truncate_last_stay(departure)?;
                vehicle.schedule.replace_tail(stay_index + 1, tail)?;
            }
        }

        info!(
            vehicle = %vehicle.id,
            request = %request.id,
            departure = %departure,
            earliest_start = %request.earliest_start,
            "owner trip scheduled"
        );
        request.status = RequestStatus::Planned;
        vehicle.pending_request = Some(request);
        Ok(())
    }

    /// OCCUPIED_DRIVE + DROPOFF + STAY for `request`, starting at `begin`.
    fn trip_tasks(
        &self,
        request:     &PassengerRequest,
        begin:       SimTime,
        service_end: SimTime,
    ) -> DispatchResult<Vec<Task>> {
        let mut tasks = Vec::with_capacity(3);
        let mut t = begin;
        let trip = self.router.route(request.from, request.to, t)?;
        if !trip.is_trivial() {
            let drive = Task::occupied_drive(t, trip, Load::Passenger(request.id));
            t = drive.end();
            tasks.push(drive);
        }
        let dropoff = Task::dropoff(t, self.config.dropoff_duration, request.to, request.id);
        t = dropoff.end();
        tasks.push(dropoff);
        tasks.push(Task::stay(t, t.max(service_end), request.to));
        Ok(tasks)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Metres driven by the drives inserted for one tour.
#[derive(Default)]
struct TourDistances {
    total_m:         f64,
    empty_m:         f64,
    to_depot_m:      f64,
    back_to_owner_m: f64,
}

impl TourDistances {
    fn empty_fraction(&self) -> f64 {
        if self.total_m > 0.0 { self.empty_m / self.total_m } else { 0.0 }
    }
}

fn reject(observer: &mut impl DispatchObserver, rejection: TourRejection) {
    info!(
        vehicle = %rejection.vehicle,
        reason = ?rejection.reason,
        now = %rejection.time,
        "tour request rejected"
    );
    observer.on_tour_rejected(&rejection);
}

/// Move the on-board trip `dropped` to the vehicle's served trips.
fn finish_trip(vehicle: &mut VehicleState, dropped: RequestId) -> DispatchResult<()> {
    let Some(mut trip) = vehicle.on_board.take_if(|r| r.id == dropped) else {
        return Err(DispatchError::UnexpectedDropoff { vehicle: vehicle.id, request: dropped });
    };
    trip.status = RequestStatus::Performed;
    debug!(vehicle = %vehicle.id, request = %trip.id, "passenger dropped off");
    vehicle.served.push(trip);
    Ok(())
}

fn current_index(vehicle: &VehicleState) -> DispatchResult<usize> {
    match (vehicle.schedule.status(), vehicle.schedule.current_index()) {
        (ScheduleStatus::Started, Some(i)) => Ok(i),
        _ => Err(DispatchError::NoCurrentTask { vehicle: vehicle.id }),
    }
}

/// `true` if a RETOOL or FREIGHT_SERVICE follows index `i`.
fn has_tour_tasks_after(tasks: &[Task], i: usize) -> bool {
    tasks.iter().skip(i + 1).any(Task::is_tour_task)
}

/// The tasks after `current` must be exactly `expected`, kind by kind.
fn check_tail(vehicle: &VehicleState, current: usize, expected: &[TaskType]) -> DispatchResult<()> {
    let found: Vec<TaskType> = vehicle.schedule.tasks()[current + 1..]
        .iter()
        .map(Task::task_type)
        .collect();
    if found != expected {
        return Err(DispatchError::TailMismatch {
            vehicle: vehicle.id,
            expected: expected.to_vec(),
            found,
        });
    }
    Ok(())
}
