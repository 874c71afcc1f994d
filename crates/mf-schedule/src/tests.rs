//! Unit tests for mf-schedule.

use mf_core::{LinkId, RequestId, ServiceId, SimTime, VehicleId};
use mf_routing::Path;

use crate::{Load, Schedule, Task};

const V: VehicleId = VehicleId(0);

fn path(from: u32, to: u32, departure: u64, travel_time: u64) -> Path {
    Path {
        from:        LinkId(from),
        to:          LinkId(to),
        departure:   SimTime(departure),
        travel_time,
        link_count:  3,
        distance_m:  travel_time as f64 * 10.0,
    }
}

/// A started passenger trip followed by a short wait, a repositioning drive,
/// and the closing stay:
///
/// ```text
/// EMPTY_DRIVE [0,100]  PICKUP [100,130]  OCCUPIED [130,330]  DROPOFF [330,390]
/// STAY [390,400]  EMPTY_DRIVE [400,500]  STAY [500,600]
/// ```
fn trip_schedule() -> Schedule {
    let r = RequestId(1);
    let mut s = Schedule::new(V);
    s.append(Task::empty_drive(SimTime(0), path(1, 2, 0, 100))).unwrap();
    s.append(Task::pickup(SimTime(100), LinkId(2), r, SimTime(100), 30)).unwrap();
    s.append(Task::occupied_drive(SimTime(130), path(2, 3, 130, 200), Load::Passenger(r))).unwrap();
    s.append(Task::dropoff(SimTime(330), 60, LinkId(3), r)).unwrap();
    s.append(Task::stay(SimTime(390), SimTime(400), LinkId(3))).unwrap();
    s.append(Task::empty_drive(SimTime(400), path(3, 4, 400, 100))).unwrap();
    s.append(Task::stay(SimTime(500), SimTime(600), LinkId(4))).unwrap();
    s.start().unwrap();
    s
}

// ── Task ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod task {
    use super::*;
    use crate::{TaskStatus, TaskType};

    #[test]
    fn drive_duration_is_travel_time() {
        let t = Task::empty_drive(SimTime(100), path(1, 2, 100, 120));
        assert_eq!(t.end(), SimTime(220));
        assert_eq!(t.start_link(), LinkId(1));
        assert_eq!(t.end_link(), LinkId(2));
        assert_eq!(t.status(), TaskStatus::Planned);
    }

    #[test]
    fn pickup_waits_for_earliest_start() {
        let early = Task::pickup(SimTime(100), LinkId(2), RequestId(0), SimTime(150), 30);
        assert_eq!(early.end(), SimTime(180));
        let late = Task::pickup(SimTime(220), LinkId(2), RequestId(0), SimTime(150), 30);
        assert_eq!(late.end(), SimTime(250));
    }

    #[test]
    fn tour_tasks() {
        let retool = Task::retool(SimTime(0), SimTime(600), LinkId(9));
        let service = Task::freight_service(SimTime(600), SimTime(900), LinkId(5), ServiceId(1), 3);
        let stay = Task::stay(SimTime(0), SimTime(10), LinkId(9));
        assert!(retool.is_tour_task());
        assert!(service.is_tour_task());
        assert!(!stay.is_tour_task());
        assert_eq!(service.task_type(), TaskType::FreightService);
    }

    #[test]
    fn shifted_keeps_duration() {
        let t = Task::dropoff(SimTime(330), 60, LinkId(3), RequestId(1)).shifted_to(SimTime(500));
        assert_eq!((t.begin(), t.end()), (SimTime(500), SimTime(560)));
    }

    #[test]
    fn display() {
        let t = Task::stay(SimTime(0), SimTime(61), LinkId(4));
        assert_eq!(t.to_string(), "STAY[00:00:00, 00:01:01] PLANNED @ LinkId(4)");
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use super::*;
    use crate::{ScheduleError, ScheduleStatus, TaskStatus, TaskType};

    #[test]
    fn append_requires_continuity() {
        let mut s = Schedule::with_stay(V, LinkId(1), SimTime(0), SimTime(100));
        let err = s.append(Task::stay(SimTime(101), SimTime(200), LinkId(1))).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Discontinuity { expected: SimTime(100), found: SimTime(101) }
        ));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn remove_last_rejects_started_task() {
        let mut s = Schedule::with_stay(V, LinkId(1), SimTime(0), SimTime(100));
        s.start().unwrap();
        let err = s.remove_last().unwrap_err();
        assert!(matches!(err, ScheduleError::NotPlanned { index: 0, status: TaskStatus::Started }));

        let mut empty = Schedule::new(V);
        assert!(matches!(empty.remove_last(), Err(ScheduleError::Empty)));
    }

    #[test]
    fn current_task_before_and_after_start() {
        let mut s = Schedule::with_stay(V, LinkId(1), SimTime(0), SimTime(100));
        s.append(Task::empty_drive(SimTime(100), path(1, 2, 100, 50))).unwrap();
        assert_eq!(s.current_index(), Some(0));
        assert_eq!(s.current_task().map(Task::status), Some(TaskStatus::Planned));

        s.start().unwrap();
        assert_eq!(s.current_task().map(Task::status), Some(TaskStatus::Started));
        assert_eq!(s.next_task().map(Task::task_type), Some(TaskType::EmptyDrive));
        assert!(s.previous_task().is_none());
    }

    #[test]
    fn advance_walks_to_completion() {
        let mut s = trip_schedule();
        for expected in 1..7 {
            assert_eq!(s.advance().unwrap(), Some(expected));
            s.validate().unwrap();
        }
        assert_eq!(s.advance().unwrap(), None);
        assert_eq!(s.status(), ScheduleStatus::Completed);
        assert!(s.current_task().is_none());
        assert!(s.tasks().iter().all(|t| t.status() == TaskStatus::Performed));
        s.validate().unwrap();
    }

    #[test]
    fn start_rejects_empty_schedule() {
        let mut s = Schedule::new(V);
        assert!(matches!(s.start(), Err(ScheduleError::Empty)));
    }

    #[test]
    fn truncate_last_stay() {
        let mut s = Schedule::with_stay(V, LinkId(1), SimTime(0), SimTime(1000));
        s.start().unwrap();
        s.truncate_last_stay(SimTime(100)).unwrap();
        assert_eq!(s.end_time(), Some(SimTime(100)));
        assert!(s.truncate_last_stay(SimTime(0)).is_ok());
    }

    #[test]
    fn replace_tail_swaps_suffix() {
        let mut s = trip_schedule();
        let suffix = vec![Task::stay(SimTime(390), SimTime(900), LinkId(3))];
        let removed = s.replace_tail(4, suffix).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(s.len(), 5);
        assert_eq!(s.end_time(), Some(SimTime(900)));
        assert!(s.ends_with_stay());
        s.validate().unwrap();
    }

    #[test]
    fn replace_tail_is_all_or_nothing() {
        let mut s = trip_schedule();
        let before = s.clone();

        // Second task of the suffix does not continue the first.
        let broken = vec![
            Task::stay(SimTime(390), SimTime(500), LinkId(3)),
            Task::stay(SimTime(501), SimTime(600), LinkId(3)),
        ];
        assert!(matches!(s.replace_tail(4, broken), Err(ScheduleError::Discontinuity { .. })));
        assert_eq!(s, before);

        // Removing the STARTED task is not allowed.
        let suffix = vec![Task::stay(SimTime(0), SimTime(600), LinkId(1))];
        assert!(matches!(s.replace_tail(0, suffix), Err(ScheduleError::NotPlanned { .. })));
        assert_eq!(s, before);

        assert!(matches!(
            s.replace_tail(8, Vec::new()),
            Err(ScheduleError::TailOutOfRange { keep: 8, len: 7 })
        ));
    }

    #[test]
    fn validate_detects_broken_layout() {
        let mut s = trip_schedule();
        s.tasks[3].status = TaskStatus::Performed;
        assert!(matches!(s.validate(), Err(ScheduleError::StatusLayout { index: 3, .. })));
    }
}

// ── Obligations ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod obligation {
    use super::*;
    use crate::{Obligation, ObligationStack};

    #[test]
    fn lifo_order() {
        let mut stack = ObligationStack::new();
        stack.push(Obligation::new(LinkId(1), SimTime(1000)));
        stack.push(Obligation::new(LinkId(2), SimTime(500)));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek().map(|o| o.deadline), Some(SimTime(500)));
        assert_eq!(stack.pop().and_then(|o| o.link), Some(LinkId(2)));
        assert_eq!(stack.pop().and_then(|o| o.link), Some(LinkId(1)));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn admits_checks_top_deadline() {
        let mut stack = ObligationStack::new();
        assert!(stack.admits(SimTime(0), u64::MAX));

        stack.push(Obligation::new(LinkId(1), SimTime(36_000)));
        assert!(stack.admits(SimTime(30_000), 6_000));
        assert!(!stack.admits(SimTime(30_000), 6_001));
    }

    #[test]
    fn display() {
        let o = Obligation::new(LinkId(4), SimTime::hms(17, 30, 0));
        assert_eq!(o.to_string(), "LinkId(4) by 17:30:00");
        let unknown = Obligation { link: None, deadline: SimTime(0) };
        assert_eq!(unknown.to_string(), "<unknown link> by 00:00:00");
    }
}

// ── Timeline repair ───────────────────────────────────────────────────────────

#[cfg(test)]
mod timeline {
    use super::*;
    use crate::{
        ScheduleError, TaskType, predict_end_time, repair_from_current, update_timeline,
    };

    const SERVICE_END: SimTime = SimTime(600);

    #[test]
    fn delay_shifts_downstream_and_drops_overtaken_stay() {
        let mut s = trip_schedule();
        let report = repair_from_current(&mut s, SimTime(150), SERVICE_END).unwrap();

        let spans: Vec<_> = s
            .tasks()
            .iter()
            .map(|t| (t.task_type(), t.begin().0, t.end().0))
            .collect();
        assert_eq!(spans, vec![
            (TaskType::EmptyDrive, 0, 150),
            (TaskType::Pickup, 150, 180),
            (TaskType::OccupiedDrive, 180, 380),
            (TaskType::Dropoff, 380, 440),
            (TaskType::EmptyDrive, 440, 540),
            (TaskType::Stay, 540, 600),
        ]);
        assert_eq!(report.removed, 1);
        s.validate().unwrap();
    }

    #[test]
    fn early_finish_pulls_tasks_forward_but_pickup_waits() {
        let mut s = Schedule::new(V);
        let r = RequestId(3);
        s.append(Task::empty_drive(SimTime(0), path(1, 2, 0, 100))).unwrap();
        s.append(Task::pickup(SimTime(100), LinkId(2), r, SimTime(100), 30)).unwrap();
        s.append(Task::stay(SimTime(130), SimTime(130), LinkId(2))).unwrap();
        s.start().unwrap();

        repair_from_current(&mut s, SimTime(80), SimTime::ZERO).unwrap();
        let pickup = &s.tasks()[1];
        assert_eq!((pickup.begin(), pickup.end()), (SimTime(80), SimTime(130)));
        assert_eq!(s.end_time(), Some(SimTime(130)));
    }

    #[test]
    fn last_stay_never_ends_before_service_end() {
        let mut s = trip_schedule();
        repair_from_current(&mut s, SimTime(20), SimTime(2_000)).unwrap();
        assert_eq!(s.end_time(), Some(SimTime(2_000)));

        let mut late = trip_schedule();
        repair_from_current(&mut late, SimTime(3_000), SimTime(2_000)).unwrap();
        let last = late.last_task().unwrap();
        assert_eq!(last.begin(), last.end());
    }

    #[test]
    fn repair_is_idempotent() {
        let mut s = trip_schedule();
        update_timeline(&mut s, SimTime(150), SERVICE_END).unwrap();
        let once = s.clone();
        let report = update_timeline(&mut s, SimTime(150), SERVICE_END).unwrap();
        assert!(report.is_noop());
        assert_eq!(s, once);
    }

    #[test]
    fn on_time_task_is_left_alone() {
        let mut s = trip_schedule();
        let before = s.clone();
        let report = update_timeline(&mut s, SimTime(60), SERVICE_END).unwrap();
        assert!(report.is_noop());
        assert_eq!(s, before);
        assert_eq!(predict_end_time(&s.tasks()[0], SimTime(60)), SimTime(100));
    }

    #[test]
    fn unstarted_schedule_is_not_repaired() {
        let mut s = Schedule::with_stay(V, LinkId(1), SimTime(0), SimTime(100));
        let report = update_timeline(&mut s, SimTime(500), SimTime::ZERO).unwrap();
        assert!(report.is_noop());
        assert!(matches!(
            repair_from_current(&mut s, SimTime(500), SimTime::ZERO),
            Err(ScheduleError::WrongStatus { .. })
        ));
    }

    #[test]
    fn end_before_begin_is_rejected() {
        let mut s = trip_schedule();
        s.advance().unwrap();
        let before = s.clone();
        let err = repair_from_current(&mut s, SimTime(50), SERVICE_END).unwrap_err();
        assert!(matches!(err, ScheduleError::TimelineViolation { index: 1, .. }));
        assert_eq!(s, before);
    }
}
