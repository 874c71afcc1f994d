//! Timeline repair.
//!
//! Tasks rarely finish exactly on time.  When the current task's end moves,
//! every PLANNED task after it is re-anchored so that the schedule stays
//! continuous:
//!
//! | Task               | New end                                        |
//! |--------------------|------------------------------------------------|
//! | STAY, last         | `max(next_begin, service_end)`                 |
//! | STAY, not last     | original end, or deleted if `end ≤ next_begin` |
//! | EMPTY/OCCUPIED     | `next_begin + path.travel_time`                |
//! | PICKUP             | `max(next_begin, earliest_start) + duration`   |
//! | DROPOFF/RETOOL/... | `next_begin + (end − begin)`                   |
//!
//! The new suffix is computed into a scratch vector and only committed once
//! every task has been placed, so a failing repair leaves the schedule as it
//! was.

use mf_core::SimTime;
use tracing::debug;

use crate::{Schedule, ScheduleError, ScheduleResult, ScheduleStatus, Task, TaskKind};

/// What a repair pass changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Tasks whose begin or end moved.
    pub shifted: usize,
    /// Overtaken STAY tasks that were dropped.
    pub removed: usize,
}

impl RepairReport {
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.shifted == 0 && self.removed == 0
    }
}

/// Offline prediction of when `task` will end, given that it has not ended
/// by `now`.
#[inline]
pub fn predict_end_time(task: &Task, now: SimTime) -> SimTime {
    task.end.max(now)
}

/// Bring a STARTED schedule in line with the clock.
///
/// Does nothing for schedules that are not STARTED, or when the current task
/// is still predicted to end on time.
pub fn update_timeline(
    schedule: &mut Schedule,
    now: SimTime,
    service_end: SimTime,
) -> ScheduleResult<RepairReport> {
    if schedule.status() != ScheduleStatus::Started {
        return Ok(RepairReport::default());
    }
    let Some(current) = schedule.current_task() else {
        return Ok(RepairReport::default());
    };
    let predicted = predict_end_time(current, now);
    repair_from_current(schedule, predicted, service_end)
}

/// Set the current task's end to `new_end` and re-anchor everything after it.
pub fn repair_from_current(
    schedule: &mut Schedule,
    new_end: SimTime,
    service_end: SimTime,
) -> ScheduleResult<RepairReport> {
    if schedule.status() != ScheduleStatus::Started {
        return Err(ScheduleError::WrongStatus {
            expected: ScheduleStatus::Started,
            found:    schedule.status(),
        });
    }
    let current = schedule.current.ok_or(ScheduleError::Empty)?;
    let cur = &schedule.tasks[current];
    if cur.end == new_end {
        return Ok(RepairReport::default());
    }
    if new_end < cur.begin {
        return Err(ScheduleError::TimelineViolation { index: current, begin: cur.begin, end: new_end });
    }

    let mut report = RepairReport { shifted: 1, removed: 0 };
    let following = &schedule.tasks[current + 1..];
    let last = following.len().checked_sub(1);
    let mut suffix: Vec<Task> = Vec::with_capacity(following.len());
    let mut next_begin = new_end;

    for (offset, task) in following.iter().enumerate() {
        let index = current + 1 + offset;
        let end = match &task.kind {
            TaskKind::Stay { .. } if Some(offset) == last => next_begin.max(service_end),
            TaskKind::Stay { .. } => {
                if task.end <= next_begin {
                    report.removed += 1;
                    continue;
                }
                task.end
            }
            TaskKind::EmptyDrive { path } | TaskKind::OccupiedDrive { path, .. } => {
                next_begin + path.travel_time
            }
            TaskKind::Pickup { earliest_start, duration, .. } => {
                next_begin.max(*earliest_start) + *duration
            }
            TaskKind::Dropoff { .. } | TaskKind::Retool { .. } | TaskKind::FreightService { .. } => {
                next_begin + task.duration()
            }
        };
        if end < next_begin {
            return Err(ScheduleError::TimelineViolation { index, begin: next_begin, end });
        }

        let mut repaired = task.clone();
        if repaired.begin != next_begin || repaired.end != end {
            report.shifted += 1;
        }
        repaired.begin = next_begin;
        repaired.end = end;
        next_begin = end;
        suffix.push(repaired);
    }

    schedule.tasks[current].end = new_end;
    schedule.tasks.truncate(current + 1);
    schedule.tasks.extend(suffix);

    debug!(
        vehicle = %schedule.vehicle(),
        new_end = %new_end,
        shifted = report.shifted,
        removed = report.removed,
        "timeline repaired"
    );
    Ok(report)
}
