use thiserror::Error;

use mf_core::SimTime;

use crate::{ScheduleStatus, TaskStatus, TaskType};

/// Schedule invariant violations.
///
/// None of these are recoverable: a caller that receives one must abort the
/// vehicle's step rather than commit the schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule is empty")]
    Empty,

    #[error("task must begin at {expected} to continue the schedule, begins at {found}")]
    Discontinuity { expected: SimTime, found: SimTime },

    #[error("task ends at {end} before it begins at {begin}")]
    NegativeDuration { begin: SimTime, end: SimTime },

    #[error("task {index} is {status}, only PLANNED tasks may be added or removed")]
    NotPlanned { index: usize, status: TaskStatus },

    #[error("operation requires a {expected} schedule, schedule is {found}")]
    WrongStatus { expected: ScheduleStatus, found: ScheduleStatus },

    #[error("task {index} has status {found}, status layout is broken")]
    StatusLayout { index: usize, found: TaskStatus },

    #[error("expected a STAY task, found {found}")]
    StayExpected { found: TaskType },

    #[error("timeline repair computed end {end} before begin {begin} for task {index}")]
    TimelineViolation { index: usize, begin: SimTime, end: SimTime },

    #[error("cannot keep {keep} tasks of {len}")]
    TailOutOfRange { keep: usize, len: usize },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
