//! The per-vehicle `Schedule`.
//!
//! # Layout
//!
//! ```text
//! index:   0 .. current-1      current      current+1 .. len-1
//! status:  PERFORMED           STARTED      PLANNED
//! ```
//!
//! Before the schedule starts every task is `Planned` and the "current" task
//! is the first one.  After the last task is performed the schedule is
//! `Completed` and has no current task.
//!
//! # Mutation
//!
//! Single tasks go through [`Schedule::append`] and [`Schedule::remove_last`].
//! Anything larger goes through [`Schedule::replace_tail`], which validates
//! the whole replacement before touching the task list, so no caller can
//! observe (or leave behind) a half-rebuilt schedule.

use std::fmt;

use mf_core::{LinkId, SimTime, VehicleId};

use crate::{ScheduleError, ScheduleResult, Task, TaskKind, TaskStatus, TaskType};

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleStatus {
    Planned,
    Started,
    Completed,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleStatus::Planned   => "PLANNED",
            ScheduleStatus::Started   => "STARTED",
            ScheduleStatus::Completed => "COMPLETED",
        })
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

/// Ordered, continuous task list for one vehicle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    vehicle: VehicleId,
    pub(crate) tasks: Vec<Task>,
    /// Index of the STARTED task; `None` unless `status == Started`.
    pub(crate) current: Option<usize>,
    status: ScheduleStatus,
}

impl Schedule {
    /// An empty, not yet started schedule.
    pub fn new(vehicle: VehicleId) -> Self {
        Self {
            vehicle,
            tasks: Vec::new(),
            current: None,
            status: ScheduleStatus::Planned,
        }
    }

    /// A schedule whose only task is a STAY on `link` over `[begin, end]`.
    pub fn with_stay(vehicle: VehicleId, link: LinkId, begin: SimTime, end: SimTime) -> Self {
        let mut schedule = Self::new(vehicle);
        schedule.tasks.push(Task::stay(begin, end, link));
        schedule
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    #[inline]
    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    #[inline]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Index of the current task: the STARTED one, or the first task while
    /// the schedule has not started yet.
    pub fn current_index(&self) -> Option<usize> {
        match self.status {
            ScheduleStatus::Started   => self.current,
            ScheduleStatus::Planned   => (!self.tasks.is_empty()).then_some(0),
            ScheduleStatus::Completed => None,
        }
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current_index().map(|i| &self.tasks[i])
    }

    /// The task immediately before the current one.
    pub fn previous_task(&self) -> Option<&Task> {
        let i = self.current_index()?;
        i.checked_sub(1).map(|p| &self.tasks[p])
    }

    /// The task immediately after the current one.
    pub fn next_task(&self) -> Option<&Task> {
        let i = self.current_index()?;
        self.tasks.get(i + 1)
    }

    pub fn last_task(&self) -> Option<&Task> {
        self.tasks.last()
    }

    /// End time of the last task.
    pub fn end_time(&self) -> Option<SimTime> {
        self.tasks.last().map(Task::end)
    }

    /// Where the vehicle will be once every task is done.
    pub fn last_link(&self) -> Option<LinkId> {
        self.tasks.last().map(Task::end_link)
    }

    /// `true` if the last task is a STAY.
    pub fn ends_with_stay(&self) -> bool {
        matches!(self.tasks.last().map(Task::task_type), Some(TaskType::Stay))
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start executing: the first task becomes STARTED.
    pub fn start(&mut self) -> ScheduleResult<()> {
        self.expect_status(ScheduleStatus::Planned)?;
        let first = self.tasks.first_mut().ok_or(ScheduleError::Empty)?;
        first.status = TaskStatus::Started;
        self.current = Some(0);
        self.status = ScheduleStatus::Started;
        Ok(())
    }

    /// Mark the current task PERFORMED and start the next one.
    ///
    /// Returns the index of the newly started task, or `None` once the
    /// schedule is completed.
    pub fn advance(&mut self) -> ScheduleResult<Option<usize>> {
        self.expect_status(ScheduleStatus::Started)?;
        let i = self.current.ok_or(ScheduleError::Empty)?;
        self.tasks[i].status = TaskStatus::Performed;

        match self.tasks.get_mut(i + 1) {
            Some(next) => {
                next.status = TaskStatus::Started;
                self.current = Some(i + 1);
                Ok(Some(i + 1))
            }
            None => {
                self.current = None;
                self.status = ScheduleStatus::Completed;
                Ok(None)
            }
        }
    }

    // ── Single-task mutation ──────────────────────────────────────────────

    /// Append a PLANNED task that begins exactly where the schedule ends.
    pub fn append(&mut self, task: Task) -> ScheduleResult<()> {
        self.expect_not_completed()?;
        check_task(&task, self.tasks.len())?;
        if let Some(last) = self.tasks.last() {
            if last.end != task.begin {
                return Err(ScheduleError::Discontinuity { expected: last.end, found: task.begin });
            }
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Remove and return the last task, which must still be PLANNED.
    pub fn remove_last(&mut self) -> ScheduleResult<Task> {
        match self.tasks.last() {
            None => Err(ScheduleError::Empty),
            Some(last) if last.status != TaskStatus::Planned => Err(ScheduleError::NotPlanned {
                index:  self.tasks.len() - 1,
                status: last.status,
            }),
            Some(_) => self.tasks.pop().ok_or(ScheduleError::Empty),
        }
    }

    /// Cut the trailing STAY short so that it ends at `at`.
    ///
    /// Works on a STARTED stay as well as a PLANNED one.
    pub fn truncate_last_stay(&mut self, at: SimTime) -> ScheduleResult<()> {
        let index = self.tasks.len().checked_sub(1).ok_or(ScheduleError::Empty)?;
        let last = &mut self.tasks[index];
        if !matches!(last.kind, TaskKind::Stay { .. }) {
            return Err(ScheduleError::StayExpected { found: last.task_type() });
        }
        if last.status == TaskStatus::Performed {
            return Err(ScheduleError::NotPlanned { index, status: last.status });
        }
        if at < last.begin {
            return Err(ScheduleError::NegativeDuration { begin: last.begin, end: at });
        }
        last.end = at;
        Ok(())
    }

    // ── Bulk mutation ─────────────────────────────────────────────────────

    /// Keep the first `keep` tasks and replace everything after them with
    /// `suffix`.
    ///
    /// Every removed task must be PLANNED, and `suffix` must be continuous
    /// with `tasks[keep - 1]` and internally.  Nothing is modified unless all
    /// checks pass.  Returns the removed tasks.
    pub fn replace_tail(&mut self, keep: usize, suffix: Vec<Task>) -> ScheduleResult<Vec<Task>> {
        self.expect_not_completed()?;
        if keep > self.tasks.len() {
            return Err(ScheduleError::TailOutOfRange { keep, len: self.tasks.len() });
        }
        if let Some((offset, t)) = self.tasks[keep..]
            .iter()
            .enumerate()
            .find(|(_, t)| t.status != TaskStatus::Planned)
        {
            return Err(ScheduleError::NotPlanned { index: keep + offset, status: t.status });
        }

        let mut prev_end = keep.checked_sub(1).map(|i| self.tasks[i].end);
        for (offset, task) in suffix.iter().enumerate() {
            check_task(task, keep + offset)?;
            match prev_end {
                Some(expected) if expected != task.begin => {
                    return Err(ScheduleError::Discontinuity { expected, found: task.begin });
                }
                _ => {}
            }
            prev_end = Some(task.end);
        }

        let removed = self.tasks.split_off(keep);
        self.tasks.extend(suffix);
        Ok(removed)
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check continuity, durations, and the status layout.
    ///
    /// The terminal-STAY rule is checked separately via
    /// [`ends_with_stay`][Self::ends_with_stay] because a destination-unknown
    /// booking legitimately ends in PICKUP until the passenger boards.
    pub fn validate(&self) -> ScheduleResult<()> {
        for (i, task) in self.tasks.iter().enumerate() {
            if task.end < task.begin {
                return Err(ScheduleError::NegativeDuration { begin: task.begin, end: task.end });
            }
            if i > 0 && self.tasks[i - 1].end != task.begin {
                return Err(ScheduleError::Discontinuity {
                    expected: self.tasks[i - 1].end,
                    found:    task.begin,
                });
            }
            let expected = match (self.status, self.current) {
                (ScheduleStatus::Planned, _) => TaskStatus::Planned,
                (ScheduleStatus::Completed, _) => TaskStatus::Performed,
                (ScheduleStatus::Started, Some(c)) if i < c => TaskStatus::Performed,
                (ScheduleStatus::Started, Some(c)) if i == c => TaskStatus::Started,
                (ScheduleStatus::Started, _) => TaskStatus::Planned,
            };
            if task.status != expected {
                return Err(ScheduleError::StatusLayout { index: i, found: task.status });
            }
        }
        Ok(())
    }

    fn expect_not_completed(&self) -> ScheduleResult<()> {
        if self.status == ScheduleStatus::Completed {
            return Err(ScheduleError::WrongStatus {
                expected: ScheduleStatus::Started,
                found:    self.status,
            });
        }
        Ok(())
    }

    fn expect_status(&self, expected: ScheduleStatus) -> ScheduleResult<()> {
        if self.status != expected {
            return Err(ScheduleError::WrongStatus { expected, found: self.status });
        }
        Ok(())
    }
}

fn check_task(task: &Task, index: usize) -> ScheduleResult<()> {
    if task.status != TaskStatus::Planned {
        return Err(ScheduleError::NotPlanned { index, status: task.status });
    }
    if task.end < task.begin {
        return Err(ScheduleError::NegativeDuration { begin: task.begin, end: task.end });
    }
    Ok(())
}
