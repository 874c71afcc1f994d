//! `mf-schedule` — vehicle schedules, obligations, and timeline repair.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`task`]       | `Task`, `TaskKind`, `TaskType`, `TaskStatus`, `Load`       |
//! | [`schedule`]   | `Schedule`, `ScheduleStatus`                               |
//! | [`obligation`] | `Obligation`, `ObligationStack`                            |
//! | [`timeline`]   | `update_timeline`, `repair_from_current`, `RepairReport`   |
//! | [`error`]      | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Schedule model (summary)
//!
//! A vehicle's schedule is an ordered list of tasks laid end to end:
//!
//! ```text
//! task[i].end == task[i + 1].begin          (continuity)
//! PERFORMED* STARTED? PLANNED*              (status layout)
//! ... STAY                                  (terminal stay)
//! ```
//!
//! Only the dispatcher and the timeline repair pass mutate a schedule, and
//! every multi-task mutation is staged off to the side and swapped in whole.

pub mod error;
pub mod obligation;
pub mod schedule;
pub mod task;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use obligation::{Obligation, ObligationStack};
pub use schedule::{Schedule, ScheduleStatus};
pub use task::{Load, Task, TaskKind, TaskStatus, TaskType};
pub use timeline::{RepairReport, predict_end_time, repair_from_current, update_timeline};
