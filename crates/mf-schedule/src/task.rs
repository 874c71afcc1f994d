//! The `Task` record and its kinds.
//!
//! # One record, closed set of kinds
//!
//! Every schedule entry is a [`Task`]: a time span, an execution status, and
//! a [`TaskKind`] carrying the kind-specific payload.  `TaskKind` is a closed
//! enum and both the timeline repair pass and the dispatcher match on it
//! exhaustively, so adding a kind forces both to decide what it means.
//!
//! # Drives
//!
//! Drive tasks own the [`Path`] they were routed on.  Their duration is the
//! path's travel time: they can be moved in time but never resized.
//!
//! | Drive                      | Kind           | Load                 |
//! |----------------------------|----------------|----------------------|
//! | to a passenger's origin    | `EmptyDrive`   | —                    |
//! | passenger trip             | `OccupiedDrive`| `Passenger(request)` |
//! | access drive to a depot    | `EmptyDrive`   | —                    |
//! | leg towards a freight stop | `OccupiedDrive`| `Freight`            |
//! | last stop → closing depot  | `EmptyDrive`   | —                    |
//! | return drive to the owner  | `EmptyDrive`   | —                    |

use std::fmt;

use mf_core::{LinkId, RequestId, ServiceId, SimTime};
use mf_routing::Path;

// ── Status ────────────────────────────────────────────────────────────────────

/// Execution status of a single task.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskStatus {
    Planned,
    Started,
    Performed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskStatus::Planned   => "PLANNED",
            TaskStatus::Started   => "STARTED",
            TaskStatus::Performed => "PERFORMED",
        })
    }
}

// ── Type discriminant ─────────────────────────────────────────────────────────

/// Fieldless discriminant of [`TaskKind`], for logging and cheap matching.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskType {
    Stay,
    EmptyDrive,
    OccupiedDrive,
    Pickup,
    Dropoff,
    Retool,
    FreightService,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskType::Stay           => "STAY",
            TaskType::EmptyDrive     => "EMPTY_DRIVE",
            TaskType::OccupiedDrive  => "OCCUPIED_DRIVE",
            TaskType::Pickup         => "PICKUP",
            TaskType::Dropoff        => "DROPOFF",
            TaskType::Retool         => "RETOOL",
            TaskType::FreightService => "FREIGHT_SERVICE",
        })
    }
}

// ── Kind ──────────────────────────────────────────────────────────────────────

/// What an occupied drive is carrying.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Load {
    Passenger(RequestId),
    Freight,
}

/// Kind-specific payload of a [`Task`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskKind {
    /// Waiting on `link`.
    Stay { link: LinkId },

    /// Driving without passenger or freight.
    EmptyDrive { path: Path },

    /// Driving with a passenger on board or freight loaded.
    OccupiedDrive { path: Path, load: Load },

    /// Boarding a passenger.  Boarding never starts before `earliest_start`
    /// and always takes `duration` seconds.
    Pickup {
        link:           LinkId,
        request:        RequestId,
        earliest_start: SimTime,
        duration:       u64,
    },

    /// Passenger alighting.
    Dropoff { link: LinkId, request: RequestId },

    /// Switching between passenger and freight duty.
    Retool { link: LinkId },

    /// Serving one freight stop.
    FreightService {
        link:    LinkId,
        service: ServiceId,
        demand:  u32,
    },
}

impl TaskKind {
    pub fn task_type(&self) -> TaskType {
        match self {
            TaskKind::Stay { .. }           => TaskType::Stay,
            TaskKind::EmptyDrive { .. }     => TaskType::EmptyDrive,
            TaskKind::OccupiedDrive { .. }  => TaskType::OccupiedDrive,
            TaskKind::Pickup { .. }         => TaskType::Pickup,
            TaskKind::Dropoff { .. }        => TaskType::Dropoff,
            TaskKind::Retool { .. }         => TaskType::Retool,
            TaskKind::FreightService { .. } => TaskType::FreightService,
        }
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// One entry in a vehicle's schedule.
///
/// New tasks are always `Planned`; only [`Schedule`][crate::Schedule] moves
/// them through `Started` and `Performed`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub(crate) begin:  SimTime,
    pub(crate) end:    SimTime,
    pub(crate) status: TaskStatus,
    pub(crate) kind:   TaskKind,
}

impl Task {
    fn planned(begin: SimTime, end: SimTime, kind: TaskKind) -> Self {
        debug_assert!(begin <= end, "task ends before it begins");
        Self { begin, end, status: TaskStatus::Planned, kind }
    }

    // ── Constructors ──────────────────────────────────────────────────────

    pub fn stay(begin: SimTime, end: SimTime, link: LinkId) -> Self {
        Self::planned(begin, end, TaskKind::Stay { link })
    }

    /// An empty drive along `path`, starting at `begin`.
    pub fn empty_drive(begin: SimTime, path: Path) -> Self {
        let end = begin + path.travel_time;
        Self::planned(begin, end, TaskKind::EmptyDrive { path })
    }

    /// An occupied drive along `path`, starting at `begin`.
    pub fn occupied_drive(begin: SimTime, path: Path, load: Load) -> Self {
        let end = begin + path.travel_time;
        Self::planned(begin, end, TaskKind::OccupiedDrive { path, load })
    }

    /// A pickup beginning on arrival; boarding waits for `earliest_start`.
    pub fn pickup(
        arrival:        SimTime,
        link:           LinkId,
        request:        RequestId,
        earliest_start: SimTime,
        duration:       u64,
    ) -> Self {
        let end = arrival.max(earliest_start) + duration;
        Self::planned(arrival, end, TaskKind::Pickup { link, request, earliest_start, duration })
    }

    pub fn dropoff(begin: SimTime, duration: u64, link: LinkId, request: RequestId) -> Self {
        Self::planned(begin, begin + duration, TaskKind::Dropoff { link, request })
    }

    pub fn retool(begin: SimTime, end: SimTime, link: LinkId) -> Self {
        Self::planned(begin, end, TaskKind::Retool { link })
    }

    pub fn freight_service(
        begin:   SimTime,
        end:     SimTime,
        link:    LinkId,
        service: ServiceId,
        demand:  u32,
    ) -> Self {
        Self::planned(begin, end, TaskKind::FreightService { link, service, demand })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn begin(&self) -> SimTime {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> SimTime {
        self.end
    }

    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.begin
    }

    #[inline]
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    #[inline]
    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    #[inline]
    pub fn task_type(&self) -> TaskType {
        self.kind.task_type()
    }

    /// The drive path, if this is a drive.
    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            TaskKind::EmptyDrive { path } | TaskKind::OccupiedDrive { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Link where the task begins.
    pub fn start_link(&self) -> LinkId {
        match &self.kind {
            TaskKind::EmptyDrive { path } | TaskKind::OccupiedDrive { path, .. } => path.from,
            _ => self.end_link(),
        }
    }

    /// Link where the task leaves the vehicle.
    pub fn end_link(&self) -> LinkId {
        match &self.kind {
            TaskKind::Stay { link }
            | TaskKind::Pickup { link, .. }
            | TaskKind::Dropoff { link, .. }
            | TaskKind::Retool { link }
            | TaskKind::FreightService { link, .. } => *link,
            TaskKind::EmptyDrive { path } | TaskKind::OccupiedDrive { path, .. } => path.to,
        }
    }

    /// `true` for the tasks a converted freight tour consists of.
    #[inline]
    pub fn is_tour_task(&self) -> bool {
        matches!(self.kind, TaskKind::Retool { .. } | TaskKind::FreightService { .. })
    }

    /// The same task moved to start at `begin`, duration unchanged.
    pub fn shifted_to(&self, begin: SimTime) -> Task {
        let mut task = self.clone();
        task.end = begin + self.duration();
        task.begin = begin;
        task
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}, {}] {} @ {}",
            self.task_type(),
            self.begin,
            self.end,
            self.status,
            self.end_link()
        )
    }
}
