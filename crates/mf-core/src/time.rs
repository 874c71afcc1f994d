//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer count of simulated seconds since the start of the
//! simulated day (`SimTime`).  Schedules rely on exact equality between one
//! task's end and the next task's begin, so all arithmetic stays in integers:
//! no floating-point drift can ever break continuity.
//!
//! Durations are plain `u64` seconds.  `SimTime - SimTime` yields a `u64`
//! and panics in debug builds if the operands are out of order; use
//! [`SimTime::checked_sub_secs`] where an underflow is a domain error rather
//! than a bug.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation time in seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// End of representable time; used as "no deadline".
    pub const MAX: SimTime = SimTime(u64::MAX);

    /// Build a time from hours, minutes and seconds after midnight.
    #[inline]
    pub const fn hms(h: u64, m: u64, s: u64) -> SimTime {
        SimTime(h * 3_600 + m * 60 + s)
    }

    /// Seconds elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0 - earlier.0
    }

    /// `self - secs`, or `None` if that would fall before time zero.
    #[inline]
    pub fn checked_sub_secs(self, secs: u64) -> Option<SimTime> {
        self.0.checked_sub(secs).map(SimTime)
    }

    /// `self + secs`, or `None` if that would overflow.
    #[inline]
    pub fn checked_add_secs(self, secs: u64) -> Option<SimTime> {
        self.0.checked_add(secs).map(SimTime)
    }

    /// `self + secs`, clamped at [`SimTime::MAX`].
    #[inline]
    pub fn saturating_add(self, secs: u64) -> SimTime {
        SimTime(self.0.saturating_add(secs))
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u64> for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    /// `hh:mm:ss`; hours keep counting past 24 on multi-day runs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3_600;
        let m = (self.0 % 3_600) / 60;
        let s = self.0 % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation's notion of "now".
///
/// The host loop advances it from one task-completion event to the next.
/// Events for one vehicle arrive in non-decreasing time order, so the clock
/// refuses to move backwards.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new(start: SimTime) -> Self {
        Self { now: start }
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock to `t`.  Staying at the same time is allowed.
    pub fn advance_to(&mut self, t: SimTime) -> CoreResult<()> {
        if t < self.now {
            return Err(CoreError::ClockRewind { now: self.now, requested: t });
        }
        self.now = t;
        Ok(())
    }

    /// Move the clock forward by `secs` seconds.
    #[inline]
    pub fn advance_by(&mut self, secs: u64) {
        self.now += secs;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "now={}", self.now)
    }
}
