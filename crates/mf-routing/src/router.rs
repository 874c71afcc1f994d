//! Routing trait and the `Path` it returns.
//!
//! # Pluggability
//!
//! The dispatcher calls routing only through [`Router`], so applications can
//! plug in whatever travel-time provider their traffic simulation exposes
//! (time-dependent A*, contraction hierarchies, a recorded matrix) without
//! touching the dispatch core.  [`TravelTimeTable`][crate::TravelTimeTable]
//! is the deterministic reference implementation.
//!
//! # Units
//!
//! Travel times are whole seconds so that drive tasks line up exactly with
//! their neighbours.  Distances are metres.

use mf_core::{LinkId, SimTime};

use crate::RoutingResult;

// ── Path ──────────────────────────────────────────────────────────────────────

/// A path with travel data, fixed at the moment it was computed.
///
/// A drive task owns its `Path`.  When the timeline is repaired the drive is
/// moved in time but `travel_time` never changes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub from:        LinkId,
    pub to:          LinkId,
    /// Departure time the path was computed for.
    pub departure:   SimTime,
    /// Seconds from departure to arrival.
    pub travel_time: u64,
    /// Number of links traversed, including the departure link.  A path
    /// with one link or fewer does not leave its link.
    pub link_count:  u32,
    /// Length of the path in metres.
    pub distance_m:  f64,
}

impl Path {
    /// A zero-length path that stays on `link`.
    pub fn stationary(link: LinkId, departure: SimTime) -> Self {
        Self {
            from: link,
            to: link,
            departure,
            travel_time: 0,
            link_count: 1,
            distance_m: 0.0,
        }
    }

    #[inline]
    pub fn arrival(&self) -> SimTime {
        self.departure + self.travel_time
    }

    /// `true` if the path never leaves its departure link.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.link_count <= 1
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing oracle.
///
/// Calls are synchronous from the dispatcher's point of view.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can be shared by
/// dispatch steps for different vehicles running on separate threads.
pub trait Router: Send + Sync {
    /// Compute a path from `from` to `to` leaving at `departure`.
    ///
    /// `from == to` must yield a trivial path, never an error.
    fn route(&self, from: LinkId, to: LinkId, departure: SimTime) -> RoutingResult<Path>;
}

impl<R: Router + ?Sized> Router for &R {
    fn route(&self, from: LinkId, to: LinkId, departure: SimTime) -> RoutingResult<Path> {
        (**self).route(from, to, departure)
    }
}
