//! `TravelTimeTable` — a lookup-table router.
//!
//! Holds one free-flow entry per ordered link pair plus optional slowdown
//! windows.  A departure inside a window scales the free-flow travel time by
//! the window's percentage, which is enough to make "plan-time" and "live"
//! travel times differ in tests and demos.

use rustc_hash::FxHashMap;

use mf_core::{LinkId, SimTime};

use crate::{Path, Router, RoutingError, RoutingResult};

#[derive(Debug, Clone, Copy)]
struct Leg {
    travel_time: u64,
    distance_m:  f64,
    link_count:  u32,
}

#[derive(Debug, Clone, Copy)]
struct Slowdown {
    from:    SimTime,
    until:   SimTime,
    percent: u64,
}

/// Deterministic [`Router`] backed by a `(from, to) → leg` table.
#[derive(Debug, Clone, Default)]
pub struct TravelTimeTable {
    legs:      FxHashMap<(LinkId, LinkId), Leg>,
    slowdowns: Vec<Slowdown>,
}

impl TravelTimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-way leg.  Re-inserting a pair overwrites it.
    pub fn insert(
        &mut self,
        from:        LinkId,
        to:          LinkId,
        travel_time: u64,
        distance_m:  f64,
        link_count:  u32,
    ) -> &mut Self {
        self.legs.insert((from, to), Leg { travel_time, distance_m, link_count });
        self
    }

    /// Register the same leg in both directions.
    pub fn insert_both(
        &mut self,
        a:           LinkId,
        b:           LinkId,
        travel_time: u64,
        distance_m:  f64,
        link_count:  u32,
    ) -> &mut Self {
        self.insert(a, b, travel_time, distance_m, link_count);
        self.insert(b, a, travel_time, distance_m, link_count)
    }

    /// Departures in `[from, until)` take `percent`% of free-flow time
    /// (e.g. 150 for a 50 % slowdown).  The first matching window wins.
    pub fn slowdown(&mut self, from: SimTime, until: SimTime, percent: u64) -> &mut Self {
        self.slowdowns.push(Slowdown { from, until, percent });
        self
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    fn percent_at(&self, departure: SimTime) -> u64 {
        self.slowdowns
            .iter()
            .find(|w| w.from <= departure && departure < w.until)
            .map_or(100, |w| w.percent)
    }
}

impl Router for TravelTimeTable {
    fn route(&self, from: LinkId, to: LinkId, departure: SimTime) -> RoutingResult<Path> {
        if from == LinkId::INVALID {
            return Err(RoutingError::UnknownLink(from));
        }
        if to == LinkId::INVALID {
            return Err(RoutingError::UnknownLink(to));
        }
        if from == to {
            return Ok(Path::stationary(from, departure));
        }
        let leg = self
            .legs
            .get(&(from, to))
            .ok_or(RoutingError::NoRoute { from, to })?;

        // Integer percentage keeps travel times in whole seconds.
        let travel_time = leg.travel_time * self.percent_at(departure) / 100;
        Ok(Path {
            from,
            to,
            departure,
            travel_time,
            link_count: leg.link_count,
            distance_m: leg.distance_m,
        })
    }
}
