//! `RequestBook` — pre-booked owner trips waiting for their submission time.
//!
//! Trips are keyed by submission time in a `BTreeMap`, so each step the
//! host only drains what is due instead of scanning every booking.

use std::collections::BTreeMap;

use mf_core::{SimTime, VehicleId};

use crate::PassengerRequest;

/// Submission-time → (vehicle, trip) queue.
#[derive(Debug, Default)]
pub struct RequestBook {
    inner: BTreeMap<SimTime, Vec<(VehicleId, PassengerRequest)>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl RequestBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `request` for `vehicle` under its submission time.
    pub fn push(&mut self, vehicle: VehicleId, request: PassengerRequest) {
        self.inner.entry(request.submission_time).or_default().push((vehicle, request));
        self.total += 1;
    }

    /// Remove and return every trip submitted at or before `now`, in
    /// submission order.
    pub fn drain_due(&mut self, now: SimTime) -> Vec<(VehicleId, PassengerRequest)> {
        let later = match now.0.checked_add(1) {
            Some(next) => self.inner.split_off(&SimTime(next)),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, later);
        let due: Vec<_> = due.into_values().flatten().collect();
        self.total -= due.len();
        due
    }

    /// The earliest pending submission time.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
