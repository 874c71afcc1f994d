//! Synthetic road network for the owner-day demo.
//!
//! Every link sits at a point on a flat plane (metres).  Legs between any two
//! links are the straight-line distance stretched by a detour factor, driven
//! at a fixed urban speed.

use mf_core::{LinkId, SimTime};
use mf_routing::TravelTimeTable;

const SPEED_MPS:       f64 = 10.0;  // ~36 km/h
const DETOUR_FACTOR:   f64 = 1.3;
const METRES_PER_LINK: f64 = 400.0;

// ── Places ────────────────────────────────────────────────────────────────────

pub const HOMES:  [LinkId; 4] = [LinkId(1), LinkId(2), LinkId(3), LinkId(4)];
pub const WORK:   [LinkId; 4] = [LinkId(11), LinkId(12), LinkId(13), LinkId(14)];

/// `(link, x, y)` for every link the demo drives to.
const POSITIONS: &[(u32, f64, f64)] = &[
    // homes
    (1,   -4_000.0,  3_000.0),
    (2,   -3_500.0, -2_500.0),
    (3,    2_000.0,  4_500.0),
    (4,    5_500.0, -3_000.0),
    // workplaces
    (11,   1_000.0,    500.0),
    (12,   1_500.0,   -800.0),
    (13,  -1_200.0,    900.0),
    (14,   3_000.0,  1_200.0),
    // depots
    (100,    0.0,       0.0),
    (101,  6_000.0,  2_000.0),
    // customers
    (201, -2_000.0,  1_500.0),
    (202, -1_000.0, -3_000.0),
    (203,  1_500.0,  3_000.0),
    (204,  7_500.0,  4_000.0),
    (205,  8_000.0,    500.0),
    (206,  4_500.0, -1_500.0),
    (207,  2_500.0, -2_500.0),
    (208, -3_000.0,      0.0),
];

/// Build the complete travel-time table, with rush-hour slowdowns.
pub fn build_table() -> TravelTimeTable {
    let mut table = TravelTimeTable::new();

    for &(a, ax, ay) in POSITIONS {
        for &(b, bx, by) in POSITIONS {
            if a == b {
                continue;
            }
            let distance = (ax - bx).hypot(ay - by) * DETOUR_FACTOR;
            let travel_time = (distance / SPEED_MPS).round() as u64;
            let link_count = 1 + (distance / METRES_PER_LINK) as u32;
            table.insert(LinkId(a), LinkId(b), travel_time, distance, link_count);
        }
    }

    table
        .slowdown(SimTime::hms(7, 30, 0), SimTime::hms(9, 0, 0), 140)
        .slowdown(SimTime::hms(16, 30, 0), SimTime::hms(18, 0, 0), 150);
    table
}
