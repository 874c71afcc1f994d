//! CSV tour loader.
//!
//! # CSV format
//!
//! One row per service stop.  Rows of the same tour must be contiguous, in
//! stop order, and agree on the tour-level columns.
//!
//! ```csv
//! tour_id,depot,end_location,departure,final_departure,service_id,location,arrival_offset,service_duration,demand
//! 0,10,10,28800,30600,0,21,0,300,2
//! 0,10,10,28800,30600,1,22,500,300,1
//! 1,11,11,32400,33600,2,23,600,240,4
//! ```
//!
//! Times are seconds since midnight; `arrival_offset` is seconds after
//! `departure`.  Tours come back in file order.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use mf_core::{LinkId, ServiceId, SimTime, TourId};

use crate::{FreightError, FreightResult, FreightTourPlan, TourStop};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TourRecord {
    tour_id:          u32,
    depot:            u32,
    end_location:     u32,
    departure:        u64,
    final_departure:  u64,
    service_id:       u32,
    location:         u32,
    arrival_offset:   u64,
    service_duration: u64,
    demand:           u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load freight tour plans from a CSV file.
pub fn load_tours_csv(path: &Path) -> FreightResult<Vec<FreightTourPlan>> {
    let file = std::fs::File::open(path).map_err(FreightError::Io)?;
    load_tours_reader(file)
}

/// Like [`load_tours_csv`] but accepts any `Read` source.
pub fn load_tours_reader<R: Read>(reader: R) -> FreightResult<Vec<FreightTourPlan>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tours: Vec<FreightTourPlan> = Vec::new();
    let mut index: HashMap<u32, usize> = HashMap::new();

    for result in csv_reader.deserialize::<TourRecord>() {
        let row = result.map_err(|e| FreightError::Parse(e.to_string()))?;
        let stop = TourStop {
            service:          ServiceId(row.service_id),
            location:         LinkId(row.location),
            arrival_offset:   row.arrival_offset,
            service_duration: row.service_duration,
            demand:           row.demand,
        };

        match index.get(&row.tour_id) {
            Some(&i) if i + 1 != tours.len() => {
                return Err(FreightError::Parse(format!(
                    "rows of tour {} are not contiguous",
                    row.tour_id
                )));
            }
            Some(&i) => {
                let tour = &mut tours[i];
                if tour.depot != LinkId(row.depot)
                    || tour.end_location != LinkId(row.end_location)
                    || tour.departure != SimTime(row.departure)
                    || tour.final_departure != SimTime(row.final_departure)
                {
                    return Err(FreightError::Parse(format!(
                        "tour {} has conflicting tour-level columns",
                        row.tour_id
                    )));
                }
                tour.stops.push(stop);
            }
            None => {
                index.insert(row.tour_id, tours.len());
                tours.push(FreightTourPlan {
                    id:              TourId(row.tour_id),
                    depot:           LinkId(row.depot),
                    end_location:    LinkId(row.end_location),
                    departure:       SimTime(row.departure),
                    final_departure: SimTime(row.final_departure),
                    stops:           vec![stop],
                });
            }
        }
    }

    Ok(tours)
}
