//! owner-day — one service day of a small mixed-duty fleet.
//!
//! Four privately owned vehicles commute their owners to work in the morning
//! and home in the evening.  Between those trips the dispatcher fills the
//! idle hours with freight tours from an embedded tour list, always bringing
//! the vehicle back to its owner in time.
//!
//! Drives are randomly delayed to exercise the timeline repair.
//!
//! ```text
//! cargo run -p owner-day [-- <config.json> [<events.json>]]
//! ```
//!
//! `RUST_LOG=mf_dispatch=debug` shows every dispatch decision.

mod network;

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mf_core::{DispatchConfig, RequestId, SimClock, SimTime, VehicleId};
use mf_dispatch::{Dispatcher, EventLog, Fleet, PassengerRequest, RequestBook, VehicleState};
use mf_freight::{TourQueue, load_tours_reader};
use mf_schedule::repair_from_current;

use network::{HOMES, WORK, build_table};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:              u64     = 42;
const SERVICE_BEGIN:     SimTime = SimTime::hms(0, 0, 0);
const SERVICE_END:       SimTime = SimTime::hms(22, 0, 0);
const MORNING_TRIP:      SimTime = SimTime::hms(7, 30, 0);
const EVENING_TRIP:      SimTime = SimTime::hms(16, 30, 0);
const TRIP_JITTER_SECS:  u64     = 3_600;
const DELAY_PROBABILITY: f64     = 0.25;
const MAX_DELAY_SECS:    u64     = 300;

// ── Tour CSV ──────────────────────────────────────────────────────────────────

// Depot 100 sits downtown, depot 101 in the east.  Offsets are seconds after
// the tour's departure from the depot.
const TOURS_CSV: &str = "\
tour_id,depot,end_location,departure,final_departure,service_id,location,arrival_offset,service_duration,demand\n\
0,100,100,32400,35400,0,201,600,300,2\n\
0,100,100,32400,35400,1,202,1500,300,1\n\
0,100,100,32400,35400,2,203,2400,300,3\n\
1,101,101,34200,37200,3,204,500,300,2\n\
1,101,101,34200,37200,4,205,1400,300,2\n\
1,101,101,34200,37200,5,206,2300,300,1\n\
2,100,100,39600,42000,6,207,700,400,4\n\
2,100,100,39600,42000,7,208,1600,400,2\n\
3,101,101,43200,46200,8,201,900,300,1\n\
3,101,101,43200,46200,9,204,2000,300,3\n\
4,100,100,50400,52800,10,202,600,300,2\n\
4,100,100,50400,52800,11,206,1700,300,2\n\
5,101,101,55800,58200,12,205,800,300,1\n\
5,101,101,55800,58200,13,207,1800,300,5\n\
";

enum Step {
    Submit(SimTime),
    Complete(VehicleId, SimTime),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let wall_start = Instant::now();
    let args: Vec<String> = std::env::args().collect();

    // 1. Dispatch policy: defaults, or a JSON file overriding some fields.
    let config: DispatchConfig = match args.get(1) {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening config {path}"))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config {path}"))?
        }
        None => DispatchConfig::default(),
    };
    config.validate()?;

    // 2. Road network.
    let table = build_table();
    println!("Network: {} legs", table.len());

    // 3. Freight tours.
    let tours = load_tours_reader(Cursor::new(TOURS_CSV))?;
    println!("Tours:   {} loaded", tours.len());

    // 4. Fleet and owner trips.
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut fleet = Fleet::new();
    let mut book = RequestBook::new();

    for (i, (&home, &work)) in HOMES.iter().zip(WORK.iter()).enumerate() {
        let vehicle = fleet.push(VehicleState::new(
            VehicleId::try_from(i)?,
            home,
            SERVICE_BEGIN,
            SERVICE_END,
            true,
        ));
        let leave = MORNING_TRIP + rng.gen_range(0..=TRIP_JITTER_SECS);
        let back = EVENING_TRIP + rng.gen_range(0..=TRIP_JITTER_SECS);
        let first = RequestId(2 * vehicle.0);
        let second = RequestId(2 * vehicle.0 + 1);
        book.push(vehicle, PassengerRequest::owner_trip(first, home, work, leave, Some(back), &config));
        book.push(vehicle, PassengerRequest::owner_trip(second, work, home, back, None, &config));
    }
    println!("Fleet:   {} vehicles, {} owner trips", fleet.len(), book.len());

    // 5. Dispatcher.
    let mut dispatcher = Dispatcher::new(config, table, TourQueue::new(tours))?;
    fleet.start_all()?;

    // 6. Run the day, one event at a time.
    let mut clock = SimClock::new(SERVICE_BEGIN);
    let mut log = EventLog::new();
    let mut delayed = FxHashSet::default();
    let mut completions = 0usize;
    let mut delays = 0usize;
    let mut dropped_trips = 0usize;

    loop {
        let step = match (fleet.next_completion(), book.next_time()) {
            (None, None) => break,
            (None, Some(at)) => Step::Submit(at),
            (Some((_, end)), Some(at)) if at <= end => Step::Submit(at),
            (Some((vehicle, end)), _) => Step::Complete(vehicle, end),
        };

        match step {
            Step::Submit(at) => {
                clock.advance_to(at)?;
                fleet.update_timelines(at)?;
                for (vehicle_id, request) in book.drain_due(at) {
                    let vehicle = fleet
                        .get_mut(vehicle_id)
                        .ok_or_else(|| anyhow!("no vehicle {vehicle_id}"))?;
                    let id = request.id;
                    match dispatcher.schedule_request(vehicle, request, at) {
                        Ok(()) => info!(vehicle = %vehicle_id, request = %id, at = %at, "owner trip planned"),
                        Err(e) if !e.is_fatal() => {
                            warn!(vehicle = %vehicle_id, request = %id, error = %e, "owner trip dropped");
                            dropped_trips += 1;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
            Step::Complete(vehicle_id, end) => {
                clock.advance_to(end)?;
                let vehicle = fleet
                    .get_mut(vehicle_id)
                    .ok_or_else(|| anyhow!("no vehicle {vehicle_id}"))?;

                let is_drive = vehicle.schedule.current_task().is_some_and(|t| t.path().is_some());
                let index = vehicle.schedule.current_index();
                if is_drive && delayed.insert((vehicle_id, index)) && rng.gen_bool(DELAY_PROBABILITY) {
                    let late = end + rng.gen_range(1..=MAX_DELAY_SECS);
                    let report = repair_from_current(&mut vehicle.schedule, late, vehicle.service_end)?;
                    info!(vehicle = %vehicle_id, until = %late, shifted = report.shifted, removed = report.removed, "drive delayed");
                    delays += 1;
                    continue;
                }

                dispatcher.on_task_completed(vehicle, end, &mut log)?;
                vehicle.schedule.advance()?;
                completions += 1;
            }
        }
    }

    // 7. Summary.
    println!();
    println!("Day finished at {} after {} task completions ({} delayed drives, {} dropped trips)",
        clock.now(), completions, delays, dropped_trips);
    println!();
    println!("{:<10} {:<6} {:<10} {:<6} {:>9} {:>9} {:>7} {:>7}",
        "vehicle", "tour", "at", "depot", "duration", "dist_km", "empty%", "demand");
    for record in log.scheduled() {
        println!("{:<10} {:<6} {:<10} {:<6} {:>9} {:>9.1} {:>7.1} {:>7}",
            record.vehicle.0,
            record.tour.0,
            record.dispatch_time.to_string(),
            record.depot.0,
            record.planned_duration,
            record.planned_distance_m / 1_000.0,
            record.empty_distance_fraction * 100.0,
            record.total_demand);
    }
    println!();
    println!("Tours completed: {}", log.completed_count());
    println!("Tours left:      {}", dispatcher.tours().len());
    for rejection in log.rejections() {
        println!("Rejected: vehicle {} at {} ({:?})",
            rejection.vehicle.0, rejection.time, rejection.reason);
    }
    println!();
    println!("{:<10} {:>6} {:>7} {:>10}", "vehicle", "tasks", "trips", "last link");
    for vehicle in fleet.iter() {
        let last = vehicle.schedule.last_link().map_or_else(|| "-".to_string(), |l| l.0.to_string());
        println!("{:<10} {:>6} {:>7} {:>10}",
            vehicle.id.0, vehicle.schedule.len(), vehicle.served.len(), last);
    }

    // 8. Optional event export.
    if let Some(path) = args.get(2) {
        let file = File::create(path).with_context(|| format!("creating {path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &log.events)?;
        println!("Events written to {path}");
    }

    println!("Wall time: {:.2?}", wall_start.elapsed());
    Ok(())
}
