//! Unit tests for mf-freight.

use mf_core::{LinkId, ServiceId, SimTime, TourId};

use crate::{FreightTourPlan, TourStop};

const RETOOL: u64 = 600;

fn stop(service: u32, location: u32, arrival_offset: u64) -> TourStop {
    TourStop {
        service:          ServiceId(service),
        location:         LinkId(location),
        arrival_offset,
        service_duration: 300,
        demand:           2,
    }
}

/// Three stops at offsets 0, 500, 1200 from an 08:00 departure.
fn morning_tour() -> FreightTourPlan {
    FreightTourPlan {
        id:              TourId(7),
        depot:           LinkId(10),
        end_location:    LinkId(10),
        departure:       SimTime(28_800),
        final_departure: SimTime(30_600),
        stops:           vec![stop(0, 21, 0), stop(1, 22, 500), stop(2, 23, 1_200)],
    }
}

fn tour_at(id: u32, depot: u32, departure: u64, final_departure: u64) -> FreightTourPlan {
    FreightTourPlan {
        id:              TourId(id),
        depot:           LinkId(depot),
        end_location:    LinkId(depot),
        departure:       SimTime(departure),
        final_departure: SimTime(final_departure),
        stops:           vec![stop(id, 30 + id, 0)],
    }
}

// ── Conversion ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod convert {
    use mf_schedule::TaskType;

    use super::*;
    use crate::{FreightError, convert_tour};

    #[test]
    fn retool_services_retool() {
        let tour = convert_tour(&morning_tour(), RETOOL).unwrap();
        let spans: Vec<_> = tour
            .tasks
            .iter()
            .map(|t| (t.task_type(), t.begin().0, t.end().0))
            .collect();
        assert_eq!(spans, vec![
            (TaskType::Retool, 28_200, 28_800),
            (TaskType::FreightService, 28_800, 29_100),
            (TaskType::FreightService, 29_300, 29_600),
            (TaskType::FreightService, 30_000, 30_300),
            (TaskType::Retool, 30_600, 31_200),
        ]);
        assert_eq!(tour.tasks[0].end_link(), LinkId(10));
        assert_eq!(tour.tasks[2].end_link(), LinkId(22));
    }

    #[test]
    fn summary_fields() {
        let tour = convert_tour(&morning_tour(), RETOOL).unwrap();
        assert_eq!(tour.depot, LinkId(10));
        assert_eq!(tour.planned_duration, 3_000);
        assert_eq!(tour.travel_time_to_last_service, 1_200);
        assert_eq!(tour.total_demand, 6);
    }

    #[test]
    fn no_stops_is_malformed() {
        let mut plan = morning_tour();
        plan.stops.clear();
        assert!(matches!(convert_tour(&plan, RETOOL), Err(FreightError::MalformedPlan(TourId(7)))));
    }

    #[test]
    fn departure_before_retool_fits() {
        let mut plan = morning_tour();
        plan.departure = SimTime(500);
        assert!(matches!(
            convert_tour(&plan, RETOOL),
            Err(FreightError::InconsistentTiming { .. })
        ));
    }

    #[test]
    fn decreasing_offsets() {
        let mut plan = morning_tour();
        plan.stops = vec![stop(0, 21, 500), stop(1, 22, 0)];
        assert!(matches!(
            convert_tour(&plan, RETOOL),
            Err(FreightError::InconsistentTiming { reason: "arrival offsets decrease", .. })
        ));
    }

    #[test]
    fn overlapping_stops() {
        let mut plan = morning_tour();
        plan.stops = vec![stop(0, 21, 0), stop(1, 22, 200)];
        assert!(matches!(
            convert_tour(&plan, RETOOL),
            Err(FreightError::InconsistentTiming { reason: "service stops overlap", .. })
        ));
    }

    #[test]
    fn out_of_range_offset_is_reported() {
        let mut plan = morning_tour();
        plan.stops[2].arrival_offset = u64::MAX - 1_000;
        assert!(matches!(
            convert_tour(&plan, RETOOL),
            Err(FreightError::InconsistentTiming { reason: "arrival offset out of range", .. })
        ));
    }

    #[test]
    fn out_of_range_service_duration_is_reported() {
        let mut plan = morning_tour();
        plan.stops[0].service_duration = u64::MAX;
        assert!(matches!(
            convert_tour(&plan, RETOOL),
            Err(FreightError::InconsistentTiming { reason: "service duration out of range", .. })
        ));
    }

    #[test]
    fn out_of_range_closing_retool_is_reported() {
        let mut plan = morning_tour();
        plan.final_departure = SimTime(u64::MAX - 10);
        assert!(matches!(
            convert_tour(&plan, RETOOL),
            Err(FreightError::InconsistentTiming { reason: "closing retool ends out of range", .. })
        ));
    }

    #[test]
    fn planned_duration_matches_conversion() {
        let plan = morning_tour();
        let tour = convert_tour(&plan, RETOOL).unwrap();
        assert_eq!(plan.planned_duration(RETOOL), tour.planned_duration);
    }

    #[test]
    fn final_departure_before_last_service_ends() {
        let mut plan = morning_tour();
        plan.final_departure = SimTime(30_000);
        assert!(matches!(
            convert_tour(&plan, RETOOL),
            Err(FreightError::InconsistentTiming { at: SimTime(30_000), .. })
        ));
    }
}

// ── Tour manager ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod manager {
    use mf_core::VehicleId;
    use mf_schedule::Obligation;

    use super::*;
    use crate::{TourManager, TourQueue, TourRequest, TourRequestContext};

    fn request(context: TourRequestContext, must_return: Option<Obligation>) -> TourRequest {
        TourRequest { vehicle: VehicleId(0), now: SimTime(28_000), context, must_return, retool_duration: 0 }
    }

    #[test]
    fn hands_out_in_order() {
        let mut queue = TourQueue::new([tour_at(1, 10, 28_800, 29_400), tour_at(2, 11, 28_800, 29_400)]);
        let req = request(TourRequestContext::AwayFromDepot { location: LinkId(3) }, None);
        assert_eq!(queue.request_plan(&req).map(|p| p.id), Some(TourId(1)));
        assert_eq!(queue.request_plan(&req).map(|p| p.id), Some(TourId(2)));
        assert!(queue.request_plan(&req).is_none());
    }

    #[test]
    fn prefers_tour_from_current_depot() {
        let mut queue = TourQueue::new([tour_at(1, 10, 28_800, 29_400), tour_at(2, 11, 28_800, 29_400)]);
        let req = request(TourRequestContext::AtDepot { depot: LinkId(11) }, None);
        assert_eq!(queue.request_plan(&req).map(|p| p.id), Some(TourId(2)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn skips_tours_past_the_deadline() {
        let mut queue = TourQueue::new([tour_at(1, 10, 28_800, 36_000), tour_at(2, 10, 28_800, 29_400)]);
        let deadline = Obligation::new(LinkId(3), SimTime(30_000));
        let req = request(TourRequestContext::TowardDepot { depot: LinkId(10) }, Some(deadline));
        assert_eq!(queue.request_plan(&req).map(|p| p.id), Some(TourId(2)));
        assert_eq!(queue.len(), 1);
        assert!(queue.request_plan(&req).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn deadline_check_counts_both_retools() {
        // Spans 700 s and 400 s; with 600 s retools they take 1900 s and 1600 s.
        let mut queue = TourQueue::new([tour_at(1, 10, 32_400, 33_100), tour_at(2, 10, 36_000, 36_400)]);
        let req = TourRequest {
            vehicle:         VehicleId(0),
            now:             SimTime(29_390),
            context:         TourRequestContext::AwayFromDepot { location: LinkId(3) },
            must_return:     Some(Obligation::new(LinkId(3), SimTime(31_000))),
            retool_duration: RETOOL,
        };
        assert_eq!(queue.request_plan(&req).map(|p| p.id), Some(TourId(2)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn returned_plan_goes_first() {
        let mut queue = TourQueue::new([tour_at(1, 10, 28_800, 29_400), tour_at(2, 10, 28_800, 29_400)]);
        let req = request(TourRequestContext::AwayFromDepot { location: LinkId(3) }, None);
        let first = queue.request_plan(&req).unwrap();
        queue.return_plan(first);
        assert_eq!(queue.request_plan(&req).map(|p| p.id), Some(TourId(1)));
    }

    #[test]
    fn context_links() {
        let away = TourRequestContext::AwayFromDepot { location: LinkId(3) };
        assert_eq!(away.link(), LinkId(3));
        assert_eq!(away.depot(), None);
        assert_eq!(TourRequestContext::AtDepot { depot: LinkId(9) }.depot(), Some(LinkId(9)));
    }
}

// ── CSV Loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::{FreightError, load_tours_csv, load_tours_reader};

    const CSV: &[u8] = b"\
tour_id,depot,end_location,departure,final_departure,service_id,location,arrival_offset,service_duration,demand\n\
7,10,10,28800,30600,0,21,0,300,2\n\
7,10,10,28800,30600,1,22,500,300,2\n\
7,10,10,28800,30600,2,23,1200,300,2\n\
8,11,12,32400,33600,3,24,600,240,4\n\
";

    #[test]
    fn loads_tours_in_file_order() {
        let tours = load_tours_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(tours.len(), 2);
        assert_eq!(tours[0], morning_tour());
        assert_eq!(tours[1].id, TourId(8));
        assert_eq!(tours[1].end_location, LinkId(12));
        assert_eq!(tours[1].stops.len(), 1);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("tours.csv");
        std::fs::File::create(&path).unwrap().write_all(CSV).unwrap();
        let tours = load_tours_csv(&path).unwrap();
        assert_eq!(tours.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = load_tours_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, FreightError::Io(_)));
    }

    #[test]
    fn split_tour_is_rejected() {
        let csv = b"\
tour_id,depot,end_location,departure,final_departure,service_id,location,arrival_offset,service_duration,demand\n\
1,10,10,28800,30600,0,21,0,300,2\n\
2,10,10,28800,30600,1,22,0,300,2\n\
1,10,10,28800,30600,2,23,900,300,2\n\
";
        let err = load_tours_reader(Cursor::new(&csv[..])).unwrap_err();
        assert!(matches!(err, FreightError::Parse(_)));
    }

    #[test]
    fn conflicting_tour_columns() {
        let csv = b"\
tour_id,depot,end_location,departure,final_departure,service_id,location,arrival_offset,service_duration,demand\n\
1,10,10,28800,30600,0,21,0,300,2\n\
1,10,10,28900,30600,1,22,500,300,2\n\
";
        assert!(matches!(load_tours_reader(Cursor::new(&csv[..])), Err(FreightError::Parse(_))));
    }

    #[test]
    fn huge_offset_loads_but_does_not_convert() {
        let csv = b"\
tour_id,depot,end_location,departure,final_departure,service_id,location,arrival_offset,service_duration,demand\n\
1,10,10,28800,30600,0,21,18446744073709551000,300,2\n\
";
        let tours = load_tours_reader(Cursor::new(&csv[..])).unwrap();
        assert!(matches!(
            crate::convert_tour(&tours[0], RETOOL),
            Err(FreightError::InconsistentTiming { .. })
        ));
    }

    #[test]
    fn bad_number_is_parse_error() {
        let csv = b"\
tour_id,depot,end_location,departure,final_departure,service_id,location,arrival_offset,service_duration,demand\n\
x,10,10,28800,30600,0,21,0,300,2\n\
";
        assert!(matches!(load_tours_reader(Cursor::new(&csv[..])), Err(FreightError::Parse(_))));
    }
}
