//! Unit tests for mf-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LinkId, RequestId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = VehicleId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(VehicleId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(VehicleId(0) < VehicleId(1));
        assert!(LinkId(100) > LinkId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(VehicleId::INVALID.0, u32::MAX);
        assert_eq!(RequestId::default(), RequestId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(LinkId(7).to_string(), "LinkId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::{CoreError, SimClock, SimTime};

    #[test]
    fn arithmetic() {
        let t = SimTime(100);
        assert_eq!(t + 20, SimTime(120));
        assert_eq!(SimTime(150) - SimTime(100), 50);
        assert_eq!(SimTime(150).since(SimTime(100)), 50);
    }

    #[test]
    fn checked_sub_stops_at_zero() {
        assert_eq!(SimTime(600).checked_sub_secs(600), Some(SimTime::ZERO));
        assert_eq!(SimTime(599).checked_sub_secs(600), None);
    }

    #[test]
    fn checked_add_stops_at_overflow() {
        assert_eq!(SimTime(600).checked_add_secs(600), Some(SimTime(1_200)));
        assert_eq!(SimTime::MAX.checked_add_secs(0), Some(SimTime::MAX));
        assert_eq!(SimTime(u64::MAX - 10).checked_add_secs(11), None);
    }

    #[test]
    fn hms_and_display() {
        assert_eq!(SimTime::hms(8, 0, 0), SimTime(28_800));
        assert_eq!(SimTime(28_800 + 61).to_string(), "08:01:01");
        assert_eq!(SimTime::hms(26, 0, 0).to_string(), "26:00:00");
    }

    #[test]
    fn clock_is_monotonic() {
        let mut clock = SimClock::new(SimTime(10));
        clock.advance_to(SimTime(10)).unwrap();
        clock.advance_to(SimTime(25)).unwrap();
        assert_eq!(clock.now(), SimTime(25));

        let err = clock.advance_to(SimTime(24)).unwrap_err();
        assert!(matches!(err, CoreError::ClockRewind { .. }));
        assert_eq!(clock.now(), SimTime(25));
    }

    #[test]
    fn clock_advance_by() {
        let mut clock = SimClock::new(SimTime::ZERO);
        clock.advance_by(90);
        assert_eq!(clock.now(), SimTime(90));
    }
}

#[cfg(test)]
mod config {
    use crate::{DispatchConfig, SimTime};

    #[test]
    fn default_is_valid() {
        DispatchConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_retool_rejected() {
        let cfg = DispatchConfig { retool_duration: 0, ..DispatchConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn cutoff_before_first_retool_rejected() {
        let cfg = DispatchConfig {
            retool_duration:           600,
            freight_tour_latest_start: SimTime(300),
            ..DispatchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn submission_time_uses_look_ahead() {
        let cfg = DispatchConfig { submission_look_ahead: 900, ..DispatchConfig::default() };
        assert_eq!(cfg.submission_time(SimTime(3_600)), SimTime(2_700));
        assert_eq!(cfg.submission_time(SimTime(100)), SimTime::ZERO);
    }
}
