//! `Fleet` — owns every vehicle's state, indexed by `VehicleId`.

use mf_core::{SimTime, VehicleId};
use mf_schedule::{RepairReport, ScheduleResult, ScheduleStatus, update_timeline};

use crate::VehicleState;

#[derive(Clone, Debug, Default)]
pub struct Fleet {
    vehicles: Vec<VehicleState>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vehicle; its id must equal its position in the fleet.
    ///
    /// # Panics
    /// Panics in debug mode if `vehicle.id` is out of sequence.
    pub fn push(&mut self, vehicle: VehicleState) -> VehicleId {
        debug_assert_eq!(vehicle.id.index(), self.vehicles.len(), "vehicle ids must be dense");
        let id = vehicle.id;
        self.vehicles.push(vehicle);
        id
    }

    #[inline]
    pub fn get(&self, id: VehicleId) -> Option<&VehicleState> {
        self.vehicles.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut VehicleState> {
        self.vehicles.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleState> {
        self.vehicles.iter()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Start every schedule that has not been started yet.
    pub fn start_all(&mut self) -> ScheduleResult<()> {
        for v in &mut self.vehicles {
            if v.schedule.status() == ScheduleStatus::Planned {
                v.schedule.start()?;
            }
        }
        Ok(())
    }

    /// The vehicle whose current task ends first, with that end time.
    ///
    /// Ties go to the lower vehicle id.
    pub fn next_completion(&self) -> Option<(VehicleId, SimTime)> {
        self.vehicles
            .iter()
            .filter(|v| v.schedule.status() == ScheduleStatus::Started)
            .filter_map(|v| v.schedule.current_task().map(|t| (v.id, t.end())))
            .min_by_key(|&(id, end)| (end, id))
    }

    /// Bring every started schedule in line with `now`.
    ///
    /// Returns the summed repair report.  Vehicles are repaired
    /// independently; with the `parallel` feature they are repaired on the
    /// Rayon pool.
    pub fn update_timelines(&mut self, now: SimTime) -> ScheduleResult<RepairReport> {
        #[cfg(feature = "parallel")]
        let reports: Vec<RepairReport> = {
            use rayon::prelude::*;

            self.vehicles
                .par_iter_mut()
                .map(|v| update_timeline(&mut v.schedule, now, v.service_end))
                .collect::<ScheduleResult<_>>()?
        };

        #[cfg(not(feature = "parallel"))]
        let reports: Vec<RepairReport> = self
            .vehicles
            .iter_mut()
            .map(|v| update_timeline(&mut v.schedule, now, v.service_end))
            .collect::<ScheduleResult<_>>()?;

        Ok(reports.into_iter().fold(RepairReport::default(), |acc, r| RepairReport {
            shifted: acc.shifted + r.shifted,
            removed: acc.removed + r.removed,
        }))
    }
}
