//! Scenario setup: build a world ready to simulate a park day.

use bevy_ecs::prelude::{Resource, World};
use serde::{Deserialize, Serialize};

use crate::clock::{SimulationClock, ONE_HOUR_MS};
use crate::distributions::SimRng;
use crate::park::Park;
use crate::profiling::EventMetrics;
use crate::telemetry::ParkTelemetry;

/// Default epoch: simulation time 0 is 09:00 (park opening) of day zero.
pub const DEFAULT_EPOCH_MS: i64 = 9 * ONE_HOUR_MS as i64;

/// Default horizon: one 10-hour operating day after the start.
pub const DEFAULT_HORIZON_MS: u64 = 10 * ONE_HOUR_MS;

/// Simulation end time in milliseconds. The runner stops once the next event
/// would be strictly past this timestamp; the force-close sweep then empties
/// the park.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTimeMs(pub u64);

/// Parameters for building a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkParams {
    /// Seed of the single random stream; fixed seed means bit-identical runs.
    pub seed: u64,
    /// Real-world ms mapped to simulation time 0. Expected to be a park
    /// opening timestamp (09:00 of some day).
    pub epoch_ms: i64,
    /// Simulation end time in ms. `None` uses the one-day default.
    pub horizon_ms: Option<u64>,
    /// Clerks at the reception desk.
    pub num_clerks: usize,
    /// Wave Pool headcount (80 baseline, 120 with the planned upgrade).
    pub wave_pool_capacity: u32,
}

impl Default for ParkParams {
    fn default() -> Self {
        Self {
            seed: 0,
            epoch_ms: DEFAULT_EPOCH_MS,
            horizon_ms: Some(DEFAULT_HORIZON_MS),
            num_clerks: 3,
            wave_pool_capacity: 80,
        }
    }
}

impl ParkParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the real-world timestamp (ms) that simulation time 0 maps to.
    pub fn with_epoch_ms(mut self, epoch_ms: i64) -> Self {
        self.epoch_ms = epoch_ms;
        self
    }

    /// Set the simulation horizon in hours after the start.
    pub fn with_horizon_hours(mut self, hours: u64) -> Self {
        self.horizon_ms = Some(hours * ONE_HOUR_MS);
        self
    }

    pub fn with_horizon_ms(mut self, horizon_ms: u64) -> Self {
        self.horizon_ms = Some(horizon_ms);
        self
    }

    /// Run the upgraded Wave Pool (capacity 120 instead of 80).
    pub fn with_wave_pool_upgrade(mut self) -> Self {
        self.wave_pool_capacity = 120;
        self
    }

    pub fn with_num_clerks(mut self, num_clerks: usize) -> Self {
        self.num_clerks = num_clerks;
        self
    }
}

/// Populate `world` with the clock, random stream, park, telemetry, and
/// horizon. Visitors are spawned dynamically by the arrival systems once
/// SimulationStarted fires.
pub fn build_scenario(world: &mut World, params: ParkParams) {
    world.insert_resource(SimulationClock::with_epoch(params.epoch_ms));
    world.insert_resource(SimRng::from_seed(params.seed));
    world.insert_resource(Park::new(params.num_clerks, params.wave_pool_capacity));
    world.insert_resource(ParkTelemetry::default());
    world.insert_resource(EventMetrics::default());
    world.insert_resource(SimulationEndTimeMs(
        params.horizon_ms.unwrap_or(DEFAULT_HORIZON_MS),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::PARK_OPEN_MIN;

    #[test]
    fn build_scenario_inserts_core_resources() {
        let mut world = World::new();
        build_scenario(&mut world, ParkParams::default().with_seed(42));

        let clock = world.resource::<SimulationClock>();
        assert_eq!(clock.minute_of_day(0), PARK_OPEN_MIN);
        assert_eq!(world.resource::<SimulationEndTimeMs>().0, DEFAULT_HORIZON_MS);

        let park = world.resource::<Park>();
        assert_eq!(park.facilities.len(), crate::park::FACILITY_COUNT);
        assert_eq!(park.reception.num_clerks(), 3);
    }

    #[test]
    fn wave_pool_upgrade_raises_capacity() {
        let mut world = World::new();
        build_scenario(&mut world, ParkParams::default().with_wave_pool_upgrade());
        let park = world.resource::<Park>();
        assert_eq!(park.facility(crate::park::WAVE_POOL).capacity, 120);
    }
}
