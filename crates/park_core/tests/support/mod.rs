#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, Schedule, World};
use park_core::clock::{EventKind, EventSubject, SimulationClock};
use park_core::ecs::{FamilyGroup, Visitor, VisitorKind};
use park_core::runner::{run_next_event, run_until_close, simulation_schedule};
use park_core::scenario::{build_scenario, ParkParams};

/// A world plus the default schedule, ready to pump events.
pub struct TestHarness {
    pub world: World,
    pub schedule: Schedule,
}

impl TestHarness {
    /// Build a scenario without the initial arrival seeding; tests schedule
    /// their own events.
    pub fn bare(params: ParkParams) -> Self {
        let mut world = World::new();
        build_scenario(&mut world, params);
        Self {
            world,
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event; `false` when the queue is empty or past horizon.
    pub fn step(&mut self) -> bool {
        run_next_event(&mut self.world, &mut self.schedule)
    }

    /// Run to the horizon and force-close the park.
    pub fn run_to_close(&mut self, max_steps: usize) -> usize {
        run_until_close(&mut self.world, &mut self.schedule, max_steps)
    }

    pub fn clock(&self) -> &SimulationClock {
        self.world.resource::<SimulationClock>()
    }

    pub fn schedule_event(&mut self, at_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.world
            .resource_mut::<SimulationClock>()
            .schedule_at(at_ms, kind, subject);
    }

    /// Spawn a party directly (bypassing the arrival streams).
    pub fn spawn_party(
        &mut self,
        kind: VisitorKind,
        group_size: u32,
        min_age: f64,
        departure_hour: f64,
    ) -> Entity {
        self.world
            .spawn(Visitor::new(kind, group_size, min_age, departure_hour))
            .id()
    }

    /// Spawn a family with the given kid ages (group size = kids + 2).
    pub fn spawn_family(&mut self, kids_ages: Vec<f64>, departure_hour: f64) -> Entity {
        let min_age = kids_ages.iter().copied().fold(f64::INFINITY, f64::min);
        let group_size = kids_ages.len() as u32 + 2;
        let visitor = Visitor::new(VisitorKind::Family, group_size, min_age, departure_hour);
        self.world
            .spawn((visitor, FamilyGroup::new(kids_ages)))
            .id()
    }

    pub fn visitor(&self, entity: Entity) -> &Visitor {
        self.world
            .entity(entity)
            .get::<Visitor>()
            .expect("visitor component")
    }
}
