//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Each step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule. The run stops once the next event
//! would land past the horizon; the force-close sweep then completes every
//! party still inside the park through the normal completion path.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};
use bevy_ecs::prelude::{Entity, Schedule, World};
use bevy_ecs::schedule::apply_deferred;
use bevy_ecs::schedule::IntoSystemConfigs;
use bevy_ecs::system::SystemState;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{FamilyGroup, ParentFamily, Visitor};
use crate::park::Park;
use crate::profiling::EventMetrics;
use crate::scenario::SimulationEndTimeMs;
use crate::systems::{
    abandonment::abandonment_system,
    arrivals::{
        family_arrival_system, simulation_started_system, single_arrival_system,
        teen_arrival_system,
    },
    day_close::end_of_day_system,
    facility_arrival::facility_arrival_system,
    facility_end::facility_end_system,
    flow,
    instructor::{instructor_break_end_system, instructor_lunch_end_system},
    reception::end_reception_system,
    restaurant::{end_meal_system, restaurant_arrival_system, restaurant_service_system},
};

// Condition functions for each event kind
fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_family_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::FamilyArrival)
        .unwrap_or(false)
}

fn is_teen_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::TeenGroupArrival)
        .unwrap_or(false)
}

fn is_single_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SingleArrival)
        .unwrap_or(false)
}

fn is_end_reception(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::EndReception)
        .unwrap_or(false)
}

fn is_facility_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ArriveAtFacility)
        .unwrap_or(false)
}

fn is_abandonment(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::Abandonment)
        .unwrap_or(false)
}

fn is_facility_end(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::EndFacility)
        .unwrap_or(false)
}

fn is_restaurant_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ArriveAtRestaurant)
        .unwrap_or(false)
}

fn is_restaurant_service_end(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::EndRestaurantService)
        .unwrap_or(false)
}

fn is_end_meal(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::EndMeal)
        .unwrap_or(false)
}

fn is_instructor_break_end(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::InstructorBreakEnd)
        .unwrap_or(false)
}

fn is_instructor_lunch_end(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::InstructorLunchEnd)
        .unwrap_or(false)
}

fn is_end_of_day(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::EndOfDay)
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as
/// [CurrentEvent], then runs the schedule. Returns `false` when the clock is
/// empty or when the next event's timestamp exceeds the horizon; an event
/// landing exactly on the horizon still runs.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let stop_at = world.get_resource::<SimulationEndTimeMs>().map(|e| e.0);
    let clock = world.resource::<SimulationClock>();
    let Some(next_ts) = clock.next_event_time() else {
        return false;
    };
    if let Some(end_ms) = stop_at {
        if next_ts > end_ms {
            return false;
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }

    schedule.run(world);
    true
}

/// Runs simulation steps until the horizon or an empty queue, `max_steps` at
/// most. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs the simulation to its horizon, then force-closes the park so that
/// every party that passed reception completes. Returns the steps executed.
pub fn run_until_close(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let steps = run_until_empty(world, schedule, max_steps);
    force_close_park(world);
    steps
}

/// End-of-simulation sweep: every party still in a ride, a ride queue, a
/// restaurant, or a restaurant queue exits through the normal completion
/// routine. Parties still at reception never entered and are not completed.
pub fn force_close_park(world: &mut World) {
    let targets: Vec<Entity> = {
        let park = world.resource::<Park>();
        let mut targets = Vec::new();
        for facility in &park.facilities {
            targets.extend(facility.in_service().iter().map(|e| e.visitor));
            targets.extend(facility.queue_regular.iter().map(|e| e.visitor));
            targets.extend(facility.queue_express.iter().map(|e| e.visitor));
        }
        for restaurant in &park.restaurants {
            targets.extend(restaurant.in_service().iter().map(|e| e.visitor));
            targets.extend(restaurant.queue.iter().map(|e| e.visitor));
        }
        targets
    };

    let mut state: SystemState<(
        Query<(&mut Visitor, Option<&ParentFamily>)>,
        Query<&mut FamilyGroup>,
        ResMut<crate::telemetry::ParkTelemetry>,
        Commands,
    )> = SystemState::new(world);
    {
        let (mut visitors, mut families, mut telemetry, mut commands) = state.get_mut(world);
        for visitor in targets {
            flow::depart_visitor(
                visitor,
                &mut visitors,
                &mut families,
                &mut telemetry,
                &mut commands,
            );
        }
    }
    state.apply(world);
}

/// Builds the default simulation schedule: all event-reacting systems plus
/// [apply_deferred] so that spawned parties (subgroups, new arrivals) are
/// applied before the next step.
///
/// Systems are conditionally executed based on event type to reduce overhead.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        simulation_started_system.run_if(is_simulation_started),
        family_arrival_system.run_if(is_family_arrival),
        teen_arrival_system.run_if(is_teen_arrival),
        single_arrival_system.run_if(is_single_arrival),
        end_reception_system.run_if(is_end_reception),
        facility_arrival_system.run_if(is_facility_arrival),
        abandonment_system.run_if(is_abandonment),
        facility_end_system.run_if(is_facility_end),
        restaurant_arrival_system.run_if(is_restaurant_arrival),
        restaurant_service_system.run_if(is_restaurant_service_end),
        end_meal_system.run_if(is_end_meal),
        instructor_break_end_system.run_if(is_instructor_break_end),
        instructor_lunch_end_system.run_if(is_instructor_lunch_end),
        end_of_day_system.run_if(is_end_of_day),
        apply_deferred,
    ));
    schedule
}

/// Initializes the simulation by scheduling the SimulationStarted event at
/// time 0. Call this after building the scenario and before running events.
pub fn initialize_simulation(world: &mut World) {
    let mut clock = world.resource_mut::<SimulationClock>();
    let now = clock.now();
    clock.schedule_at(now, EventKind::SimulationStarted, None);
}
