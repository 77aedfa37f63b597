//! Arrival systems: the three Poisson streams feeding the park gate.
//!
//! Each arrival event creates its party, books the arrival counters, walks the
//! party up to reception, and schedules the next arrival of its own stream
//! while the stream's time-of-day window is still open.

use bevy_ecs::prelude::{Commands, Entity, Res, ResMut};
use rand::rngs::StdRng;

use crate::clock::{
    mins_to_ms, CurrentEvent, EventKind, EventSubject, SimulationClock, ONE_HOUR_MS,
    PARK_CLOSE_MIN,
};
use crate::distributions::{
    buys_express_on_entry, family_departure_hour, family_interarrival_min, family_kid_count,
    kid_age, single_interarrival_min, single_visitor_age, teen_group_size, teen_interarrival_min,
    ticket_time_min, wristband_time_min, SimRng,
};
use crate::ecs::{FamilyGroup, Visitor, VisitorKind};
use crate::park::Park;
use crate::telemetry::ParkTelemetry;
use crate::waitqueue::QueueEntry;

/// Families stop arriving at 12:00.
pub const FAMILY_WINDOW_END_MIN: u64 = 12 * 60;
/// Teen groups arrive between 10:00 and 16:00.
pub const TEEN_WINDOW_START_MIN: u64 = 10 * 60;
pub const TEEN_WINDOW_END_MIN: u64 = 16 * 60;
/// Single visitors arrive until 18:30 inclusive.
pub const SINGLE_WINDOW_END_MIN: u64 = 18 * 60 + 30;

/// Kicks the simulation off: first arrivals of each stream plus the first
/// day-close event.
pub fn simulation_started_system(event: Res<CurrentEvent>, mut clock: ResMut<SimulationClock>) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }
    let now = clock.now();
    clock.schedule_at(now, EventKind::FamilyArrival, None);
    clock.schedule_in(ONE_HOUR_MS, EventKind::TeenGroupArrival, None);
    clock.schedule_at(now, EventKind::SingleArrival, None);
    let close = clock.sim_ms_at_next_minute_of_day(now, PARK_CLOSE_MIN);
    clock.schedule_at(close, EventKind::EndOfDay, None);
}

/// Walk a freshly arrived party to the ticket desk: straight to a clerk when
/// one is free and nobody is waiting, into the queue otherwise.
pub fn dispatch_to_reception(
    visitor: Entity,
    heads: u32,
    park: &mut Park,
    clock: &mut SimulationClock,
    rng: &mut StdRng,
) {
    let now = clock.now();
    if park.reception.queue.is_empty() {
        if let Some(clerk) = park.reception.free_clerk() {
            park.reception.begin_service(clerk);
            let minutes = ticket_time_min(rng) + wristband_time_min(rng);
            clock.schedule_after_minutes(
                minutes,
                EventKind::EndReception,
                Some(EventSubject::AtReception { visitor, clerk }),
            );
            return;
        }
    }
    park.reception.queue.push(
        QueueEntry {
            visitor,
            heads,
            joined_at: now,
        },
        now,
    );
}

pub fn family_arrival_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut commands: Commands,
) {
    if event.0.kind != EventKind::FamilyArrival {
        return;
    }
    let rng = &mut rng.0;
    let now = clock.now();

    let num_kids = family_kid_count(rng);
    let kids_ages: Vec<f64> = (0..num_kids).map(|_| kid_age(rng)).collect();
    let departure = family_departure_hour(rng);
    let group_size = num_kids + 2;
    let min_age = kids_ages.iter().copied().fold(f64::INFINITY, f64::min);

    let mut visitor = Visitor::new(VisitorKind::Family, group_size, min_age, departure);
    visitor.has_express_pass = buys_express_on_entry(rng);
    let entity = commands
        .spawn((visitor, FamilyGroup::new(kids_ages)))
        .id();

    telemetry.record_arrival(group_size);
    dispatch_to_reception(entity, group_size, &mut park, &mut clock, rng);

    let next = now + mins_to_ms(family_interarrival_min(rng));
    if clock.minute_of_day(next) < FAMILY_WINDOW_END_MIN {
        clock.schedule_at(next, EventKind::FamilyArrival, None);
    }
}

pub fn teen_arrival_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut commands: Commands,
) {
    if event.0.kind != EventKind::TeenGroupArrival {
        return;
    }
    let rng = &mut rng.0;
    let now = clock.now();

    let group_size = teen_group_size(rng);
    let mut visitor = Visitor::new(VisitorKind::TeenGroup, group_size, 14.0, 19.0);
    visitor.has_express_pass = buys_express_on_entry(rng);
    let entity = commands.spawn(visitor).id();

    telemetry.record_arrival(group_size);
    dispatch_to_reception(entity, group_size, &mut park, &mut clock, rng);

    let next = now + mins_to_ms(teen_interarrival_min(rng));
    if clock.minute_of_day(next) < TEEN_WINDOW_END_MIN {
        clock.schedule_at(next, EventKind::TeenGroupArrival, None);
    }
}

pub fn single_arrival_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut commands: Commands,
) {
    if event.0.kind != EventKind::SingleArrival {
        return;
    }
    let rng = &mut rng.0;
    let now = clock.now();

    let age = single_visitor_age(rng);
    let mut visitor = Visitor::new(VisitorKind::SingleVisitor, 1, age, 19.0);
    visitor.has_express_pass = buys_express_on_entry(rng);
    let entity = commands.spawn(visitor).id();

    telemetry.record_arrival(1);
    dispatch_to_reception(entity, 1, &mut park, &mut clock, rng);

    let next = now + mins_to_ms(single_interarrival_min(rng));
    if clock.minute_of_day(next) <= SINGLE_WINDOW_END_MIN {
        clock.schedule_at(next, EventKind::SingleArrival, None);
    }
}
