//! Day close at 19:00: archive every queue's daily statistics and seed the
//! next morning's arrivals.

use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock, PARK_CLOSE_MIN, PARK_OPEN_MIN};
use crate::park::Park;
use crate::systems::arrivals::TEEN_WINDOW_START_MIN;

pub fn end_of_day_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut park: ResMut<Park>,
) {
    if event.0.kind != EventKind::EndOfDay {
        return;
    }
    let now = clock.now();

    // Final length sample, then fold the day into the per-day averages.
    park.reception.queue.sample_length(now);
    park.reception.queue.close_day();
    for facility in &mut park.facilities {
        facility.queue_regular.sample_length(now);
        facility.queue_regular.close_day();
        facility.queue_express.sample_length(now);
        facility.queue_express.close_day();
    }
    for restaurant in &mut park.restaurants {
        restaurant.queue.sample_length(now);
        restaurant.queue.close_day();
    }

    // Tomorrow's streams and the next day close.
    let morning = clock.sim_ms_at_next_minute_of_day(now, PARK_OPEN_MIN);
    clock.schedule_at(morning, EventKind::FamilyArrival, None);
    clock.schedule_at(morning, EventKind::SingleArrival, None);
    let teen_morning = clock.sim_ms_at_next_minute_of_day(now, TEEN_WINDOW_START_MIN);
    clock.schedule_at(teen_morning, EventKind::TeenGroupArrival, None);
    let next_close = clock.sim_ms_at_next_minute_of_day(now, PARK_CLOSE_MIN);
    clock.schedule_at(next_close, EventKind::EndOfDay, None);
}
