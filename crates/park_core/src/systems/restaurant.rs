//! Restaurant flow: seat or queue on arrival, bill and start the meal when the
//! kitchen finishes, and route onward when the plates are empty.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::{
    meal_duration_min, meal_unsatisfactory, restaurant_prep_min, restaurant_service_min, SimRng,
};
use crate::ecs::{FamilyGroup, ParentFamily, Visitor, VisitorStatus};
use crate::park::Park;
use crate::pricing::meal_price;
use crate::systems::flow::route_onward;
use crate::telemetry::ParkTelemetry;
use crate::waitqueue::QueueEntry;

/// A bad meal costs this much rating.
const BAD_MEAL_PENALTY: f64 = 0.8;

pub fn restaurant_arrival_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    visitors: Query<(&Visitor, Option<&ParentFamily>)>,
) {
    if event.0.kind != EventKind::ArriveAtRestaurant {
        return;
    }
    let Some(EventSubject::AtRestaurant {
        visitor,
        restaurant,
    }) = event.0.subject
    else {
        return;
    };
    let now = clock.now();
    let Ok((party, _)) = visitors.get(visitor) else {
        return;
    };
    if party.status != VisitorStatus::InPark {
        return;
    }
    let heads = party.group_size;

    let seated = park.restaurant_mut(restaurant).begin_or_enqueue(
        QueueEntry {
            visitor,
            heads,
            joined_at: now,
        },
        now,
    );
    if seated {
        let minutes =
            restaurant_prep_min(&mut rng.0, restaurant, heads) + restaurant_service_min(&mut rng.0);
        clock.schedule_after_minutes(
            minutes,
            EventKind::EndRestaurantService,
            Some(EventSubject::AtRestaurant {
                visitor,
                restaurant,
            }),
        );
    }
}

pub fn restaurant_service_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
) {
    if event.0.kind != EventKind::EndRestaurantService {
        return;
    }
    let Some(EventSubject::AtRestaurant {
        visitor,
        restaurant,
    }) = event.0.subject
    else {
        return;
    };
    let now = clock.now();

    if let Ok((mut party, _)) = visitors.get_mut(visitor) {
        if party.status == VisitorStatus::InPark {
            telemetry.add_revenue(meal_price(restaurant, party.group_size));
            if meal_unsatisfactory(&mut rng.0) {
                party.lower_rating(BAD_MEAL_PENALTY);
            }
            clock.schedule_after_minutes(
                meal_duration_min(&mut rng.0),
                EventKind::EndMeal,
                Some(EventSubject::AtRestaurant {
                    visitor,
                    restaurant,
                }),
            );
        }
    }

    // The kitchen moves straight on to the next party in line.
    if let Some(next) = park.restaurant_mut(restaurant).promote_next(now) {
        let minutes = restaurant_prep_min(&mut rng.0, restaurant, next.heads)
            + restaurant_service_min(&mut rng.0);
        clock.schedule_after_minutes(
            minutes,
            EventKind::EndRestaurantService,
            Some(EventSubject::AtRestaurant {
                visitor: next.visitor,
                restaurant,
            }),
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub fn end_meal_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut commands: Commands,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
    mut families: Query<&mut FamilyGroup>,
) {
    if event.0.kind != EventKind::EndMeal {
        return;
    }
    let Some(EventSubject::AtRestaurant {
        visitor,
        restaurant,
    }) = event.0.subject
    else {
        return;
    };
    park.restaurant_mut(restaurant).remove_diner(visitor);

    route_onward(
        visitor,
        &mut clock,
        &park,
        &mut rng.0,
        &mut telemetry,
        &mut visitors,
        &mut families,
        &mut commands,
    );
}
