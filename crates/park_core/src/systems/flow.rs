//! Shared movement logic: where a party goes after a ride, a meal, or an
//! abandoned queue, and how a completed visit is booked.

use bevy_ecs::prelude::{Commands, Entity, Query};
use rand::rngs::StdRng;

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::distributions::{choose_restaurant, eats_lunch};
use crate::ecs::{FamilyGroup, ParentFamily, Visitor, VisitorKind, VisitorStatus};
use crate::park::{FacilityId, Park, RestaurantKind};
use crate::pricing::photo_package_revenue;
use crate::router::{choose_facility, RoutingRequest};
use crate::telemetry::ParkTelemetry;

/// Visitors consider lunch between 13:00 and 15:00.
pub const LUNCH_WINDOW_START_MIN: u64 = 13 * 60;
pub const LUNCH_WINDOW_END_MIN: u64 = 15 * 60;

/// Where a party goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStop {
    Depart,
    Restaurant(RestaurantKind),
    Ride(FacilityId),
}

/// The route-or-exit rule applied after every ride, meal, and abandonment:
/// leave when past the departure time or out of eligible facilities; otherwise
/// maybe divert to lunch in the midday window; otherwise head to the chosen
/// ride.
#[allow(clippy::too_many_arguments)]
pub fn decide_next_stop(
    park: &Park,
    clock: &SimulationClock,
    rng: &mut StdRng,
    kind: VisitorKind,
    min_age: f64,
    visited: &[FacilityId],
    departure_hour: f64,
) -> NextStop {
    let now = clock.now();
    if clock.sim_to_real_ms(now) >= clock.real_ms_at_hour_of_day(now, departure_hour) {
        return NextStop::Depart;
    }
    let request = RoutingRequest {
        kind,
        min_age,
        visited,
        first_visit: false,
    };
    let Some(next) = choose_facility(park, &request) else {
        return NextStop::Depart;
    };
    let minute = clock.minute_of_day(now);
    if (LUNCH_WINDOW_START_MIN..LUNCH_WINDOW_END_MIN).contains(&minute) && eats_lunch(rng) {
        return NextStop::Restaurant(choose_restaurant(rng));
    }
    NextStop::Ride(next)
}

/// Apply [decide_next_stop] to a live party: schedule the follow-up event or
/// complete the visit.
#[allow(clippy::too_many_arguments)]
pub fn route_onward(
    entity: Entity,
    clock: &mut SimulationClock,
    park: &Park,
    rng: &mut StdRng,
    telemetry: &mut ParkTelemetry,
    visitors: &mut Query<(&mut Visitor, Option<&ParentFamily>)>,
    families: &mut Query<&mut FamilyGroup>,
    commands: &mut Commands,
) {
    let (kind, min_age, visited, departure_hour) = {
        let Ok((visitor, _)) = visitors.get(entity) else {
            return;
        };
        if visitor.status == VisitorStatus::Departed {
            return;
        }
        (
            visitor.kind,
            visitor.min_age,
            visitor.visited.clone(),
            visitor.departure_hour,
        )
    };
    match decide_next_stop(park, clock, rng, kind, min_age, &visited, departure_hour) {
        NextStop::Depart => depart_visitor(entity, visitors, families, telemetry, commands),
        NextStop::Restaurant(restaurant) => clock.schedule_in(
            0,
            EventKind::ArriveAtRestaurant,
            Some(EventSubject::AtRestaurant {
                visitor: entity,
                restaurant,
            }),
        ),
        NextStop::Ride(facility) => clock.schedule_in(
            0,
            EventKind::ArriveAtFacility,
            Some(EventSubject::AtFacility {
                visitor: entity,
                facility,
            }),
        ),
    }
}

/// Run a ride's admission machine and wire up the admitted parties: mark the
/// ride visited, clear their queue timers, and schedule their end-of-service.
pub fn run_try_start(
    facility: FacilityId,
    clock: &mut SimulationClock,
    park: &mut Park,
    rng: &mut StdRng,
    visitors: &mut Query<(&mut Visitor, Option<&ParentFamily>)>,
) {
    let now = clock.now();
    let minute = clock.minute_of_day(now);
    let admissions = park.try_start(facility, now, minute, rng);
    for admission in admissions {
        if let Ok((mut visitor, _)) = visitors.get_mut(admission.visitor) {
            visitor.queued_since = None;
            if !visitor.has_visited(facility) {
                visitor.visited.push(facility);
            }
        }
        clock.schedule_after_minutes(
            admission.service_minutes,
            EventKind::EndFacility,
            Some(EventSubject::AtFacility {
                visitor: admission.visitor,
                facility,
            }),
        );
    }
}

/// Complete a party's visit exactly once. Subgroups roll up into their family:
/// the family books a single completion, with the last subgroup's rating and
/// the whole family's head count, when its last subgroup leaves.
pub fn depart_visitor(
    entity: Entity,
    visitors: &mut Query<(&mut Visitor, Option<&ParentFamily>)>,
    families: &mut Query<&mut FamilyGroup>,
    telemetry: &mut ParkTelemetry,
    commands: &mut Commands,
) {
    let (rating, heads, parent) = {
        let Ok((mut visitor, parent)) = visitors.get_mut(entity) else {
            return;
        };
        if visitor.status == VisitorStatus::Departed {
            return;
        }
        debug_assert!(
            visitor.status != VisitorStatus::SplitIntoSubgroups,
            "a split family exits only through its subgroups",
        );
        visitor.status = VisitorStatus::Departed;
        (visitor.rating, visitor.group_size, parent.map(|p| p.0))
    };

    match parent {
        Some(family) => {
            let family_done = {
                let Ok(mut book) = families.get_mut(family) else {
                    return;
                };
                assert!(book.active_subgroups > 0, "subgroup exit underflow");
                book.active_subgroups -= 1;
                book.active_subgroups == 0
            };
            commands.entity(entity).despawn();
            if family_done {
                let family_heads = {
                    let Ok((mut family_visitor, _)) = visitors.get_mut(family) else {
                        return;
                    };
                    assert!(
                        family_visitor.status != VisitorStatus::Departed,
                        "family completed twice",
                    );
                    family_visitor.status = VisitorStatus::Departed;
                    family_visitor.group_size
                };
                book_completion(telemetry, family_heads, rating);
                commands.entity(family).despawn();
            }
        }
        None => {
            if let Ok(mut book) = families.get_mut(entity) {
                // An unsplit family runs its own counter down to zero.
                assert!(book.active_subgroups == 1, "unsplit family counter drifted");
                book.active_subgroups = 0;
            }
            book_completion(telemetry, heads, rating);
            commands.entity(entity).despawn();
        }
    }
}

pub fn book_completion(telemetry: &mut ParkTelemetry, heads: u32, rating: f64) {
    telemetry.record_completion(heads, rating);
    telemetry.add_revenue(photo_package_revenue(rating));
}
