//! End of service at a ride: free the ride's resources, let waiting parties
//! in, score the experience, maybe split the family, and move everyone on.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use rand::rngs::StdRng;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::{
    family_splits, had_good_experience, positive_rating_delta, split_group_count, SimRng,
};
use crate::ecs::{
    plan_family_split, FamilyGroup, ParentFamily, SubGroupPlan, Visitor, VisitorKind,
    VisitorStatus,
};
use crate::park::{Park, INSTRUCTOR_BREAK_MIN};
use crate::systems::flow::{book_completion, decide_next_stop, route_onward, run_try_start, NextStop};
use crate::telemetry::ParkTelemetry;

/// A lackluster ride costs this much rating.
const BAD_EXPERIENCE_PENALTY: f64 = 0.1;

#[allow(clippy::too_many_arguments)]
pub fn facility_end_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut commands: Commands,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
    mut families: Query<&mut FamilyGroup>,
) {
    if event.0.kind != EventKind::EndFacility {
        return;
    }
    let Some(EventSubject::AtFacility { visitor, facility }) = event.0.subject else {
        return;
    };
    let now = clock.now();

    let finish = park.finish_service(facility, visitor, now);
    if !finish.was_in_service {
        return;
    }
    if let Some(instructor) = finish.instructor_to_break {
        clock.schedule_after_minutes(
            INSTRUCTOR_BREAK_MIN,
            EventKind::InstructorBreakEnd,
            Some(EventSubject::Instructor {
                facility,
                instructor,
            }),
        );
    }

    // The freed tubes/seats/headroom may admit whoever is waiting.
    run_try_start(facility, &mut clock, &mut park, &mut rng.0, &mut visitors);

    // Experience verdict lands on the pre-split party; subgroups inherit it.
    let adrenaline = park.facility(facility).adrenaline_level;
    let (kind, rating, express, departure_hour) = {
        let Ok((mut party, _)) = visitors.get_mut(visitor) else {
            return;
        };
        if party.status != VisitorStatus::InPark {
            return;
        }
        if had_good_experience(&mut rng.0) {
            let delta = positive_rating_delta(party.group_size, adrenaline);
            party.raise_rating(delta);
        } else {
            party.lower_rating(BAD_EXPERIENCE_PENALTY);
        }
        (
            party.kind,
            party.rating,
            party.has_express_pass,
            party.departure_hour,
        )
    };

    if kind == VisitorKind::Family {
        let plans = match families.get(visitor) {
            Ok(book) if !book.is_split && family_splits(&mut rng.0) => {
                let groups = split_group_count(&mut rng.0);
                plan_family_split(&book.kids_ages, groups, book.total_size)
            }
            _ => None,
        };
        if let Some(plans) = plans {
            split_family(
                visitor,
                &plans,
                rating,
                express,
                departure_hour,
                &mut clock,
                &park,
                &mut rng.0,
                &mut telemetry,
                &mut visitors,
                &mut families,
                &mut commands,
            );
            return;
        }
    }

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

/// Replace the post-ride family with its subgroups. Each subgroup inherits the
/// family's (already updated) rating, express pass, and departure time; ones
/// already past departure leave on the spot and never rejoin the flow.
#[allow(clippy::too_many_arguments)]
fn split_family(
    family: Entity,
    plans: &[SubGroupPlan],
    rating: f64,
    express: bool,
    departure_hour: f64,
    clock: &mut SimulationClock,
    park: &Park,
    rng: &mut StdRng,
    telemetry: &mut ParkTelemetry,
    visitors: &mut Query<(&mut Visitor, Option<&ParentFamily>)>,
    families: &mut Query<&mut FamilyGroup>,
    commands: &mut Commands,
) {
    {
        let Ok((mut family_visitor, _)) = visitors.get_mut(family) else {
            return;
        };
        family_visitor.status = VisitorStatus::SplitIntoSubgroups;
    }
    {
        let Ok(mut book) = families.get_mut(family) else {
            return;
        };
        book.is_split = true;
    }

    let mut active = 0u32;
    for plan in plans {
        let next = decide_next_stop(
            park,
            clock,
            rng,
            VisitorKind::SubGroup,
            plan.min_age,
            &[],
            departure_hour,
        );
        if next == NextStop::Depart {
            continue;
        }
        let mut subgroup = Visitor::new(
            VisitorKind::SubGroup,
            plan.size,
            plan.min_age,
            departure_hour,
        );
        subgroup.rating = rating;
        subgroup.has_express_pass = express;
        let entity = commands.spawn((subgroup, ParentFamily(family))).id();
        active += 1;
        match next {
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
            NextStop::Depart => unreachable!("departing subgroups are skipped"),
        }
    }

    if active == 0 {
        // Every subgroup was already past departure: the family leaves whole.
        let heads = {
            let Ok((mut family_visitor, _)) = visitors.get_mut(family) else {
                return;
            };
            family_visitor.status = VisitorStatus::Departed;
            family_visitor.group_size
        };
        book_completion(telemetry, heads, rating);
        commands.entity(family).despawn();
    } else if let Ok(mut book) = families.get_mut(family) {
        book.active_subgroups = active;
    }
}
