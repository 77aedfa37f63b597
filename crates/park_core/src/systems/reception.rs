//! Reception: ticket and wristband service, entry fees, and the first routing.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::{ticket_time_min, wristband_time_min, SimRng};
use crate::ecs::{FamilyGroup, ParentFamily, Visitor, VisitorStatus};
use crate::park::Park;
use crate::pricing::{entry_fee, express_surcharge};
use crate::router::{choose_facility, RoutingRequest};
use crate::systems::flow::depart_visitor;
use crate::telemetry::ParkTelemetry;

/// Penalty for finding nothing to ride straight out of reception.
const NO_FACILITY_PENALTY: f64 = 0.5;

#[allow(clippy::too_many_arguments)]
pub fn end_reception_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut commands: Commands,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
    mut families: Query<&mut FamilyGroup>,
) {
    if event.0.kind != EventKind::EndReception {
        return;
    }
    let Some(EventSubject::AtReception { visitor, clerk }) = event.0.subject else {
        return;
    };
    let now = clock.now();
    park.reception.clerk_done(clerk);

    let snapshot = match visitors.get(visitor) {
        Ok((served, _)) if served.status == VisitorStatus::InPark => Some((
            served.kind,
            served.group_size,
            served.min_age,
            served.has_express_pass,
            served.visited.clone(),
        )),
        _ => None,
    };
    if let Some((kind, group_size, min_age, express, visited)) = snapshot {
        let num_kids = families
            .get(visitor)
            .map(|book| book.kids_ages.len() as u32)
            .unwrap_or(0);

        telemetry.record_entry(group_size);
        let mut revenue = entry_fee(kind, group_size, num_kids);
        if express {
            revenue += express_surcharge(group_size);
        }
        telemetry.add_revenue(revenue);

        let request = RoutingRequest {
            kind,
            min_age,
            visited: &visited,
            first_visit: true,
        };
        match choose_facility(&park, &request) {
            Some(facility) => clock.schedule_in(
                0,
                EventKind::ArriveAtFacility,
                Some(EventSubject::AtFacility { visitor, facility }),
            ),
            None => {
                if let Ok((mut served, _)) = visitors.get_mut(visitor) {
                    served.lower_rating(NO_FACILITY_PENALTY);
                }
                depart_visitor(
                    visitor,
                    &mut visitors,
                    &mut families,
                    &mut telemetry,
                    &mut commands,
                );
            }
        }
    }

    // Hand the clerk straight to the next party in line.
    if let Some(next) = park.reception.queue.pop_front(now) {
        park.reception.begin_service(clerk);
        let minutes = ticket_time_min(&mut rng.0) + wristband_time_min(&mut rng.0);
        clock.schedule_after_minutes(
            minutes,
            EventKind::EndReception,
            Some(EventSubject::AtReception {
                visitor: next.visitor,
                clerk,
            }),
        );
    }
}
