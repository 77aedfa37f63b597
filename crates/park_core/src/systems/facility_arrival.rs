//! Arrival at a ride: queue up, arm the abandonment timer, try to get in.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::SimRng;
use crate::ecs::{ParentFamily, Visitor, VisitorStatus};
use crate::park::Park;
use crate::systems::flow::run_try_start;
use crate::waitqueue::QueueEntry;

pub fn facility_arrival_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
) {
    if event.0.kind != EventKind::ArriveAtFacility {
        return;
    }
    let Some(EventSubject::AtFacility { visitor, facility }) = event.0.subject else {
        return;
    };
    let now = clock.now();

    let (heads, express, threshold_min) = {
        let Ok((mut party, _)) = visitors.get_mut(visitor) else {
            return;
        };
        if party.status != VisitorStatus::InPark {
            return;
        }
        party.queued_since = Some(now);
        (
            party.group_size,
            party.has_express_pass,
            party.abandonment_threshold_min(),
        )
    };

    park.enqueue_visitor(
        facility,
        QueueEntry {
            visitor,
            heads,
            joined_at: now,
        },
        express,
        now,
    );
    // Express parties never walk away; everyone else gets a patience timer.
    if !express {
        clock.schedule_after_minutes(
            threshold_min,
            EventKind::Abandonment,
            Some(EventSubject::AtFacility { visitor, facility }),
        );
    }

    run_try_start(facility, &mut clock, &mut park, &mut rng.0, &mut visitors);
}
