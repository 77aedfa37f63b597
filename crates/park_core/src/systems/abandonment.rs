//! Queue abandonment, racing against service.
//!
//! Timers are never cancelled; a fired timer checks that the party is still in
//! one of the ride's queues and has genuinely waited out its threshold since
//! its current queue entry, so a party that got served (or re-queued) in the
//! meantime is left alone.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{mins_to_ms, CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::{teen_buys_express_after_abandon, SimRng};
use crate::ecs::{FamilyGroup, ParentFamily, Visitor, VisitorKind, VisitorStatus};
use crate::park::Park;
use crate::pricing::express_surcharge;
use crate::systems::flow::route_onward;
use crate::telemetry::ParkTelemetry;

/// Walking away from a queue costs this much rating.
const ABANDONMENT_PENALTY: f64 = 0.8;

#[allow(clippy::too_many_arguments)]
pub fn abandonment_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut telemetry: ResMut<ParkTelemetry>,
    mut commands: Commands,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
    mut families: Query<&mut FamilyGroup>,
) {
    if event.0.kind != EventKind::Abandonment {
        return;
    }
    let Some(EventSubject::AtFacility { visitor, facility }) = event.0.subject else {
        return;
    };
    let now = clock.now();

    // Resolve the race with service: only a party still queued here, past its
    // patience since its current queue entry, actually walks.
    {
        let Ok((party, _)) = visitors.get(visitor) else {
            return;
        };
        if party.status != VisitorStatus::InPark || party.has_express_pass {
            return;
        }
        let Some(queued_since) = party.queued_since else {
            return;
        };
        if now.saturating_sub(queued_since) < mins_to_ms(party.abandonment_threshold_min()) {
            return;
        }
    }
    if !park.is_queued(facility, visitor) {
        return;
    }
    let removed = park.abandon(facility, visitor, now);
    debug_assert!(removed, "queued party must be removable");

    let mut bought_express = false;
    let mut heads = 0;
    {
        let Ok((mut party, _)) = visitors.get_mut(visitor) else {
            return;
        };
        party.lower_rating(ABANDONMENT_PENALTY);
        party.abandon_count += 1;
        party.queued_since = None;
        if party.kind == VisitorKind::TeenGroup
            && !party.has_express_pass
            && teen_buys_express_after_abandon(&mut rng.0)
        {
            party.has_express_pass = true;
            heads = party.group_size;
            bought_express = true;
        }
    }

    if bought_express {
        // Pay for the passes and rejoin the same ride on the fast lane.
        telemetry.add_revenue(express_surcharge(heads));
        clock.schedule_in(
            0,
            EventKind::ArriveAtFacility,
            Some(EventSubject::AtFacility { visitor, facility }),
        );
    } else {
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
}
