//! Snorkel instructor breaks and lunch.
//!
//! A break that ends inside the 13:00-14:00 window rolls straight into lunch
//! until 14:00; together with the midday tour freeze this keeps tours clear of
//! lunchtime.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::SimRng;
use crate::ecs::{ParentFamily, Visitor};
use crate::park::{InstructorState, Park, INSTRUCTOR_LUNCH_END_MIN, INSTRUCTOR_LUNCH_START_MIN};
use crate::systems::flow::run_try_start;

pub fn instructor_break_end_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
) {
    if event.0.kind != EventKind::InstructorBreakEnd {
        return;
    }
    let Some(EventSubject::Instructor {
        facility,
        instructor,
    }) = event.0.subject
    else {
        return;
    };
    let now = clock.now();
    let minute = clock.minute_of_day(now);

    if (INSTRUCTOR_LUNCH_START_MIN..INSTRUCTOR_LUNCH_END_MIN).contains(&minute) {
        let lunch_over = clock.sim_ms_at_next_minute_of_day(now, INSTRUCTOR_LUNCH_END_MIN);
        park.set_instructor_state(
            facility,
            instructor,
            InstructorState::OnLunch,
            Some(lunch_over),
        );
        clock.schedule_at(
            lunch_over,
            EventKind::InstructorLunchEnd,
            Some(EventSubject::Instructor {
                facility,
                instructor,
            }),
        );
        return;
    }

    park.set_instructor_state(facility, instructor, InstructorState::Available, None);
    run_try_start(facility, &mut clock, &mut park, &mut rng.0, &mut visitors);
}

pub fn instructor_lunch_end_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    mut park: ResMut<Park>,
    mut visitors: Query<(&mut Visitor, Option<&ParentFamily>)>,
) {
    if event.0.kind != EventKind::InstructorLunchEnd {
        return;
    }
    let Some(EventSubject::Instructor {
        facility,
        instructor,
    }) = event.0.subject
    else {
        return;
    };
    park.set_instructor_state(facility, instructor, InstructorState::Available, None);
    run_try_start(facility, &mut clock, &mut park, &mut rng.0, &mut visitors);
}
