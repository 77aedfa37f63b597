mod support;

use park_core::clock::{EventKind, EventSubject, ONE_HOUR_MS, ONE_MIN_MS};
use park_core::park::{InstructorState, Park, SNORKEL_TOUR};
use park_core::scenario::ParkParams;
use support::TestHarness;

fn instructor_subject(index: usize) -> Option<EventSubject> {
    Some(EventSubject::Instructor {
        facility: SNORKEL_TOUR,
        instructor: index,
    })
}

#[test]
fn break_ending_in_lunch_window_rolls_into_lunch_until_two() {
    // Epoch at 09:00: 13:10 is 4h10m into the simulation.
    let mut h = TestHarness::bare(ParkParams::default().with_seed(1));
    {
        let mut park = h.world.resource_mut::<Park>();
        park.set_instructor_state(SNORKEL_TOUR, 0, InstructorState::OnBreak, None);
    }
    let break_end = 4 * ONE_HOUR_MS + 10 * ONE_MIN_MS;
    h.schedule_event(break_end, EventKind::InstructorBreakEnd, instructor_subject(0));

    assert!(h.step());
    {
        let park = h.world.resource::<Park>();
        assert_eq!(
            park.facility(SNORKEL_TOUR).instructor(0).map(|i| i.state),
            Some(InstructorState::OnLunch),
        );
    }

    // Lunch ends at exactly 14:00.
    assert!(h.step());
    assert_eq!(h.clock().now(), 5 * ONE_HOUR_MS);
    let park = h.world.resource::<Park>();
    assert_eq!(
        park.facility(SNORKEL_TOUR).instructor(0).map(|i| i.state),
        Some(InstructorState::Available),
    );
}

#[test]
fn break_ending_after_two_goes_straight_to_available() {
    let mut h = TestHarness::bare(ParkParams::default().with_seed(1));
    {
        let mut park = h.world.resource_mut::<Park>();
        park.set_instructor_state(SNORKEL_TOUR, 1, InstructorState::OnBreak, None);
    }
    // 14:00 sharp is outside the 13:00-14:00 lunch window.
    h.schedule_event(5 * ONE_HOUR_MS, EventKind::InstructorBreakEnd, instructor_subject(1));

    assert!(h.step());
    let park = h.world.resource::<Park>();
    assert_eq!(
        park.facility(SNORKEL_TOUR).instructor(1).map(|i| i.state),
        Some(InstructorState::Available),
    );
    assert_eq!(h.clock().pending_event_count(), 0);
}

#[test]
fn break_ending_before_one_goes_straight_to_available() {
    let mut h = TestHarness::bare(ParkParams::default().with_seed(1));
    {
        let mut park = h.world.resource_mut::<Park>();
        park.set_instructor_state(SNORKEL_TOUR, 0, InstructorState::OnBreak, None);
    }
    // 12:50: before the lunch window, so no lunch is taken.
    let break_end = 3 * ONE_HOUR_MS + 50 * ONE_MIN_MS;
    h.schedule_event(break_end, EventKind::InstructorBreakEnd, instructor_subject(0));

    assert!(h.step());
    let park = h.world.resource::<Park>();
    assert_eq!(
        park.facility(SNORKEL_TOUR).instructor(0).map(|i| i.state),
        Some(InstructorState::Available),
    );
}
