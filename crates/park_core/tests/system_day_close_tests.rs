mod support;

use park_core::clock::{EventKind, ONE_HOUR_MS, ONE_MIN_MS};
use park_core::ecs::VisitorKind;
use park_core::park::{Park, PIPES_RIVER};
use park_core::scenario::ParkParams;
use park_core::waitqueue::QueueEntry;
use support::TestHarness;

#[test]
fn day_close_archives_stats_and_seeds_tomorrow() {
    let mut h = TestHarness::bare(ParkParams::default().with_seed(2));
    // Leave one party in the Pipes River queue for the final length sample.
    let teens = h.spawn_party(VisitorKind::TeenGroup, 3, 14.0, 19.0);
    {
        let mut park = h.world.resource_mut::<Park>();
        park.enqueue_visitor(
            PIPES_RIVER,
            QueueEntry {
                visitor: teens,
                heads: 3,
                joined_at: 9 * ONE_HOUR_MS,
            },
            false,
            9 * ONE_HOUR_MS,
        );
    }

    // 19:00 is ten hours after the 09:00 epoch.
    h.schedule_event(10 * ONE_HOUR_MS, EventKind::EndOfDay, None);
    assert!(h.step());

    {
        let park = h.world.resource::<Park>();
        let regular = &park.facility(PIPES_RIVER).queue_regular;
        assert_eq!(regular.daily_avg_queue_lengths.len(), 1);
        // One party queued from 18:00 to 19:00 over the 600-minute day.
        assert!((regular.daily_avg_queue_lengths[0] - 60.0 / 600.0).abs() < 1e-9);
        assert_eq!(regular.daily_avg_waiting_times, vec![0.0]);
        assert_eq!(park.reception.queue.daily_avg_queue_lengths.len(), 1);
    }

    // Tomorrow is seeded: family + single at 09:00, teens at 10:00, and the
    // next day close at 19:00.
    assert_eq!(h.clock().pending_event_count(), 4);
    assert_eq!(h.clock().next_event_time(), Some(24 * ONE_HOUR_MS));
}

#[test]
fn idle_day_archives_zeroes() {
    let mut h = TestHarness::bare(ParkParams::default().with_seed(2));
    h.schedule_event(10 * ONE_HOUR_MS - ONE_MIN_MS, EventKind::EndOfDay, None);
    assert!(h.step());
    let park = h.world.resource::<Park>();
    for facility in &park.facilities {
        assert_eq!(facility.queue_regular.daily_avg_queue_lengths, vec![0.0]);
        assert_eq!(facility.queue_regular.daily_avg_waiting_times, vec![0.0]);
        assert_eq!(facility.queue_express.daily_avg_queue_lengths, vec![0.0]);
    }
    for restaurant in &park.restaurants {
        assert_eq!(restaurant.queue.daily_avg_queue_lengths, vec![0.0]);
    }
}
