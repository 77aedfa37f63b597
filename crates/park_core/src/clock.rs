//! Simulation time: millisecond-scale timeline with a real-world epoch.
//!
//! All timestamps and `clock.now()` are in **simulation milliseconds**. Time 0 is
//! mapped to a real-world datetime via `epoch_ms` (the park-opening timestamp the
//! scenario was started with). The timeline advances by popping the next scheduled
//! event; same-ms events pop in scheduling order via a monotone sequence number.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::park::{FacilityId, RestaurantKind};

/// One second in simulation milliseconds.
pub const ONE_SEC_MS: u64 = 1000;
/// One minute in simulation milliseconds.
pub const ONE_MIN_MS: u64 = 60 * ONE_SEC_MS;
/// One hour in simulation milliseconds.
pub const ONE_HOUR_MS: u64 = 60 * ONE_MIN_MS;
/// One day in simulation milliseconds.
pub const ONE_DAY_MS: u64 = 24 * ONE_HOUR_MS;

/// Park opening time as a minute-of-day (09:00).
pub const PARK_OPEN_MIN: u64 = 9 * 60;
/// Park closing time as a minute-of-day (19:00).
pub const PARK_CLOSE_MIN: u64 = 19 * 60;

/// Convert a duration in (fractional) minutes to simulation milliseconds.
pub fn mins_to_ms(minutes: f64) -> u64 {
    debug_assert!(minutes >= 0.0, "durations must be non-negative");
    (minutes * ONE_MIN_MS as f64).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SimulationStarted,
    FamilyArrival,
    TeenGroupArrival,
    SingleArrival,
    EndReception,
    ArriveAtFacility,
    Abandonment,
    EndFacility,
    ArriveAtRestaurant,
    EndRestaurantService,
    EndMeal,
    InstructorBreakEnd,
    InstructorLunchEnd,
    EndOfDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSubject {
    Visitor(Entity),
    AtReception { visitor: Entity, clerk: usize },
    AtFacility { visitor: Entity, facility: FacilityId },
    AtRestaurant { visitor: Entity, restaurant: RestaurantKind },
    Instructor { facility: FacilityId, instructor: usize },
}

/// Simulation event. `timestamp` is in **milliseconds** (simulation time).
/// `seq` is assigned by the clock at scheduling time and breaks timestamp ties,
/// so equal-time events dispatch in FIFO order regardless of heap internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub seq: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by timestamp; same timestamp ordered by insertion sequence.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Simulation clock: time in **milliseconds**, advances to the next scheduled event.
/// Time 0 maps to a real-world datetime via `epoch_ms`.
#[derive(Debug, Clone, Resource)]
pub struct SimulationClock {
    /// Current simulation time in ms (updated when an event is popped).
    now: u64,
    /// Real-world ms corresponding to simulation time 0.
    epoch_ms: i64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            now: 0,
            epoch_ms: 0,
            next_seq: 0,
            events: BinaryHeap::new(),
        }
    }
}

impl SimulationClock {
    /// Clock with time 0 mapped to the given real-world ms.
    pub fn with_epoch(epoch_ms: i64) -> Self {
        Self {
            epoch_ms,
            ..Self::default()
        }
    }

    /// Current simulation time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Real-world ms that corresponds to simulation time 0.
    pub fn epoch_ms(&self) -> i64 {
        self.epoch_ms
    }

    /// Convert simulation ms to real-world ms (epoch_ms + sim_ms).
    pub fn sim_to_real_ms(&self, sim_ms: u64) -> i64 {
        self.epoch_ms.saturating_add(sim_ms as i64)
    }

    /// Minute of day (0..1440) at the given simulation time.
    pub fn minute_of_day(&self, sim_ms: u64) -> u64 {
        let real = self.sim_to_real_ms(sim_ms);
        (real.rem_euclid(ONE_DAY_MS as i64) as u64) / ONE_MIN_MS
    }

    /// Real-world ms of midnight of the day containing the given simulation time.
    pub fn day_start_real_ms(&self, sim_ms: u64) -> i64 {
        let real = self.sim_to_real_ms(sim_ms);
        real - real.rem_euclid(ONE_DAY_MS as i64)
    }

    /// Real-world ms of the given hour-of-day (fractional) on the day containing `sim_ms`.
    pub fn real_ms_at_hour_of_day(&self, sim_ms: u64, hour: f64) -> i64 {
        self.day_start_real_ms(sim_ms) + (hour * ONE_HOUR_MS as f64).round() as i64
    }

    /// Simulation ms of the next occurrence of `minute_of_day` strictly after `from_sim_ms`.
    pub fn sim_ms_at_next_minute_of_day(&self, from_sim_ms: u64, minute_of_day: u64) -> u64 {
        debug_assert!(minute_of_day < 24 * 60);
        let real = self.sim_to_real_ms(from_sim_ms);
        let mut target = self.day_start_real_ms(from_sim_ms) + (minute_of_day * ONE_MIN_MS) as i64;
        if target <= real {
            target += ONE_DAY_MS as i64;
        }
        debug_assert!(target >= self.epoch_ms, "target precedes the simulation epoch");
        (target - self.epoch_ms) as u64
    }

    /// Schedule an event at a specific simulation timestamp (ms).
    pub fn schedule_at(&mut self, at_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(at_ms >= self.now, "event timestamp must be >= current time");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp: at_ms,
            seq,
            kind,
            subject,
        });
    }

    /// Schedule an event at `now + delta_ms` (relative, in ms).
    pub fn schedule_in(&mut self, delta_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(self.now.saturating_add(delta_ms), kind, subject);
    }

    /// Schedule an event `minutes` (fractional) from now.
    pub fn schedule_after_minutes(
        &mut self,
        minutes: f64,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) {
        self.schedule_in(mins_to_ms(minutes), kind, subject);
    }

    /// Pop the next event (earliest timestamp, FIFO among equal timestamps).
    /// Advances `now` to that timestamp.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    /// Timestamp of the next scheduled event without popping it.
    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|event| event.timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events still in the queue (for tests and scenario validation).
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}
