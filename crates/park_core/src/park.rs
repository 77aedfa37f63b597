//! The park: ride facilities, reception, and restaurants in one resource.
//!
//! Each ride owns a regular and an express queue, the set of parties currently
//! in service, and whatever private resources its admission rule needs (tubes,
//! lane cooldowns, batch size, instructors). `try_start` runs the admission
//! state machine of §-style per-ride rules and reports who got in and for how
//! long; the event systems turn those admissions into end-of-service events.

use bevy_ecs::prelude::{Entity, Resource};
use rand::rngs::StdRng;

use crate::clock::mins_to_ms;
use crate::distributions::{
    exponential, kids_pool_duration_min, pipes_river_duration_min, positive_normal,
    snorkel_tour_duration_min, wave_pool_duration_min,
};
use crate::waitqueue::{QueueEntry, WaitQueue};

/// Index of a facility in [Park::facilities]; doubles as the router's
/// insertion-order tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacilityId(pub usize);

pub const PIPES_RIVER: FacilityId = FacilityId(0);
pub const SINGLE_SLIDE: FacilityId = FacilityId(1);
pub const BIG_PIPES_SLIDE: FacilityId = FacilityId(2);
pub const SMALL_PIPES_SLIDE: FacilityId = FacilityId(3);
pub const WAVE_POOL: FacilityId = FacilityId(4);
pub const KIDS_POOL: FacilityId = FacilityId(5);
pub const SNORKEL_TOUR: FacilityId = FacilityId(6);
pub const FACILITY_COUNT: usize = 7;

/// Tubes on the Pipes River; each seats two people.
pub const TUBE_COUNT: u32 = 60;
/// Lanes on the Single Slide.
pub const SLIDE_LANES: usize = 2;
/// Per-lane cooldown between launches, in ms (0.5 minutes).
pub const LANE_COOLDOWN_MS: u64 = 30_000;
/// Fixed ride time on the Single Slide, in minutes.
pub const SINGLE_SLIDE_RIDE_MIN: f64 = 3.0;
/// Snorkel tours may not start from 12:20 (inclusive) to 14:00 (exclusive).
pub const SNORKEL_RESTRICTED_START_MIN: u64 = 12 * 60 + 20;
pub const SNORKEL_RESTRICTED_END_MIN: u64 = 14 * 60;
/// Instructor rest after guiding a tour, in minutes.
pub const INSTRUCTOR_BREAK_MIN: f64 = 30.0;
/// A break ending between 13:00 and 14:00 rolls into lunch until 14:00.
pub const INSTRUCTOR_LUNCH_START_MIN: u64 = 13 * 60;
pub const INSTRUCTOR_LUNCH_END_MIN: u64 = 14 * 60;
/// Statistics window of every queue: the 10-hour operating day, in minutes.
pub const STATS_WINDOW_MIN: f64 = 600.0;

/// A party currently using a facility (or eating at a restaurant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEntry {
    pub visitor: Entity,
    pub heads: u32,
}

/// Two odd-sized parties sharing tubes on the Pipes River. The tubes come back
/// only when the second of the two leaves the water.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TubePair {
    pub a: Entity,
    pub b: Entity,
    pub tubes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructorState {
    Available,
    OnTour,
    OnBreak,
    OnLunch,
}

#[derive(Debug, Clone, Copy)]
pub struct Instructor {
    pub state: InstructorState,
    /// When the current tour/break/lunch ends, in simulation ms.
    pub until_ms: Option<u64>,
}

impl Instructor {
    fn available() -> Self {
        Self {
            state: InstructorState::Available,
            until_ms: None,
        }
    }
}

/// Service-duration family of a batch slide.
#[derive(Debug, Clone, Copy)]
pub enum BatchService {
    Gaussian { mean: f64, std_dev: f64 },
    Exponential { rate: f64 },
}

/// Service-duration family of a headcount pool.
#[derive(Debug, Clone, Copy)]
pub enum PoolService {
    WavePool,
    KidsPool,
}

/// Per-ride admission state.
#[derive(Debug, Clone)]
pub enum RideState {
    /// Tube pool with odd-party pairing.
    TubeRiver {
        tubes_in_use: u32,
        pairs: Vec<TubePair>,
    },
    /// Per-lane launch cooldowns.
    LaneSlide {
        last_entry_ms: [Option<u64>; SLIDE_LANES],
    },
    /// Admits only batches summing exactly to `batch_heads`.
    BatchSlide {
        batch_heads: u32,
        service: BatchService,
    },
    /// Headcount-limited pool, first party that fits gets in.
    HeadcountPool { service: PoolService },
    /// Instructor-guided tours.
    GuidedTour {
        instructors: [Instructor; 2],
        assignments: Vec<(Entity, usize)>,
    },
}

#[derive(Debug)]
pub struct Facility {
    pub name: &'static str,
    /// Headcount capacity (tour size for the Snorkel Tour).
    pub capacity: u32,
    /// Minimum age to ride; 0 means no floor.
    pub age_limit: f64,
    /// Ride intensity, 1-5.
    pub adrenaline_level: u8,
    /// Present on kids-only facilities: the oldest min-age admitted.
    pub kids_age_ceiling: Option<f64>,
    pub queue_regular: WaitQueue,
    pub queue_express: WaitQueue,
    in_service: Vec<ServiceEntry>,
    state: RideState,
}

/// One admitted party and its sampled ride time.
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    pub visitor: Entity,
    pub service_minutes: f64,
}

/// What happened when a party's service ended.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinishOutcome {
    pub was_in_service: bool,
    /// Set when this exit sent a tour instructor on break.
    pub instructor_to_break: Option<usize>,
}

impl Facility {
    fn new(
        name: &'static str,
        capacity: u32,
        age_limit: f64,
        adrenaline_level: u8,
        state: RideState,
    ) -> Self {
        Self {
            name,
            capacity,
            age_limit,
            adrenaline_level,
            kids_age_ceiling: None,
            queue_regular: WaitQueue::new(STATS_WINDOW_MIN),
            queue_express: WaitQueue::new(STATS_WINDOW_MIN),
            in_service: Vec::new(),
            state,
        }
    }

    pub fn total_waiting(&self) -> usize {
        self.queue_regular.len() + self.queue_express.len()
    }

    pub fn in_service(&self) -> &[ServiceEntry] {
        &self.in_service
    }

    pub fn heads_in_service(&self) -> u32 {
        self.in_service.iter().map(|e| e.heads).sum()
    }

    pub fn is_kids_only(&self) -> bool {
        self.kids_age_ceiling.is_some()
    }

    pub fn tubes_in_use(&self) -> u32 {
        match &self.state {
            RideState::TubeRiver { tubes_in_use, .. } => *tubes_in_use,
            _ => 0,
        }
    }

    pub fn instructor(&self, index: usize) -> Option<&Instructor> {
        match &self.state {
            RideState::GuidedTour { instructors, .. } => instructors.get(index),
            _ => None,
        }
    }

    fn try_start(&mut self, now: u64, minute_of_day: u64, rng: &mut StdRng) -> Vec<Admission> {
        match self.state {
            RideState::TubeRiver { .. } => self.try_start_tube_river(now, rng),
            RideState::LaneSlide { .. } => self.try_start_lane_slide(now),
            RideState::BatchSlide { .. } => self.try_start_batch_slide(now, rng),
            RideState::HeadcountPool { .. } => self.try_start_headcount_pool(now, rng),
            RideState::GuidedTour { .. } => self.try_start_guided_tour(now, minute_of_day, rng),
        }
    }

    /// Pipes River: even parties take group_size/2 tubes. An odd party at the
    /// head must share with another odd party (rest of its queue first, then
    /// the regular queue when the head is express); with no partner in sight
    /// it blocks its queue rather than letting regular jump ahead.
    fn try_start_tube_river(&mut self, now: u64, rng: &mut StdRng) -> Vec<Admission> {
        let mut admissions = Vec::new();
        loop {
            let from_express = !self.queue_express.is_empty();
            let head = if from_express {
                self.queue_express.front()
            } else {
                self.queue_regular.front()
            };
            let Some(head) = head else { break };
            let head_heads = head.heads;

            let RideState::TubeRiver { tubes_in_use, .. } = &mut self.state else {
                unreachable!("tube river state");
            };

            if head_heads % 2 == 0 {
                let needed = head_heads / 2;
                if *tubes_in_use + needed > TUBE_COUNT {
                    break;
                }
                let popped = if from_express {
                    self.queue_express.pop_front(now)
                } else {
                    self.queue_regular.pop_front(now)
                };
                let entry = popped.expect("non-empty queue head");
                *tubes_in_use += needed;
                self.in_service.push(ServiceEntry {
                    visitor: entry.visitor,
                    heads: entry.heads,
                });
                admissions.push(Admission {
                    visitor: entry.visitor,
                    service_minutes: pipes_river_duration_min(rng),
                });
                continue;
            }

            // Odd head: look for another odd party to share tubes with.
            let partner = if from_express {
                self.queue_express
                    .iter()
                    .enumerate()
                    .skip(1)
                    .find(|(_, e)| e.heads % 2 == 1)
                    .map(|(i, e)| (true, i, e.heads))
                    .or_else(|| {
                        self.queue_regular
                            .iter()
                            .enumerate()
                            .find(|(_, e)| e.heads % 2 == 1)
                            .map(|(i, e)| (false, i, e.heads))
                    })
            } else {
                self.queue_regular
                    .iter()
                    .enumerate()
                    .skip(1)
                    .find(|(_, e)| e.heads % 2 == 1)
                    .map(|(i, e)| (false, i, e.heads))
            };
            let Some((partner_express, partner_idx, partner_heads)) = partner else {
                break; // wait for another odd party
            };

            let shared = (head_heads + partner_heads).div_ceil(2);
            if *tubes_in_use + shared > TUBE_COUNT {
                break; // both stay exactly where they were
            }
            *tubes_in_use += shared;

            let popped = if from_express {
                self.queue_express.pop_front(now)
            } else {
                self.queue_regular.pop_front(now)
            };
            let head_entry = popped.expect("non-empty queue head");
            // Popping the head shifts the partner's index when both share a queue.
            let partner_idx = if partner_express == from_express {
                partner_idx - 1
            } else {
                partner_idx
            };
            let taken = if partner_express {
                self.queue_express.take_at(partner_idx, now)
            } else {
                self.queue_regular.take_at(partner_idx, now)
            };
            let partner_entry = taken.expect("partner entry");

            let RideState::TubeRiver { pairs, .. } = &mut self.state else {
                unreachable!("tube river state");
            };
            pairs.push(TubePair {
                a: head_entry.visitor,
                b: partner_entry.visitor,
                tubes: shared,
            });
            for entry in [head_entry, partner_entry] {
                self.in_service.push(ServiceEntry {
                    visitor: entry.visitor,
                    heads: entry.heads,
                });
                admissions.push(Admission {
                    visitor: entry.visitor,
                    service_minutes: pipes_river_duration_min(rng),
                });
            }
        }
        admissions
    }

    /// Single Slide: launch whoever is next (express first) on any lane whose
    /// cooldown has elapsed.
    fn try_start_lane_slide(&mut self, now: u64) -> Vec<Admission> {
        let mut admissions = Vec::new();
        while !self.queue_express.is_empty() || !self.queue_regular.is_empty() {
            let RideState::LaneSlide { last_entry_ms } = &mut self.state else {
                unreachable!("lane slide state");
            };
            let lane = last_entry_ms
                .iter()
                .position(|last| last.map_or(true, |t| now.saturating_sub(t) >= LANE_COOLDOWN_MS));
            let Some(lane) = lane else { break };

            let popped = if !self.queue_express.is_empty() {
                self.queue_express.pop_front(now)
            } else {
                self.queue_regular.pop_front(now)
            };
            let entry = popped.expect("non-empty queue");

            last_entry_ms[lane] = Some(now);
            self.in_service.push(ServiceEntry {
                visitor: entry.visitor,
                heads: entry.heads,
            });
            admissions.push(Admission {
                visitor: entry.visitor,
                service_minutes: SINGLE_SLIDE_RIDE_MIN,
            });
        }
        admissions
    }

    /// Big/Small Pipes Slide: admit a set of parties whose heads sum exactly
    /// to the tube size, preferring earlier queue positions (express entries
    /// ahead of regular). Anything short of an exact sum admits nobody and
    /// leaves both queues untouched.
    fn try_start_batch_slide(&mut self, now: u64, rng: &mut StdRng) -> Vec<Admission> {
        if !self.in_service.is_empty() {
            return Vec::new();
        }
        let RideState::BatchSlide { batch_heads, service } = &self.state else {
            unreachable!("batch slide state");
        };
        let (batch_heads, service) = (*batch_heads, *service);

        let express_len = self.queue_express.len();
        let heads: Vec<u32> = self
            .queue_express
            .iter()
            .chain(self.queue_regular.iter())
            .map(|e| e.heads)
            .collect();
        let Some(picked) = exact_subset(&heads, batch_heads) else {
            return Vec::new();
        };

        // Remove back-to-front so earlier indices stay valid, then restore
        // pick order for the admissions.
        let mut entries: Vec<QueueEntry> = Vec::with_capacity(picked.len());
        for &i in picked.iter().rev() {
            let taken = if i < express_len {
                self.queue_express.take_at(i, now)
            } else {
                self.queue_regular.take_at(i - express_len, now)
            };
            entries.push(taken.expect("picked entry"));
        }
        entries.reverse();

        let minutes = match service {
            BatchService::Gaussian { mean, std_dev } => positive_normal(rng, mean, std_dev),
            BatchService::Exponential { rate } => exponential(rng, rate),
        };
        let mut admissions = Vec::with_capacity(entries.len());
        for entry in entries {
            self.in_service.push(ServiceEntry {
                visitor: entry.visitor,
                heads: entry.heads,
            });
            admissions.push(Admission {
                visitor: entry.visitor,
                service_minutes: minutes,
            });
        }
        debug_assert_eq!(self.heads_in_service(), batch_heads);
        admissions
    }

    /// Wave/Kids Pool: admit the first express party that fits the remaining
    /// headcount, rescanning from the front after every admission; fall back
    /// to the regular queue only when no express party fits.
    fn try_start_headcount_pool(&mut self, now: u64, rng: &mut StdRng) -> Vec<Admission> {
        let RideState::HeadcountPool { service } = &self.state else {
            unreachable!("headcount pool state");
        };
        let service = *service;
        let capacity = self.capacity;
        let mut admissions = Vec::new();
        loop {
            let used = self.heads_in_service();
            let express_fit = self
                .queue_express
                .iter()
                .position(|e| used + e.heads <= capacity);
            let regular_fit = self
                .queue_regular
                .iter()
                .position(|e| used + e.heads <= capacity);
            let picked = if let Some(i) = express_fit {
                self.queue_express.take_at(i, now)
            } else if let Some(i) = regular_fit {
                self.queue_regular.take_at(i, now)
            } else {
                break;
            };
            let entry = picked.expect("picked entry");
            self.in_service.push(ServiceEntry {
                visitor: entry.visitor,
                heads: entry.heads,
            });
            let minutes = match service {
                PoolService::WavePool => wave_pool_duration_min(rng),
                PoolService::KidsPool => kids_pool_duration_min(rng),
            };
            admissions.push(Admission {
                visitor: entry.visitor,
                service_minutes: minutes,
            });
        }
        admissions
    }

    /// Snorkel Tour: outside the midday restriction, a free instructor takes a
    /// group filled greedily from the queues (express first), stopping the
    /// first time the queue head would overflow the tour.
    fn try_start_guided_tour(
        &mut self,
        now: u64,
        minute_of_day: u64,
        rng: &mut StdRng,
    ) -> Vec<Admission> {
        if (SNORKEL_RESTRICTED_START_MIN..SNORKEL_RESTRICTED_END_MIN).contains(&minute_of_day) {
            return Vec::new();
        }
        let RideState::GuidedTour { instructors, .. } = &self.state else {
            unreachable!("guided tour state");
        };
        let Some(idx) = instructors
            .iter()
            .position(|i| i.state == InstructorState::Available)
        else {
            return Vec::new();
        };

        let capacity = self.capacity;
        let mut members: Vec<QueueEntry> = Vec::new();
        let mut size = 0u32;
        loop {
            let source = if !self.queue_express.is_empty() {
                &mut self.queue_express
            } else if !self.queue_regular.is_empty() {
                &mut self.queue_regular
            } else {
                break;
            };
            let head_heads = source.front().map(|e| e.heads).unwrap_or(0);
            if size + head_heads > capacity {
                break; // the head would overflow the tour
            }
            let entry = source.pop_front(now).expect("head");
            size += entry.heads;
            members.push(entry);
        }
        if members.is_empty() {
            return Vec::new();
        }

        let minutes = snorkel_tour_duration_min(rng);
        let RideState::GuidedTour { instructors, assignments } = &mut self.state else {
            unreachable!("guided tour state");
        };
        instructors[idx].state = InstructorState::OnTour;
        instructors[idx].until_ms = Some(now + mins_to_ms(minutes));

        let mut admissions = Vec::with_capacity(members.len());
        for entry in members {
            assignments.push((entry.visitor, idx));
            self.in_service.push(ServiceEntry {
                visitor: entry.visitor,
                heads: entry.heads,
            });
            admissions.push(Admission {
                visitor: entry.visitor,
                service_minutes: minutes,
            });
        }
        admissions
    }

    fn finish_service(&mut self, visitor: Entity, now: u64) -> FinishOutcome {
        let Some(pos) = self.in_service.iter().position(|e| e.visitor == visitor) else {
            return FinishOutcome::default();
        };
        let entry = self.in_service.remove(pos);
        let mut outcome = FinishOutcome {
            was_in_service: true,
            instructor_to_break: None,
        };
        match &mut self.state {
            RideState::TubeRiver { tubes_in_use, pairs } => {
                if let Some(pi) = pairs.iter().position(|p| p.a == visitor || p.b == visitor) {
                    let pair = pairs[pi];
                    let partner = if pair.a == visitor { pair.b } else { pair.a };
                    let partner_riding = self.in_service.iter().any(|e| e.visitor == partner);
                    if !partner_riding {
                        assert!(*tubes_in_use >= pair.tubes, "shared tube release underflow");
                        *tubes_in_use -= pair.tubes;
                        pairs.remove(pi);
                    }
                } else {
                    let release = entry.heads.div_ceil(2);
                    assert!(*tubes_in_use >= release, "tube release underflow");
                    *tubes_in_use -= release;
                }
            }
            RideState::GuidedTour { instructors, assignments } => {
                if let Some(ai) = assignments.iter().position(|(v, _)| *v == visitor) {
                    let (_, idx) = assignments.remove(ai);
                    // The first member back from a tour sends the instructor
                    // on break; the rest find them already resting.
                    if instructors[idx].state == InstructorState::OnTour {
                        instructors[idx].state = InstructorState::OnBreak;
                        instructors[idx].until_ms = Some(now + mins_to_ms(INSTRUCTOR_BREAK_MIN));
                        outcome.instructor_to_break = Some(idx);
                    }
                }
            }
            _ => {}
        }
        outcome
    }
}

/// First subset of `heads` (by inclusion of earlier indices) summing exactly
/// to `target`.
fn exact_subset(heads: &[u32], target: u32) -> Option<Vec<usize>> {
    fn search(heads: &[u32], target: u32, start: usize, picked: &mut Vec<usize>) -> bool {
        if target == 0 {
            return true;
        }
        for i in start..heads.len() {
            if heads[i] <= target {
                picked.push(i);
                if search(heads, target - heads[i], i + 1, picked) {
                    return true;
                }
                picked.pop();
            }
        }
        false
    }
    let mut picked = Vec::new();
    search(heads, target, 0, &mut picked).then_some(picked)
}

/// Ticket desk: a pool of identical clerks and one walk-up queue.
#[derive(Debug)]
pub struct Reception {
    clerks_busy: Vec<bool>,
    pub queue: WaitQueue,
}

impl Reception {
    fn new(num_clerks: usize) -> Self {
        Self {
            clerks_busy: vec![false; num_clerks],
            queue: WaitQueue::new(STATS_WINDOW_MIN),
        }
    }

    pub fn free_clerk(&self) -> Option<usize> {
        self.clerks_busy.iter().position(|busy| !busy)
    }

    pub fn begin_service(&mut self, clerk: usize) {
        debug_assert!(!self.clerks_busy[clerk], "clerk already serving");
        self.clerks_busy[clerk] = true;
    }

    pub fn clerk_done(&mut self, clerk: usize) {
        debug_assert!(self.clerks_busy[clerk], "clerk was not serving");
        self.clerks_busy[clerk] = false;
    }

    pub fn num_clerks(&self) -> usize {
        self.clerks_busy.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestaurantKind {
    Burger,
    Pizza,
    Salad,
}

impl RestaurantKind {
    pub const ALL: [RestaurantKind; 3] = [
        RestaurantKind::Burger,
        RestaurantKind::Pizza,
        RestaurantKind::Salad,
    ];

    pub fn index(self) -> usize {
        match self {
            RestaurantKind::Burger => 0,
            RestaurantKind::Pizza => 1,
            RestaurantKind::Salad => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RestaurantKind::Burger => "Burger Restaurant",
            RestaurantKind::Pizza => "Pizza Restaurant",
            RestaurantKind::Salad => "Salad Restaurant",
        }
    }
}

/// A restaurant: one service station, one queue. Parties stay in the
/// in-service set while eating, until their meal ends.
#[derive(Debug)]
pub struct Restaurant {
    pub kind: RestaurantKind,
    pub queue: WaitQueue,
    station_busy: bool,
    in_service: Vec<ServiceEntry>,
}

impl Restaurant {
    fn new(kind: RestaurantKind) -> Self {
        Self {
            kind,
            queue: WaitQueue::new(STATS_WINDOW_MIN),
            station_busy: false,
            in_service: Vec::new(),
        }
    }

    pub fn station_busy(&self) -> bool {
        self.station_busy
    }

    pub fn in_service(&self) -> &[ServiceEntry] {
        &self.in_service
    }

    /// Seat the party immediately when the station is free and nobody is
    /// waiting; otherwise queue it. Returns `true` when service starts now.
    pub fn begin_or_enqueue(&mut self, entry: QueueEntry, now: u64) -> bool {
        if !self.station_busy && self.queue.is_empty() {
            self.station_busy = true;
            self.in_service.push(ServiceEntry {
                visitor: entry.visitor,
                heads: entry.heads,
            });
            true
        } else {
            self.queue.push(entry, now);
            false
        }
    }

    /// The station finished preparing a meal; pull the next party in. The one
    /// just served keeps its seat until its meal ends.
    pub fn promote_next(&mut self, now: u64) -> Option<QueueEntry> {
        debug_assert!(self.station_busy, "promote without an active station");
        match self.queue.pop_front(now) {
            Some(next) => {
                self.in_service.push(ServiceEntry {
                    visitor: next.visitor,
                    heads: next.heads,
                });
                Some(next)
            }
            None => {
                self.station_busy = false;
                None
            }
        }
    }

    pub fn remove_diner(&mut self, visitor: Entity) -> bool {
        match self.in_service.iter().position(|e| e.visitor == visitor) {
            Some(pos) => {
                self.in_service.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Everything with a queue in it: rides, reception, restaurants.
#[derive(Debug, Resource)]
pub struct Park {
    pub facilities: Vec<Facility>,
    pub reception: Reception,
    pub restaurants: [Restaurant; 3],
}

impl Park {
    pub fn new(num_clerks: usize, wave_pool_capacity: u32) -> Self {
        let mut kids_pool = Facility::new(
            "Kids Pool",
            30,
            0.0,
            1,
            RideState::HeadcountPool {
                service: PoolService::KidsPool,
            },
        );
        kids_pool.kids_age_ceiling = Some(4.0);

        let facilities = vec![
            Facility::new(
                "Pipes River",
                TUBE_COUNT * 2,
                0.0,
                3,
                RideState::TubeRiver {
                    tubes_in_use: 0,
                    pairs: Vec::new(),
                },
            ),
            Facility::new(
                "Single Slide",
                SLIDE_LANES as u32,
                12.0,
                5,
                RideState::LaneSlide {
                    last_entry_ms: [None; SLIDE_LANES],
                },
            ),
            Facility::new(
                "Big Pipes Slide",
                8,
                0.0,
                4,
                RideState::BatchSlide {
                    batch_heads: 8,
                    service: BatchService::Gaussian {
                        mean: 4.8,
                        std_dev: 1.8322,
                    },
                },
            ),
            Facility::new(
                "Small Pipes Slide",
                3,
                8.0,
                3,
                RideState::BatchSlide {
                    batch_heads: 3,
                    service: BatchService::Exponential { rate: 2.10706 },
                },
            ),
            Facility::new(
                "Wave Pool",
                wave_pool_capacity,
                6.0,
                3,
                RideState::HeadcountPool {
                    service: PoolService::WavePool,
                },
            ),
            kids_pool,
            Facility::new(
                "Snorkel Tour",
                30,
                12.0,
                4,
                RideState::GuidedTour {
                    instructors: [Instructor::available(); 2],
                    assignments: Vec::new(),
                },
            ),
        ];
        debug_assert_eq!(facilities.len(), FACILITY_COUNT);

        Self {
            facilities,
            reception: Reception::new(num_clerks),
            restaurants: [
                Restaurant::new(RestaurantKind::Burger),
                Restaurant::new(RestaurantKind::Pizza),
                Restaurant::new(RestaurantKind::Salad),
            ],
        }
    }

    pub fn facility(&self, id: FacilityId) -> &Facility {
        &self.facilities[id.0]
    }

    pub fn facility_mut(&mut self, id: FacilityId) -> &mut Facility {
        &mut self.facilities[id.0]
    }

    pub fn restaurant(&self, kind: RestaurantKind) -> &Restaurant {
        &self.restaurants[kind.index()]
    }

    pub fn restaurant_mut(&mut self, kind: RestaurantKind) -> &mut Restaurant {
        &mut self.restaurants[kind.index()]
    }

    pub fn total_waiting(&self, id: FacilityId) -> usize {
        self.facilities[id.0].total_waiting()
    }

    /// Queue a party at a ride (express or regular by pass flag).
    pub fn enqueue_visitor(&mut self, id: FacilityId, entry: QueueEntry, express: bool, now: u64) {
        let facility = &mut self.facilities[id.0];
        if express {
            facility.queue_express.push(entry, now);
        } else {
            facility.queue_regular.push(entry, now);
        }
    }

    /// Run a ride's admission rule; returns who got in and for how long.
    pub fn try_start(
        &mut self,
        id: FacilityId,
        now: u64,
        minute_of_day: u64,
        rng: &mut StdRng,
    ) -> Vec<Admission> {
        self.facilities[id.0].try_start(now, minute_of_day, rng)
    }

    /// A party's service ended: free its seat, tubes, or instructor.
    pub fn finish_service(&mut self, id: FacilityId, visitor: Entity, now: u64) -> FinishOutcome {
        self.facilities[id.0].finish_service(visitor, now)
    }

    /// Is the party still waiting in either of the ride's queues?
    pub fn is_queued(&self, id: FacilityId, visitor: Entity) -> bool {
        let facility = &self.facilities[id.0];
        facility.queue_regular.contains(visitor) || facility.queue_express.contains(visitor)
    }

    /// Remove an abandoning party from whichever queue holds it.
    pub fn abandon(&mut self, id: FacilityId, visitor: Entity, now: u64) -> bool {
        let facility = &mut self.facilities[id.0];
        facility.queue_regular.remove_visitor(visitor, now)
            || facility.queue_express.remove_visitor(visitor, now)
    }

    pub fn set_instructor_state(
        &mut self,
        id: FacilityId,
        index: usize,
        state: InstructorState,
        until_ms: Option<u64>,
    ) {
        if let RideState::GuidedTour { instructors, .. } = &mut self.facilities[id.0].state {
            instructors[index].state = state;
            instructors[index].until_ms = until_ms;
        }
    }
}
