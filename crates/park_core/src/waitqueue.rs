//! Waiting queues with time-weighted statistics.
//!
//! Every queue in the park (reception, the two queues of each ride, each
//! restaurant) tracks the area under its length curve and the waits observed
//! when entries are taken into service. `close_day` folds both into per-day
//! averages and resets the counters to the empty-day baseline.

use std::collections::VecDeque;

use bevy_ecs::prelude::Entity;

use crate::clock::ONE_MIN_MS;

/// A queued party: the visitor entity, its head count, and when it joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub visitor: Entity,
    pub heads: u32,
    pub joined_at: u64,
}

#[derive(Debug, Clone)]
pub struct WaitQueue {
    entries: VecDeque<QueueEntry>,
    /// Statistics window per day, in minutes (the 10-hour operating day).
    active_minutes: f64,
    /// Area under the queue-length curve, in length x minutes.
    length_integral: f64,
    last_sample_ms: Option<u64>,
    last_len: usize,
    waits_min: Vec<f64>,
    /// Average queue length per closed day.
    pub daily_avg_queue_lengths: Vec<f64>,
    /// Average waiting time per closed day, in minutes.
    pub daily_avg_waiting_times: Vec<f64>,
}

impl WaitQueue {
    pub fn new(active_minutes: f64) -> Self {
        Self {
            entries: VecDeque::new(),
            active_minutes,
            length_integral: 0.0,
            last_sample_ms: None,
            last_len: 0,
            waits_min: Vec::new(),
            daily_avg_queue_lengths: Vec::new(),
            daily_avg_waiting_times: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn front(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, visitor: Entity) -> bool {
        self.entries.iter().any(|e| e.visitor == visitor)
    }

    /// Advance the length integral to `now` using the previously sampled length,
    /// then record the current length as the new sample.
    pub fn sample_length(&mut self, now: u64) {
        if let Some(last) = self.last_sample_ms {
            let elapsed_min = now.saturating_sub(last) as f64 / ONE_MIN_MS as f64;
            self.length_integral += self.last_len as f64 * elapsed_min;
        }
        self.last_sample_ms = Some(now);
        self.last_len = self.entries.len();
    }

    pub fn push(&mut self, entry: QueueEntry, now: u64) {
        self.entries.push_back(entry);
        self.sample_length(now);
    }

    /// Take the head entry into service, recording its wait.
    pub fn pop_front(&mut self, now: u64) -> Option<QueueEntry> {
        let entry = self.entries.pop_front()?;
        self.record_wait(&entry, now);
        self.sample_length(now);
        Some(entry)
    }

    /// Take the entry at `index` into service (first-fit admissions reach past
    /// the head), recording its wait.
    pub fn take_at(&mut self, index: usize, now: u64) -> Option<QueueEntry> {
        let entry = self.entries.remove(index)?;
        self.record_wait(&entry, now);
        self.sample_length(now);
        Some(entry)
    }

    /// Remove a visitor that abandons the queue. No wait is recorded; waits
    /// only measure time-to-service.
    pub fn remove_visitor(&mut self, visitor: Entity, now: u64) -> bool {
        match self.entries.iter().position(|e| e.visitor == visitor) {
            Some(index) => {
                self.entries.remove(index);
                self.sample_length(now);
                true
            }
            None => false,
        }
    }

    fn record_wait(&mut self, entry: &QueueEntry, now: u64) {
        let wait_min = now.saturating_sub(entry.joined_at) as f64 / ONE_MIN_MS as f64;
        self.waits_min.push(wait_min);
    }

    /// Waits observed since the last day close (for tests and summaries).
    pub fn observed_waits_min(&self) -> &[f64] {
        &self.waits_min
    }

    /// Finalize the day's averages and reset to the empty-day baseline.
    /// Callers sample the final length (see `sample_length`) before closing.
    pub fn close_day(&mut self) {
        let avg_len = if self.active_minutes > 0.0 {
            self.length_integral / self.active_minutes
        } else {
            0.0
        };
        self.daily_avg_queue_lengths.push(avg_len);

        let avg_wait = if self.waits_min.is_empty() {
            0.0
        } else {
            self.waits_min.iter().sum::<f64>() / self.waits_min.len() as f64
        };
        self.daily_avg_waiting_times.push(avg_wait);

        self.length_integral = 0.0;
        self.last_sample_ms = None;
        self.last_len = 0;
        self.waits_min.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ONE_HOUR_MS, ONE_MIN_MS};

    fn visitor(raw: u32) -> Entity {
        Entity::from_raw(raw)
    }

    fn entry(raw: u32, heads: u32, joined_at: u64) -> QueueEntry {
        QueueEntry {
            visitor: visitor(raw),
            heads,
            joined_at,
        }
    }

    #[test]
    fn pop_records_waiting_time() {
        let mut q = WaitQueue::new(600.0);
        q.push(entry(1, 3, 0), 0);
        let popped = q.pop_front(5 * ONE_MIN_MS).expect("entry");
        assert_eq!(popped.visitor, visitor(1));
        assert_eq!(q.observed_waits_min(), &[5.0]);
    }

    #[test]
    fn abandonment_removal_records_no_wait() {
        let mut q = WaitQueue::new(600.0);
        q.push(entry(1, 2, 0), 0);
        q.push(entry(2, 4, 0), 0);
        assert!(q.remove_visitor(visitor(1), 10 * ONE_MIN_MS));
        assert!(!q.remove_visitor(visitor(1), 10 * ONE_MIN_MS));
        assert!(q.observed_waits_min().is_empty());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn length_integral_is_time_weighted() {
        let mut q = WaitQueue::new(600.0);
        q.push(entry(1, 1, 0), 0);
        // One party queued for a full hour, then served.
        q.pop_front(ONE_HOUR_MS);
        q.sample_length(10 * ONE_HOUR_MS);
        q.close_day();
        // 1 entry x 60 minutes over a 600-minute day.
        assert!((q.daily_avg_queue_lengths[0] - 0.1).abs() < 1e-9);
        assert!((q.daily_avg_waiting_times[0] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn idle_day_closes_to_zeroes_and_resets() {
        let mut q = WaitQueue::new(600.0);
        q.close_day();
        assert_eq!(q.daily_avg_queue_lengths, vec![0.0]);
        assert_eq!(q.daily_avg_waiting_times, vec![0.0]);

        // The next day accumulates from a clean slate.
        q.push(entry(1, 1, 0), 0);
        q.pop_front(30 * ONE_MIN_MS);
        q.sample_length(600 * ONE_MIN_MS);
        q.close_day();
        assert!((q.daily_avg_queue_lengths[1] - 30.0 / 600.0).abs() < 1e-9);
        assert!((q.daily_avg_waiting_times[1] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn take_at_reaches_past_the_head() {
        let mut q = WaitQueue::new(600.0);
        q.push(entry(1, 5, 0), 0);
        q.push(entry(2, 2, 0), 0);
        q.push(entry(3, 3, 0), 0);
        let taken = q.take_at(1, ONE_MIN_MS).expect("entry");
        assert_eq!(taken.visitor, visitor(2));
        let order: Vec<_> = q.iter().map(|e| e.visitor).collect();
        assert_eq!(order, vec![visitor(1), visitor(3)]);
    }
}
