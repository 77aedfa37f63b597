//! Run totals: arrival/entry/completion counters, revenue, and ratings.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::park::Park;

/// Collects the aggregated results the external driver reads back.
#[derive(Debug, Default, Resource)]
pub struct ParkTelemetry {
    /// Heads that showed up at the gate.
    pub total_people_arrived: u64,
    /// Parties that showed up at the gate.
    pub total_entities_arrived: u64,
    /// Heads that cleared reception.
    pub total_people_entered: u64,
    pub total_entities_entered: u64,
    /// Heads whose visit completed (normally or at force close).
    pub total_people_completed: u64,
    pub total_entities_completed: u64,
    /// Revenue in ₪: entry fees, express passes, meals, photo packages.
    pub total_revenue: f64,
    /// Final rating of each completed party, in completion order.
    pub ratings: Vec<f64>,
}

impl ParkTelemetry {
    pub fn record_arrival(&mut self, heads: u32) {
        self.total_entities_arrived = self.total_entities_arrived.saturating_add(1);
        self.total_people_arrived = self.total_people_arrived.saturating_add(heads as u64);
    }

    pub fn record_entry(&mut self, heads: u32) {
        self.total_entities_entered = self.total_entities_entered.saturating_add(1);
        self.total_people_entered = self.total_people_entered.saturating_add(heads as u64);
    }

    pub fn record_completion(&mut self, heads: u32, rating: f64) {
        self.total_entities_completed = self.total_entities_completed.saturating_add(1);
        self.total_people_completed = self.total_people_completed.saturating_add(heads as u64);
        self.ratings.push(rating);
    }

    pub fn add_revenue(&mut self, amount: f64) {
        debug_assert!(amount >= 0.0);
        self.total_revenue += amount;
    }
}

/// One queue's averages for one simulated day, in export-friendly form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueDailyStats {
    pub queue: String,
    /// Day index, starting at 0 for the first simulated day.
    pub day: u32,
    pub avg_queue_length: f64,
    pub avg_waiting_time_min: f64,
}

/// Flatten every queue's per-day averages (reception, each facility's regular
/// and express queue, each restaurant) into one record list.
pub fn collect_queue_stats(park: &Park) -> Vec<QueueDailyStats> {
    let mut rows = Vec::new();
    let mut add = |name: String, queue: &crate::waitqueue::WaitQueue| {
        for (day, (len, wait)) in queue
            .daily_avg_queue_lengths
            .iter()
            .zip(queue.daily_avg_waiting_times.iter())
            .enumerate()
        {
            rows.push(QueueDailyStats {
                queue: name.clone(),
                day: day as u32,
                avg_queue_length: *len,
                avg_waiting_time_min: *wait,
            });
        }
    };

    add("Reception".to_string(), &park.reception.queue);
    for facility in &park.facilities {
        add(format!("{} (regular)", facility.name), &facility.queue_regular);
        add(format!("{} (express)", facility.name), &facility.queue_express);
    }
    for restaurant in &park.restaurants {
        add(restaurant.kind.name().to_string(), &restaurant.queue);
    }
    rows
}
