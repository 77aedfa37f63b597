//! # Water Park Simulation Core
//!
//! A discrete-event simulation engine for a water park: heterogeneous visitor
//! parties flow from the gate through reception, capacity-limited rides,
//! restaurants, and out, accumulating queue statistics, ratings, and revenue.
//!
//! ## Overview
//!
//! - **Event Scheduling**: millisecond-precision discrete event system with a
//!   FIFO tie-break among equal timestamps
//! - **ECS Framework**: visitor parties are entities; the park (rides,
//!   reception, restaurants) is a resource mutated by one handler at a time
//! - **Admission Machines**: tube pairing, lane cooldowns, exact-sum batches,
//!   headcount pools, instructor-gated tours
//! - **Statistics**: per-queue daily averages, run totals, Parquet export
//!
//! ## Key Concepts
//!
//! - **Discrete Events**: all simulation progress happens through scheduled
//!   events; time passes only by popping the next one
//! - **Deterministic**: one seeded random stream makes runs reproducible
//!   bit-for-bit
//! - **Force Close**: at the horizon, everyone still inside completes through
//!   the normal exit path
//!
//! ## Example
//!
//! ```rust,no_run
//! use bevy_ecs::prelude::World;
//! use park_core::runner::{initialize_simulation, run_until_close, simulation_schedule};
//! use park_core::scenario::{build_scenario, ParkParams};
//! use park_core::telemetry::ParkTelemetry;
//!
//! let mut world = World::new();
//! build_scenario(&mut world, ParkParams::default().with_seed(42));
//! initialize_simulation(&mut world);
//!
//! let mut schedule = simulation_schedule();
//! run_until_close(&mut world, &mut schedule, 1_000_000);
//!
//! let telemetry = world.resource::<ParkTelemetry>();
//! println!("revenue: ₪{:.0}", telemetry.total_revenue);
//! ```

pub mod clock;
pub mod distributions;
pub mod ecs;
pub mod park;
pub mod pricing;
pub mod profiling;
pub mod router;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
pub mod telemetry_export;
pub mod waitqueue;
