//! Event-driven systems: one module per event family.
//!
//! Systems react to the `CurrentEvent` resource the runner inserts before each
//! schedule run. Every system guards on its event kind, so exactly one of
//! them does work per step:
//!
//! - **arrivals**: the three Poisson arrival streams and the gate-to-reception
//!   hand-off
//! - **reception**: ticketing, entry fees, the first routing decision
//! - **facility_arrival / abandonment / facility_end**: the ride lifecycle
//! - **restaurant**: lunch service and meals
//! - **instructor**: snorkel breaks and lunch
//! - **day_close**: 19:00 statistics and next-day seeding
//! - **flow**: the shared route-or-exit and completion helpers

pub mod abandonment;
pub mod arrivals;
pub mod day_close;
pub mod facility_arrival;
pub mod facility_end;
pub mod flow;
pub mod instructor;
pub mod reception;
pub mod restaurant;
