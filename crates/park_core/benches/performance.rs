//! Performance benchmarks for park_core using Criterion.rs.

use bevy_ecs::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use park_core::runner::{initialize_simulation, run_until_close, simulation_schedule};
use park_core::scenario::ParkParams;

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![("two_hours", 2u64), ("half_day", 5), ("full_day", 10)];

    let mut group = c.benchmark_group("simulation_run");
    for (name, horizon_hours) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &horizon_hours,
            |b, &horizon_hours| {
                b.iter(|| {
                    let mut world = World::new();
                    let params = ParkParams::default()
                        .with_seed(42)
                        .with_horizon_hours(horizon_hours);
                    park_core::scenario::build_scenario(&mut world, params);
                    initialize_simulation(&mut world);
                    let mut schedule = simulation_schedule();
                    black_box(run_until_close(&mut world, &mut schedule, 10_000_000));
                });
            },
        );
    }
    group.finish();
}

fn bench_seeded_days(c: &mut Criterion) {
    let mut group = c.benchmark_group("seeded_days");
    for seed in [1u64, 7, 42] {
        group.bench_with_input(BenchmarkId::from_parameter(seed), &seed, |b, &seed| {
            b.iter(|| {
                let mut world = World::new();
                park_core::scenario::build_scenario(
                    &mut world,
                    ParkParams::default().with_seed(seed),
                );
                initialize_simulation(&mut world);
                let mut schedule = simulation_schedule();
                black_box(run_until_close(&mut world, &mut schedule, 10_000_000));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulation_run, bench_seeded_days);
criterion_main!(benches);
