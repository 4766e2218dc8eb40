//! Baseline perf for customer generation and bounded dispatch overhead.
#![allow(clippy::missing_docs_in_private_items, clippy::expect_used)]
#[macro_use]
extern crate criterion;

use criterion::criterion_group;
use criterion::Criterion;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use teller_sim::customer::{generate, generate_priority_ordered};
use teller_sim::{FixedServiceTimer, Simulation, SimulationParameters};

fn generation_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("customer generation");

    group.bench_function("generate 1000", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| generate(1000, &mut rng));
    });
    group.bench_function("generate priority ordered 1000", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| generate_priority_ordered(1000, &mut rng));
    });
    group.finish();
}

fn dispatch_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("zero service time dispatch");
    let parameters = SimulationParameters {
        capacity: 4,
        customer_count: 200,
        admission_pause: Duration::ZERO,
        service_timer: Box::new(FixedServiceTimer(Duration::ZERO)),
        seed: Some(7),
        ..Default::default()
    };

    group.bench_function("bounded pool of 4", |b| {
        let mut simulation = Simulation::new(parameters.clone());
        b.iter(|| simulation.run_bounded().expect("bounded run"));
    });
    group.bench_function("unbounded", |b| {
        let mut simulation = Simulation::new(parameters.clone());
        b.iter(|| simulation.run_unbounded().expect("unbounded run"));
    });
    group.finish();
}

criterion_group!(benches, generation_bench, dispatch_bench);
criterion_main!(benches);
