use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use portmux::prelude::*;

fn mesh(horizon: f64) -> SimulationConfig {
    SimulationConfig {
        horizon,
        input_ports: 4,
        output_ports: 4,
        arrival_rates: vec![3.0; 4],
        service_rates: vec![4.0; 4],
        capacities: vec![16; 4],
        routing_matrix: vec![vec![0.25; 4]; 4],
    }
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_run");
    for horizon in [100.0, 1000.0] {
        group.bench_with_input(BenchmarkId::from_parameter(horizon), &horizon, |b, &t| {
            b.iter(|| {
                let engine = Engine::new(mesh(t), black_box(7)).unwrap();
                black_box(engine.run())
            })
        });
    }
    group.finish();

    c.bench_function("single_queue_reference", |b| {
        b.iter(|| Engine::new(SimulationConfig::default(), black_box(42)).unwrap().run())
    });
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
