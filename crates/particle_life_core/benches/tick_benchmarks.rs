use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_life_core::{BoundaryMode, SimConfig, SimulationEngine};

fn engine(particles: usize, boundary: BoundaryMode, parallel: bool) -> SimulationEngine {
    let mut config = SimConfig::default();
    config.world.seed = Some(42);
    config.world.max_particles = particles;
    config.world.initial_particles = particles;
    config.world.boundary = boundary;
    config.physics.parallel = parallel;
    match SimulationEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => panic!("bench config rejected: {e}"),
    }
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(20);
    for n in [2_000, 10_000] {
        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, &n| {
                let mut engine = engine(n, BoundaryMode::Wrap, parallel);
                b.iter(|| black_box(engine.tick()))
            });
        }
    }
    group.finish();
}

fn bench_tick_boundaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_boundary");
    group.sample_size(20);
    for boundary in BoundaryMode::ALL {
        group.bench_function(boundary.name(), |b| {
            let mut engine = engine(5_000, boundary, true);
            b.iter(|| black_box(engine.tick()))
        });
    }
    group.finish();
}

fn bench_randomize_everything(c: &mut Criterion) {
    let mut engine = engine(10_000, BoundaryMode::Wrap, true);
    c.bench_function("randomize_everything", |b| {
        b.iter(|| {
            engine.randomize_everything();
            black_box(engine.particle_count())
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_tick_boundaries,
    bench_randomize_everything
);
criterion_main!(benches);
