use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use monte_carlo_pi::{monte_carlo, Backend, ParallelEstimator};

const ITERATIONS: i64 = 2_000_000;
const SEED: u64 = 42;

fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_pi");
    group.throughput(Throughput::Elements(ITERATIONS as u64));
    group.sample_size(20);

    group.bench_function("sequential", |b| {
        b.iter(|| monte_carlo::sequential(black_box(ITERATIONS), SEED))
    });

    for backend in Backend::ALL.into_iter().filter(|b| b.is_available()) {
        let estimator = ParallelEstimator::new(8).with_backend(backend);
        group.bench_with_input(BenchmarkId::new("parallel", backend), &estimator, |b, est| {
            b.iter(|| est.estimate(black_box(ITERATIONS), SEED))
        });
    }

    group.finish();
}

fn bench_worker_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_scaling");
    group.sample_size(20);

    for workers in [1usize, 2, 4, 8, 16] {
        let estimator = ParallelEstimator::new(workers);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &estimator, |b, est| {
            b.iter(|| est.estimate(black_box(ITERATIONS), SEED))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_estimators, bench_worker_scaling);
criterion_main!(benches);
