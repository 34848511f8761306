use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use offspring_confidence::{
    joint_highest_density_region, Bootstrap, BootstrapMethod, HighestDensityBootstrap,
    PercentileBootstrap, RefitContext,
};
use offspring_core::{execution::sequential, AnyEngine, CountData};
use offspring_fit::ModelKind;
use offspring_histogram::Binning;
use rand::prelude::*;
use rand_distr::{Gamma, Normal, Poisson};

/// Gamma-Poisson counts: negative binomial with mean `mean` and dispersion `theta`
fn generate_counts(size: usize, mean: f64, theta: f64, seed: u64) -> CountData {
    let mut rng = StdRng::seed_from_u64(seed);
    let gamma = Gamma::new(1.0 / theta, mean * theta).unwrap();
    let values = (0..size)
        .map(|_| Poisson::new(gamma.sample(&mut rng).max(1e-9)).unwrap().sample(&mut rng) as u64)
        .collect();
    CountData::new(values).unwrap()
}

fn bench_resampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bootstrap");
    group.sample_size(10);
    let data = generate_counts(60, 1.4, 1.5, 42);
    let context = RefitContext::new(
        vec![ModelKind::Poisson, ModelKind::NegativeBinomial, ModelKind::Zip],
        6,
    );

    for &n_resamples in &[100usize, 400] {
        group.bench_with_input(BenchmarkId::new("sequential", n_resamples), &n_resamples, |b, &n| {
            let bootstrap = Bootstrap::new(sequential()).with_resamples(n).with_seed(1);
            b.iter(|| bootstrap.run(black_box(&data), |i, r| context.refit(i, r)))
        });
        group.bench_with_input(BenchmarkId::new("pooled", n_resamples), &n_resamples, |b, &n| {
            let engine = AnyEngine::with_workers(num_workers()).unwrap();
            let bootstrap = Bootstrap::new(engine).with_resamples(n).with_seed(1);
            b.iter(|| bootstrap.run(black_box(&data), |i, r| context.refit(i, r)))
        });
    }

    group.finish();
}

fn num_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn bench_intervals(c: &mut Criterion) {
    let mut group = c.benchmark_group("Intervals");
    let mut rng = StdRng::seed_from_u64(3);
    let normal = Normal::new(1.0, 0.2).unwrap();

    for &size in &[1_000usize, 10_000] {
        let estimates: Vec<f64> = (0..size).map(|_| normal.sample(&mut rng)).collect();
        group.bench_with_input(BenchmarkId::new("percentile", size), &estimates, |b, e| {
            b.iter(|| PercentileBootstrap.calculate_interval(black_box(e), 1.0, 0.95))
        });
        group.bench_with_input(BenchmarkId::new("highest_density", size), &estimates, |b, e| {
            let method = HighestDensityBootstrap::default();
            b.iter(|| method.calculate_interval(black_box(e), 1.0, 0.95))
        });

        let points: Vec<Vec<f64>> = (0..size)
            .map(|_| (0..3).map(|_| normal.sample(&mut rng)).collect())
            .collect();
        group.bench_with_input(BenchmarkId::new("joint_3d", size), &points, |b, p| {
            b.iter(|| joint_highest_density_region(black_box(p), &[1.0, 1.0, 1.0], 0.95, Binning::Count(20)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resampling, bench_intervals);
criterion_main!(benches);
