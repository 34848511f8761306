use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use offspring_core::CountData;
use offspring_distributions::kummer::{ln_kummer_m_with, KummerPath};
use offspring_distributions::{BetaPoisson, OffspringDistribution};

fn bench_kummer_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("Kummer");
    // (a, b, z) in the beta-Poisson regime: z = −N, b ≈ ΦN
    let points = [(1.2, 12.0, -10.0), (40.5, 49.0, -500.0), (2.0, 80.0, -100.0)];

    for &(a, b, z) in &points {
        let label = format!("b={b},z={z}");
        group.bench_with_input(BenchmarkId::new("fast", &label), &(a, b, z), |bench, &(a, b, z)| {
            bench.iter(|| ln_kummer_m_with(KummerPath::Fast, black_box(a), black_box(b), black_box(z)))
        });
        group.bench_with_input(
            BenchmarkId::new("precise", &label),
            &(a, b, z),
            |bench, &(a, b, z)| {
                bench.iter(|| {
                    ln_kummer_m_with(KummerPath::Precise, black_box(a), black_box(b), black_box(z))
                })
            },
        );
    }

    group.finish();
}

fn bench_beta_poisson_likelihood(c: &mut Criterion) {
    let mut group = c.benchmark_group("BetaPoissonLikelihood");
    let data = CountData::new(vec![0, 0, 0, 0, 1, 1, 1, 2, 2, 3, 4, 5, 6, 9]).unwrap();

    for &n in &[10.0, 100.0, 1_000.0, 10_000.0] {
        let dist = BetaPoisson::with_contact_rate(data.mean(), 0.7, n).unwrap();
        group.bench_with_input(BenchmarkId::new("contact_rate", n), &dist, |bench, dist| {
            bench.iter(|| dist.log_likelihood(black_box(&data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kummer_paths, bench_beta_poisson_likelihood);
criterion_main!(benches);
