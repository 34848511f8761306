use offspring_confidence::{
    collect_model_samples, Bootstrap, BootstrapMethod, FitOutcome, HighestDensityBootstrap,
    PercentileBootstrap, RefitContext, ResampleOutcome,
};
use offspring_core::{execution::sequential, AnyEngine, CountData};
use offspring_fit::{ModelKind, Quantity, SeedStrategy};
use offspring_histogram::Binning;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Poisson};

fn plague() -> CountData {
    CountData::from_frequencies(&[(0, 16), (1, 10), (2, 7), (3, 2), (4, 3), (5, 1), (6, 1)]).unwrap()
}

#[test]
fn plague_resamples_all_have_positive_mean() {
    let data = plague();
    let models = vec![ModelKind::Poisson, ModelKind::NegativeBinomial, ModelKind::Zip];
    let context = RefitContext::new(models.clone(), 5).with_quantities(vec![Quantity::ProbabilityZero]);
    let run = Bootstrap::new(sequential())
        .with_resamples(100)
        .with_seed(2024)
        .run(&data, |i, resample| context.refit(i, resample))
        .unwrap();

    assert_eq!(run.completed(), 100);
    for outcome in &run.outcomes {
        match outcome {
            ResampleOutcome::Completed { sample_mean, value, .. } => {
                assert!(*sample_mean > 0.0);
                assert_eq!(value.sample_mean, *sample_mean);
                // Poisson's estimate is the resample mean itself
                let poisson = value.fits[&ModelKind::Poisson].parameters().unwrap();
                assert_eq!(poisson[0], *sample_mean);
            }
            ResampleOutcome::Exhausted { .. } => panic!("plague data never exhausts redraws"),
        }
    }

    let samples = collect_model_samples(&run, &models);
    for kind in &models {
        let model = &samples[kind];
        assert_eq!(model.successes() + model.failures, 100);
        assert!(model.successes() >= 95, "{kind}: {} failures", model.failures);
    }
}

#[test]
fn every_model_refits_on_a_small_run() {
    let data = plague();
    let context = RefitContext::new(ModelKind::ALL.to_vec(), 5)
        .with_seed_strategy(SeedStrategy::Moments)
        .with_quantities(Quantity::ALL.to_vec());
    let run = Bootstrap::new(sequential())
        .with_resamples(12)
        .with_seed(5)
        .run(&data, |i, resample| context.refit(i, resample))
        .unwrap();

    for fits in run.values() {
        assert_eq!(fits.fits.len(), 5);
        for (kind, outcome) in &fits.fits {
            if let FitOutcome::Succeeded {
                parameters,
                quantities,
                log_likelihood,
            } = outcome
            {
                assert_eq!(parameters.len(), kind.arity());
                assert_eq!(quantities.len(), Quantity::ALL.len());
                assert!(log_likelihood.is_finite() && *log_likelihood < 0.0);
                let q0 = quantities[&Quantity::ProbabilityZero];
                assert!((0.0..=1.0).contains(&q0));
            }
        }
    }
}

#[test]
fn engines_agree_for_a_fixed_seed() {
    let data = plague();
    let context = RefitContext::new(vec![ModelKind::Geometric, ModelKind::NegativeBinomial], 5);
    let task = |i: usize, resample: &CountData| context.refit(i, resample);

    let sequential_run = Bootstrap::new(sequential())
        .with_resamples(40)
        .with_seed(77)
        .run(&data, task)
        .unwrap();
    let pooled_run = Bootstrap::new(AnyEngine::with_workers(3).unwrap())
        .with_resamples(40)
        .with_seed(77)
        .run(&data, task)
        .unwrap();
    assert_eq!(sequential_run, pooled_run);
}

#[test]
fn poisson_mean_intervals_cover_the_truth() {
    let truth = 1.5;
    let poisson = Poisson::new(truth).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let repetitions = 200;
    let mut hdr_covered = 0;
    let mut percentile_covered = 0;
    let mut estimate_inside = 0;
    for rep in 0..repetitions {
        let values: Vec<u64> = (0..40).map(|_| poisson.sample(&mut rng) as u64).collect();
        let data = CountData::new(values).unwrap();
        let run = Bootstrap::new(sequential())
            .with_resamples(300)
            .with_seed(rep)
            .run(&data, |_, resample| resample.mean())
            .unwrap();
        let means: Vec<f64> = run.values().copied().collect();

        let hdr = HighestDensityBootstrap::new(Binning::Count(25))
            .calculate_interval(&means, data.mean(), 0.95)
            .unwrap();
        let pct = PercentileBootstrap.calculate_interval(&means, data.mean(), 0.95).unwrap();
        hdr_covered += usize::from(hdr.contains(truth));
        percentile_covered += usize::from(pct.contains(truth));
        estimate_inside += usize::from(hdr.contains(data.mean()));
    }

    let rate = |hits: usize| hits as f64 / repetitions as f64;
    assert!(rate(estimate_inside) >= 0.95, "estimate inside {}", rate(estimate_inside));
    assert!(rate(hdr_covered) >= 0.85, "hdr coverage {}", rate(hdr_covered));
    assert!(rate(percentile_covered) >= 0.85, "percentile coverage {}", rate(percentile_covered));
}
