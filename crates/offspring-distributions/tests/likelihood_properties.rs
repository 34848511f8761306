//! Cross-model properties of the likelihood kernels

use approx::assert_relative_eq;
use offspring_core::CountData;
use offspring_distributions::negative_binomial::{log_likelihood_phi, log_likelihood_theta};
use offspring_distributions::{
    BetaPoisson, Geometric, NegativeBinomial, OffspringDistribution, Poisson, ZeroInflatedPoisson,
};
use proptest::prelude::*;
use rand::prelude::*;
use rand_distr::{Gamma, Poisson as PoissonSampler};

fn plague() -> CountData {
    let mut values = vec![0; 16];
    values.extend(vec![1; 10]);
    values.extend(vec![2; 7]);
    values.extend(vec![3; 2]);
    values.extend(vec![4; 3]);
    values.extend([5, 6]);
    CountData::new(values).unwrap()
}

/// Gamma–Poisson draws, i.e. a negative binomial with mean `λ` and `θ`
fn negative_binomial_sample(lambda: f64, theta: f64, n: usize, seed: u64) -> CountData {
    let mut rng = StdRng::seed_from_u64(seed);
    let gamma = Gamma::new(1.0 / theta, lambda * theta).unwrap();
    let values = (0..n)
        .map(|_| {
            let rate: f64 = gamma.sample(&mut rng);
            PoissonSampler::new(rate.max(1e-12)).unwrap().sample(&mut rng) as u64
        })
        .collect();
    CountData::new(values).unwrap()
}

#[test]
fn test_beta_poisson_tends_to_negative_binomial() {
    let data = plague();
    let (lambda, phi) = (data.mean(), 1.4);
    let nb = log_likelihood_phi(&data, lambda, phi).unwrap();
    let bp = BetaPoisson::with_contact_rate(lambda, phi, 1e6)
        .unwrap()
        .log_likelihood(&data)
        .unwrap();
    assert!((bp - nb).abs() < 1e-4, "beta-Poisson {bp} vs negative binomial {nb}");
}

#[test]
fn test_negative_binomial_near_poisson_limit() {
    let data = plague();
    let poisson = Poisson::new(data.mean()).unwrap().log_likelihood(&data).unwrap();
    let nb = log_likelihood_theta(&data, data.mean(), 1e-6).unwrap();
    assert!((nb - poisson).abs() < 1e-3);
}

#[test]
fn test_pmfs_normalise() {
    let laws: Vec<Box<dyn OffspringDistribution>> = vec![
        Box::new(Poisson::new(2.2).unwrap()),
        Box::new(Geometric::new(1.1).unwrap()),
        Box::new(NegativeBinomial::new(1.7, 1.2).unwrap()),
        Box::new(ZeroInflatedPoisson::new(2.5, 0.35).unwrap()),
        Box::new(BetaPoisson::new(1.7, 0.9, 0.3).unwrap()),
    ];
    for law in &laws {
        let total: f64 = law.pmf_many(&(0..150).collect::<Vec<_>>()).unwrap().iter().sum();
        assert_relative_eq!(total, 1.0, max_relative = 1e-9);
        assert_relative_eq!(law.cdf(149).unwrap(), total.min(1.0), max_relative = 1e-12);
    }
}

#[test]
fn test_likelihood_peaks_at_generating_parameters() {
    let (lambda, theta) = (1.5, 0.8);
    let data = negative_binomial_sample(lambda, theta, 20_000, 7);
    let at = |l: f64, t: f64| log_likelihood_theta(&data, l, t).unwrap();

    let truth = at(lambda, theta);
    // Moving further from the truth along either axis lowers the likelihood
    let mut previous = truth;
    for step in 1..=3 {
        let shifted = at(lambda, theta * (1.0 + 0.4 * step as f64));
        assert!(shifted < previous);
        previous = shifted;
    }
    let mut previous = truth;
    for step in 1..=3 {
        let shifted = at(lambda * (1.0 - 0.15 * step as f64), theta);
        assert!(shifted < previous);
        previous = shifted;
    }
}

#[test]
fn test_pgf_many_validates_each_point() {
    let law = Poisson::new(1.0).unwrap();
    assert_eq!(law.pgf_many(&[0.0, 0.5, 1.0]).unwrap().len(), 3);
    assert!(law.pgf_many(&[0.0, 1.5]).unwrap_err().is_domain());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_theta_and_phi_forms_agree(
        lambda in 0.05f64..8.0,
        theta in 1e-4f64..40.0,
        values in prop::collection::vec(0u64..30, 1..60),
    ) {
        let data = CountData::new(values).unwrap();
        let by_theta = log_likelihood_theta(&data, lambda, theta).unwrap();
        let by_phi = log_likelihood_phi(&data, lambda, 1.0 / theta).unwrap();
        prop_assert!((by_theta - by_phi).abs() <= 1e-9 * (1.0 + by_theta.abs()));
    }

    #[test]
    fn prop_parameterisation_round_trip(theta in 1e-6f64..50.0) {
        let dist = NegativeBinomial::from_phi(1.0, 1.0 / theta).unwrap();
        prop_assert!((dist.theta() - theta).abs() <= 1e-12 * theta);
    }
}
