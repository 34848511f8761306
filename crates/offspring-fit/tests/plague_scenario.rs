//! Fits on the plague transmission chains

mod common;

use common::plague;
use offspring_distributions::negative_binomial::log_likelihood_theta;
use offspring_distributions::{OffspringDistribution, Poisson};
use offspring_fit::mle::THETA_BOUNDS;
use offspring_fit::{
    derive_quantities, empirical_log_likelihood, fit_geometric, fit_poisson, fit_theta,
    superspreading_threshold, Fitter, InitialGuess, ModelKind, Quantity,
};

#[test]
fn test_sample_summary() {
    let data = plague();
    assert_eq!(data.len(), 40);
    assert_eq!(data.mean(), 53.0 / 40.0);
}

#[test]
fn test_single_parameter_fits_are_the_mean() {
    let data = plague();
    assert_eq!(fit_poisson(&data).unwrap(), data.mean());
    assert_eq!(fit_geometric(&data).unwrap(), data.mean());
}

#[test]
fn test_negative_binomial_theta() {
    let data = plague();
    let theta = fit_theta(&data, InitialGuess::from_moments(&data).theta).unwrap();
    assert!(THETA_BOUNDS.contains(theta));

    let poisson = Poisson::new(data.mean()).unwrap().log_likelihood(&data).unwrap();
    let near_poisson = log_likelihood_theta(&data, data.mean(), 1e-6).unwrap();
    assert!((poisson - near_poisson).abs() < 1e-3);
}

#[test]
fn test_models_rank_below_empirical_bound() {
    let data = plague();
    let bound = empirical_log_likelihood(&data);
    let guess = InitialGuess::from_moments(&data);
    for (kind, fit) in Fitter::new().fit_all(&ModelKind::ALL, &data, &guess) {
        let fit = fit.unwrap();
        assert!(fit.log_likelihood <= bound, "{kind}");
    }
}

#[test]
fn test_derived_quantities() {
    let data = plague();
    let threshold = superspreading_threshold(&data).unwrap();
    // Poisson(1.325): P(X ≤ 4) ≈ 0.989, P(X ≤ 5) ≈ 0.998
    assert_eq!(threshold, 5);

    let guess = InitialGuess::from_moments(&data);
    let fit = Fitter::new().fit(ModelKind::NegativeBinomial, &data, &guess).unwrap();
    let values = derive_quantities(&fit.model, threshold, &Quantity::ALL).unwrap();
    let q = values[&Quantity::Extinction];
    assert!(q > 0.0 && q < 1.0);
    let tail = values[&Quantity::Superspreading];
    assert!(tail > 0.0 && tail < 0.1);
}
