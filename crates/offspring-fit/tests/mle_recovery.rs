//! Maximum-likelihood estimates recover the parameters of large synthetic
//! samples drawn from each model.

mod common;

use common::*;
use offspring_fit::{
    beta_poisson_log_likelihood, fit_geometric, fit_phi_nu, fit_poisson, fit_theta, fit_zip,
    InitialGuess,
};

#[test]
fn test_poisson_recovery() {
    let data = poisson_sample(2.5, 5_000, 11);
    let lambda = fit_poisson(&data).unwrap();
    assert_eq!(lambda, data.mean());
    assert!((lambda - 2.5).abs() < 0.1);
}

#[test]
fn test_geometric_recovery() {
    let data = geometric_sample(1.8, 5_000, 12);
    assert!((fit_geometric(&data).unwrap() - 1.8).abs() < 0.12);
}

#[test]
fn test_negative_binomial_recovery() {
    let data = negative_binomial_sample(1.5, 0.8, 10_000, 13);
    let guess = InitialGuess::from_moments(&data);
    let theta = fit_theta(&data, guess.theta).unwrap();
    assert!((theta - 0.8).abs() < 0.15, "theta = {theta}");
}

#[test]
fn test_zip_recovery() {
    let data = zip_sample(3.0, 0.3, 5_000, 14);
    let guess = InitialGuess::from_moments(&data);
    let (lambda, sigma) = fit_zip(&data, guess.zip_lambda, guess.zip_sigma).unwrap();
    assert!((lambda - 3.0).abs() < 0.15, "lambda = {lambda}");
    assert!((sigma - 0.3).abs() < 0.04, "sigma = {sigma}");
}

#[test]
fn test_beta_poisson_improves_on_truth() {
    let (lambda, phi, contact_rate) = (1.5, 1.0, 5.0);
    let data = beta_poisson_sample(lambda, phi, contact_rate, 1_500, 15);
    let guess = InitialGuess::from_moments(&data);
    let (phi_hat, nu_hat) = fit_phi_nu(&data, guess.phi, guess.nu).unwrap();

    // The fit holds λ at the sample mean; compare against the truth there
    let fitted = beta_poisson_log_likelihood(&data, data.mean(), phi_hat, nu_hat).unwrap();
    let truth = beta_poisson_log_likelihood(&data, data.mean(), phi, 1.0 / contact_rate).unwrap();
    assert!(fitted >= truth - 1e-6, "fitted {fitted} < truth {truth}");
    assert!(nu_hat <= 1.0 / data.mean());
}

#[test]
fn test_beta_poisson_recovery() {
    // Beta(1.2, 2.8) contact probabilities over Poisson(5) contacts
    let (lambda, phi, nu) = (1.5, 0.8, 0.2);
    let data = beta_poisson_sample(lambda, phi, 1.0 / nu, 20_000, 16);
    assert!((data.mean() - lambda).abs() < 0.05);

    let guess = InitialGuess::from_moments(&data);
    let (phi_hat, nu_hat) = fit_phi_nu(&data, guess.phi, guess.nu).unwrap();
    assert!((phi_hat - phi).abs() < 0.35, "phi = {phi_hat}");
    assert!((nu_hat - nu).abs() < 0.12, "nu = {nu_hat}");
}
