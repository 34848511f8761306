//! Initial guesses for the likelihood solvers
//!
//! Poor starting points are the main reason a resample fails to fit, so the
//! strategy is explicit and recorded with every analysis run.

use crate::mle::{NU_FLOOR, PHI_BOUNDS, SIGMA_UPPER, THETA_BOUNDS, ZIP_LAMBDA_UPPER};
use crate::model::FittedModel;
use offspring_core::CountData;
use serde::{Deserialize, Serialize};

/// Where resample fits take their starting points from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStrategy {
    /// Method-of-moments estimates from the sample being fitted
    #[default]
    Moments,
    /// The point estimates of the full-data fit
    OriginalFit,
}

/// Starting values for every multi-parameter solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialGuess {
    pub theta: f64,
    pub phi: f64,
    pub nu: f64,
    pub zip_lambda: f64,
    pub zip_sigma: f64,
}

impl InitialGuess {
    /// Data-independent starting point
    pub fn fixed() -> Self {
        Self {
            theta: 1.5,
            phi: 0.5,
            nu: 0.5,
            zip_lambda: 1.5,
            zip_sigma: 0.5,
        }
    }

    /// Moment estimates from `data`, clamped into the solver bounds
    ///
    /// With excess variance `d = var/mean − 1 > 0`: `θ₀ = d`, `Φ₀ = 1/θ₀`,
    /// `ν₀ = 1/(2·mean)`, and the zero-inflated Poisson moments
    /// `λ₀ = mean + d`, `σ₀ = d/λ₀`. Underdispersed samples start close to
    /// the Poisson limit instead.
    pub fn from_moments(data: &CountData) -> Self {
        let mean = data.mean();
        if mean <= 0.0 {
            return Self::fixed().clamped(data);
        }
        let excess = data.variance() / mean - 1.0;
        let (theta, zip_lambda, zip_sigma) = if excess > 0.0 {
            let zip_lambda = mean + excess;
            (excess, zip_lambda, excess / zip_lambda)
        } else {
            (0.1, mean, 0.01)
        };
        Self {
            theta,
            phi: 1.0 / theta,
            nu: 1.0 / (2.0 * mean),
            zip_lambda,
            zip_sigma,
        }
        .clamped(data)
    }

    /// Start from previously fitted models, falling back to `self` for any
    /// model not present
    pub fn seeded_from(mut self, fits: &[FittedModel], data: &CountData) -> Self {
        for fit in fits {
            match fit {
                FittedModel::NegativeBinomial(d) => self.theta = d.theta(),
                FittedModel::Zip(d) => {
                    self.zip_lambda = d.lambda();
                    self.zip_sigma = d.sigma();
                }
                FittedModel::BetaPoisson(d) => {
                    self.phi = d.phi();
                    self.nu = d.nu();
                }
                FittedModel::Poisson(_) | FittedModel::Geometric(_) => {}
            }
        }
        self.clamped(data)
    }

    /// Project every value into its solver's box for this sample
    pub fn clamped(self, data: &CountData) -> Self {
        let mean = data.mean();
        let nu_upper = if mean > 0.0 { 1.0 / mean } else { 1.0 };
        let zip_lower = mean.min(ZIP_LAMBDA_UPPER);
        Self {
            theta: THETA_BOUNDS.clamp(self.theta),
            phi: PHI_BOUNDS.clamp(self.phi),
            // Keep ν₀ strictly inside the beta-Poisson branch
            nu: self.nu.max(NU_FLOOR * 2.0).min(nu_upper),
            zip_lambda: self.zip_lambda.clamp(zip_lower, ZIP_LAMBDA_UPPER),
            zip_sigma: self.zip_sigma.clamp(0.0, SIGMA_UPPER),
        }
    }
}

impl SeedStrategy {
    /// Initial guess for fitting `data` given the full-data fits
    pub fn initial_guess(self, data: &CountData, original: &[FittedModel]) -> InitialGuess {
        match self {
            Self::Moments => InitialGuess::from_moments(data),
            Self::OriginalFit => InitialGuess::from_moments(data).seeded_from(original, data),
        }
    }
}
