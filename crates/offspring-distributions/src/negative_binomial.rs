//! Negative binomial offspring distribution
//!
//! Two equivalent parameterisations are in use:
//!
//! - θ-form `(λ, θ)`: mean `λ`, variance `λ(1 + θ)`; equal to a
//!   `nbinom(n = λ/θ, p = 1/(1 + θ))` count of failures
//! - φ-form `(λ, φ)` with `φ = 1/θ`: `nbinom(n = λφ, p = φ/(φ + 1))`
//!
//! `θ = 0` is the Poisson limit and is accepted.

use crate::special::{ln_factorial, ln_product, positive, unit_interval};
use crate::OffspringDistribution;
use offspring_core::{CountData, Error, Result};
use serde::Serialize;

/// Negative binomial with mean `λ` and overdispersion `θ`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NegativeBinomial {
    lambda: f64,
    theta: f64,
}

impl NegativeBinomial {
    /// θ-form constructor; `θ ≥ 0`
    pub fn new(lambda: f64, theta: f64) -> Result<Self> {
        let lambda = positive("lambda", lambda)?;
        if !theta.is_finite() || theta < 0.0 {
            return Err(Error::domain(format!(
                "theta must be finite and non-negative, got {theta}"
            )));
        }
        Ok(Self { lambda, theta })
    }

    /// φ-form constructor; `φ > 0`, `θ = 1/φ`
    pub fn from_phi(lambda: f64, phi: f64) -> Result<Self> {
        let phi = positive("phi", phi)?;
        Self::new(lambda, phi_to_theta(phi))
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// `1/θ`; infinite in the Poisson limit
    pub fn phi(&self) -> f64 {
        theta_to_phi(self.theta)
    }
}

/// `θ = 1/φ`
pub fn phi_to_theta(phi: f64) -> f64 {
    1.0 / phi
}

/// `φ = 1/θ`
pub fn theta_to_phi(theta: f64) -> f64 {
    1.0 / theta
}

impl OffspringDistribution for NegativeBinomial {
    fn name(&self) -> &'static str {
        "negative binomial"
    }

    fn ln_pmf(&self, x: u64) -> Result<f64> {
        let (lambda, theta) = (self.lambda, self.theta);
        if theta == 0.0 {
            return Ok(x as f64 * lambda.ln() - lambda - ln_factorial(x));
        }
        // Σ_{j<x} ln((λ + jθ)/(1 + θ)) − ln x! − (λ/θ) ln(1 + θ); stays
        // accurate as θ → 0 where n = λ/θ grows without bound
        let ln_one_plus = theta.ln_1p();
        let rising = ln_product(x, |j| lambda + j * theta) - x as f64 * ln_one_plus;
        Ok(rising - ln_factorial(x) - lambda / theta * ln_one_plus)
    }

    fn pgf(&self, s: f64) -> Result<f64> {
        let s = unit_interval(s)?;
        if self.theta == 0.0 {
            return Ok((self.lambda * (s - 1.0)).exp());
        }
        // (1 + θ − sθ)^(−λ/θ)
        Ok((-(self.lambda / self.theta) * (self.theta * (1.0 - s)).ln_1p()).exp())
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda * (1.0 + self.theta)
    }
}

/// Log-likelihood in the θ-form
pub fn log_likelihood_theta(data: &CountData, lambda: f64, theta: f64) -> Result<f64> {
    NegativeBinomial::new(lambda, theta)?.log_likelihood(data)
}

/// Log-likelihood in the φ-form
pub fn log_likelihood_phi(data: &CountData, lambda: f64, phi: f64) -> Result<f64> {
    NegativeBinomial::from_phi(lambda, phi)?.log_likelihood(data)
}
