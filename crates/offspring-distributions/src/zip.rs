//! Zero-inflated Poisson offspring distribution

use crate::special::{ln_factorial, positive, unit_interval};
use crate::OffspringDistribution;
use offspring_core::{Error, Result};
use serde::Serialize;

/// Poisson(`λ`) mixed with a point mass at zero of weight `σ`
///
/// `P(0) = σ + (1 − σ) e^{−λ}` and `P(x) = (1 − σ) Poisson(x; λ)` for `x > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZeroInflatedPoisson {
    lambda: f64,
    sigma: f64,
}

impl ZeroInflatedPoisson {
    /// `λ > 0`, `σ ∈ [0, 1)`
    pub fn new(lambda: f64, sigma: f64) -> Result<Self> {
        let lambda = positive("lambda", lambda)?;
        if !(0.0..1.0).contains(&sigma) {
            return Err(Error::domain(format!(
                "zero-inflation sigma must lie in [0, 1), got {sigma}"
            )));
        }
        Ok(Self { lambda, sigma })
    }

    /// Baseline Poisson mean
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Zero-inflation probability
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl OffspringDistribution for ZeroInflatedPoisson {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn ln_pmf(&self, x: u64) -> Result<f64> {
        let (lambda, sigma) = (self.lambda, self.sigma);
        if x == 0 {
            return Ok((sigma + (1.0 - sigma) * (-lambda).exp()).ln());
        }
        Ok((-sigma).ln_1p() + x as f64 * lambda.ln() - lambda - ln_factorial(x))
    }

    fn pgf(&self, s: f64) -> Result<f64> {
        let s = unit_interval(s)?;
        Ok(self.sigma + (1.0 - self.sigma) * (self.lambda * (s - 1.0)).exp())
    }

    fn mean(&self) -> f64 {
        (1.0 - self.sigma) * self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda * (1.0 - self.sigma) * (1.0 + self.sigma * self.lambda)
    }
}
