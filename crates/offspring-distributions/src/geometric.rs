//! Geometric offspring distribution on `{0, 1, 2, ...}`

use crate::special::{positive, unit_interval};
use crate::OffspringDistribution;
use offspring_core::Result;
use serde::Serialize;

/// Geometric distribution parameterised by its mean `λ`
///
/// Success probability `p = 1 / (λ + 1)`, so `P(X = x) = p (1 − p)^x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometric {
    lambda: f64,
}

impl Geometric {
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self {
            lambda: positive("lambda", lambda)?,
        })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn success_probability(&self) -> f64 {
        1.0 / (self.lambda + 1.0)
    }
}

impl OffspringDistribution for Geometric {
    fn name(&self) -> &'static str {
        "geometric"
    }

    fn ln_pmf(&self, x: u64) -> Result<f64> {
        let ln_one_plus = self.lambda.ln_1p();
        Ok(x as f64 * (self.lambda.ln() - ln_one_plus) - ln_one_plus)
    }

    fn pgf(&self, s: f64) -> Result<f64> {
        let s = unit_interval(s)?;
        Ok(1.0 / (self.lambda + 1.0 - self.lambda * s))
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda * (1.0 + self.lambda)
    }
}
