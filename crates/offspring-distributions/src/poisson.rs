//! Poisson offspring distribution

use crate::special::{ln_factorial, positive, unit_interval};
use crate::OffspringDistribution;
use offspring_core::Result;
use serde::Serialize;

/// Poisson distribution with mean `λ`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self {
            lambda: positive("lambda", lambda)?,
        })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl OffspringDistribution for Poisson {
    fn name(&self) -> &'static str {
        "poisson"
    }

    fn ln_pmf(&self, x: u64) -> Result<f64> {
        Ok(x as f64 * self.lambda.ln() - self.lambda - ln_factorial(x))
    }

    fn pgf(&self, s: f64) -> Result<f64> {
        let s = unit_interval(s)?;
        Ok((self.lambda * (s - 1.0)).exp())
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda
    }
}
