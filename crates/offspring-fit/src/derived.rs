//! Epidemiological quantities derived from a fitted model

use crate::model::FittedModel;
use offspring_core::{CountData, Error, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{DiscreteCDF, Poisson as ReferencePoisson};
use std::collections::BTreeMap;
use std::fmt;

/// Quantile of the reference Poisson that defines superspreading
pub const SUPERSPREADING_QUANTILE: f64 = 0.99;

/// A scalar summary of a fitted offspring law
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Variance,
    Overdispersion,
    /// `P(X > threshold)` with the data-derived superspreading threshold
    Superspreading,
    /// `P(X = 0)`
    ProbabilityZero,
    Extinction,
}

impl Quantity {
    pub const ALL: [Quantity; 5] = [
        Quantity::Variance,
        Quantity::Overdispersion,
        Quantity::Superspreading,
        Quantity::ProbabilityZero,
        Quantity::Extinction,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Variance => "variance",
            Self::Overdispersion => "overdispersion",
            Self::Superspreading => "superspreading",
            Self::ProbabilityZero => "p0",
            Self::Extinction => "extinction",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Smallest `k` with `P(Y ≤ k) ≥ 0.99` for `Y ~ Poisson(sample mean)`
///
/// Computed once from the observed data and reused for every model and
/// every resample, so superspreading proportions stay comparable.
pub fn superspreading_threshold(data: &CountData) -> Result<u64> {
    let mean = data.mean();
    if mean <= 0.0 {
        return Ok(0);
    }
    let reference = ReferencePoisson::new(mean)
        .map_err(|e| Error::domain(format!("reference Poisson({mean}): {e}")))?;
    let mut k = mean.floor() as u64;
    while reference.cdf(k) < SUPERSPREADING_QUANTILE {
        k += 1;
    }
    Ok(k)
}

/// Evaluate the requested quantities for one fitted model
pub fn derive_quantities(
    model: &FittedModel,
    threshold: u64,
    quantities: &[Quantity],
) -> Result<BTreeMap<Quantity, f64>> {
    let dist = model.distribution();
    quantities
        .iter()
        .map(|&quantity| {
            let value = match quantity {
                Quantity::Variance => dist.variance(),
                Quantity::Overdispersion => dist.overdispersion()?,
                Quantity::Superspreading => dist.tail_probability(threshold)?,
                Quantity::ProbabilityZero => dist.pmf(0)?,
                Quantity::Extinction => dist.extinction_probability()?,
            };
            Ok((quantity, value))
        })
        .collect()
}
