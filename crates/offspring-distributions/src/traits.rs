//! The interface shared by every offspring distribution

use crate::special::unit_interval;
use offspring_core::{CountData, Error, Result};

/// A discrete distribution of secondary cases per infected individual
///
/// Evaluations outside a distribution's valid domain return
/// [`Error::Domain`], never NaN; the likelihood fits rely on this to reject
/// infeasible points.
pub trait OffspringDistribution: Send + Sync + std::fmt::Debug {
    /// Short lowercase name used in log messages
    fn name(&self) -> &'static str;

    /// `ln P(X = x)`
    fn ln_pmf(&self, x: u64) -> Result<f64>;

    /// Probability generating function `E[s^X]` for `s ∈ [0, 1]`
    fn pgf(&self, s: f64) -> Result<f64>;

    fn mean(&self) -> f64;

    fn variance(&self) -> f64;

    /// `P(X = x)`
    fn pmf(&self, x: u64) -> Result<f64> {
        Ok(self.ln_pmf(x)?.exp())
    }

    fn pmf_many(&self, xs: &[u64]) -> Result<Vec<f64>> {
        xs.iter().map(|&x| self.pmf(x)).collect()
    }

    fn pgf_many(&self, points: &[f64]) -> Result<Vec<f64>> {
        points
            .iter()
            .map(|&s| {
                unit_interval(s)?;
                self.pgf(s)
            })
            .collect()
    }

    /// Total log-likelihood of a sample
    ///
    /// Each distinct count is evaluated once and weighted by its multiplicity.
    fn log_likelihood(&self, data: &CountData) -> Result<f64> {
        let mut total = 0.0;
        for &(x, count) in data.frequencies() {
            total += count as f64 * self.ln_pmf(x)?;
        }
        if total.is_finite() {
            Ok(total)
        } else {
            Err(Error::domain(format!(
                "{} log-likelihood is not finite",
                self.name()
            )))
        }
    }

    /// `(variance − mean) / mean`
    fn overdispersion(&self) -> Result<f64> {
        let mean = self.mean();
        if mean > 0.0 {
            Ok((self.variance() - mean) / mean)
        } else {
            Err(Error::domain("overdispersion of a zero-mean distribution"))
        }
    }

    /// `P(X ≤ x)`
    fn cdf(&self, x: u64) -> Result<f64> {
        let mut total = 0.0;
        for k in 0..=x {
            total += self.pmf(k)?;
        }
        Ok(total.min(1.0))
    }

    /// `P(X > boundary)`
    fn tail_probability(&self, boundary: u64) -> Result<f64> {
        Ok((1.0 - self.cdf(boundary)?).max(0.0))
    }

    /// Gap below 1 used as the upper end of the extinction root bracket
    fn extinction_bracket_gap(&self) -> f64 {
        crate::extinction::DEFAULT_BRACKET_GAP
    }

    /// Probability that a branching process with this offspring law dies out
    fn extinction_probability(&self) -> Result<f64> {
        crate::extinction::extinction_probability(self)
    }
}
