//! Bootstrap method implementations
//!
//! A method turns the bootstrap distribution of one estimate into an
//! interval. Estimates from failed resamples never reach a method; callers
//! pass only the surviving values.

use crate::ConfidenceInterval;
use offspring_core::{Error, Result};
use offspring_histogram::{Binning, FixedWidthBuilder, HistogramBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Bootstrap method for calculating confidence intervals
///
/// This trait defines how to construct a confidence interval from
/// bootstrap estimates.
pub trait BootstrapMethod: Clone + Send + Sync {
    /// Calculate confidence interval from bootstrap distribution
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval>;

    /// Method name for documentation
    fn name(&self) -> &'static str;
}

fn check_estimates(bootstrap_estimates: &[f64], confidence_level: f64) -> Result<()> {
    if bootstrap_estimates.is_empty() {
        return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
    }
    if bootstrap_estimates.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite("bootstrap estimates"));
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(Error::configuration(format!(
            "confidence level must be in (0, 1), got {confidence_level}"
        )));
    }
    Ok(())
}

/// Percentile bootstrap method
///
/// The simplest bootstrap method. Uses the empirical percentiles of the
/// bootstrap distribution to construct the confidence interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        check_estimates(bootstrap_estimates, confidence_level)?;

        let mut sorted = bootstrap_estimates.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let alpha = 1.0 - confidence_level;
        let lower_idx = ((alpha / 2.0) * sorted.len() as f64) as usize;
        let upper_idx = ((1.0 - alpha / 2.0) * sorted.len() as f64) as usize;

        let lower_idx = lower_idx.min(sorted.len() - 1);
        let upper_idx = upper_idx.min(sorted.len() - 1);

        Ok(ConfidenceInterval::new(
            sorted[lower_idx],
            sorted[upper_idx],
            original_estimate,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

/// Highest-density bootstrap method
///
/// Bins the bootstrap estimates into a fixed-width histogram and reports the
/// outer edges of the heaviest bins holding at least the confidence level.
/// A bootstrap distribution that sits in one bin yields a point interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestDensityBootstrap {
    binning: Binning,
}

impl HighestDensityBootstrap {
    pub fn new(binning: Binning) -> Self {
        Self { binning }
    }

    pub fn binning(&self) -> Binning {
        self.binning
    }
}

impl BootstrapMethod for HighestDensityBootstrap {
    #[instrument(level = "trace", skip(self, bootstrap_estimates), fields(n_estimates = bootstrap_estimates.len()))]
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        check_estimates(bootstrap_estimates, confidence_level)?;

        let histogram = FixedWidthBuilder::with_binning(self.binning).build(bootstrap_estimates)?;
        let (lower, upper) = histogram.highest_density_interval(confidence_level)?;
        debug!(%histogram, lower, upper, "highest-density interval");

        Ok(ConfidenceInterval::new(
            lower,
            upper,
            original_estimate,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Highest-Density Bootstrap"
    }
}

/// Interval construction selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMethod {
    #[default]
    HighestDensity,
    Percentile,
}

impl IntervalMethod {
    /// The method with histogram binning applied where it matters
    pub fn with_binning(self, binning: Binning) -> AnyMethod {
        match self {
            Self::HighestDensity => AnyMethod::HighestDensity(HighestDensityBootstrap::new(binning)),
            Self::Percentile => AnyMethod::Percentile(PercentileBootstrap),
        }
    }
}

/// Either bootstrap method, chosen at runtime
#[derive(Debug, Clone, Copy)]
pub enum AnyMethod {
    HighestDensity(HighestDensityBootstrap),
    Percentile(PercentileBootstrap),
}

impl BootstrapMethod for AnyMethod {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        match self {
            Self::HighestDensity(m) => {
                m.calculate_interval(bootstrap_estimates, original_estimate, confidence_level)
            }
            Self::Percentile(m) => m.calculate_interval(bootstrap_estimates, original_estimate, confidence_level),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::HighestDensity(m) => m.name(),
            Self::Percentile(m) => m.name(),
        }
    }
}
