//! The result bundle of one analysis run
//!
//! Model entries are keyed by the stable model names (`"poisson"`,
//! `"geometric"`, `"negative binomial"`, `"zip"`, `"beta-Poisson"`) and
//! parameter vectors keep the model's positional order.

use offspring_confidence::{ConfidenceInterval, IntervalMethod, JointRegion};
use offspring_core::{CountData, Result};
use offspring_fit::{empirical_log_likelihood, ModelKind, SeedStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary statistics of the analysed sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
    /// `(variance − mean) / mean`; absent for an all-zero sample
    pub overdispersion: Option<f64>,
    pub superspreading_threshold: u64,
    /// Saturated log-likelihood, an upper bound for every model
    pub empirical_log_likelihood: f64,
}

impl DatasetSummary {
    pub fn new(name: impl Into<String>, data: &CountData, superspreading_threshold: u64) -> Self {
        Self {
            name: name.into(),
            n: data.len(),
            mean: data.mean(),
            variance: data.variance(),
            overdispersion: data.overdispersion().ok(),
            superspreading_threshold,
            empirical_log_likelihood: empirical_log_likelihood(data),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResampleCounts {
    pub requested: usize,
    /// Resamples that produced a non-degenerate draw
    pub completed: usize,
    /// Resamples abandoned after the redraw cap
    pub exhausted: usize,
    pub seed: u64,
}

/// A derived quantity at the point estimate with its bootstrap interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantityReport {
    pub value: Option<f64>,
    pub interval: Option<ConfidenceInterval>,
}

/// Everything reported for one fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub parameter_names: Vec<String>,
    pub parameters: Vec<f64>,
    /// One bootstrap interval per parameter; absent when no resample fitted
    pub intervals: Vec<Option<ConfidenceInterval>>,
    pub log_likelihood: f64,
    pub converged: bool,
    pub successful_resamples: usize,
    pub failed_resamples: usize,
    pub quantities: BTreeMap<String, QuantityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joint_region: Option<JointRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood_region: Option<JointRegion>,
}

impl ModelReport {
    /// Interval of the named parameter, if one was computed
    pub fn interval(&self, parameter: &str) -> Option<&ConfidenceInterval> {
        let i = self.parameter_names.iter().position(|name| name == parameter)?;
        self.intervals.get(i)?.as_ref()
    }

    pub fn quantity(&self, key: &str) -> Option<&QuantityReport> {
        self.quantities.get(key)
    }
}

/// Complete output of [`run_analysis`](crate::run_analysis)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub dataset: DatasetSummary,
    pub confidence_level: f64,
    pub interval_method: IntervalMethod,
    pub seed_strategy: SeedStrategy,
    pub resamples: ResampleCounts,
    pub models: BTreeMap<String, ModelReport>,
    /// Models whose full-data fit failed, with the reason
    pub failed_models: BTreeMap<String, String>,
}

impl AnalysisReport {
    pub fn model(&self, kind: ModelKind) -> Option<&ModelReport> {
        self.models.get(kind.key())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
