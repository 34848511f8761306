//! Analysis run configuration
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes. [`AnalysisConfig::validate`] runs before any fitting starts.

use offspring_confidence::{ConfidenceLevel, IntervalMethod, DEFAULT_MAX_REDRAWS, DEFAULT_RESAMPLES};
use offspring_core::{Error, Result};
use offspring_fit::{ModelKind, Quantity, SeedStrategy};
use offspring_histogram::Binning;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Optional outputs of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stages {
    pub variance: bool,
    pub overdispersion: bool,
    pub superspreading: bool,
    pub probability_zero: bool,
    pub extinction: bool,
    /// Joint `(λ, Φ, ν)` region for the beta-Poisson model
    pub joint_region: bool,
    /// Likelihood-grid intervals for the Poisson, geometric and ZIP models
    pub likelihood_grid: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            variance: true,
            overdispersion: true,
            superspreading: true,
            probability_zero: true,
            extinction: true,
            joint_region: true,
            likelihood_grid: false,
        }
    }
}

impl Stages {
    /// Parameter estimates and intervals only
    pub fn parameters_only() -> Self {
        Self {
            variance: false,
            overdispersion: false,
            superspreading: false,
            probability_zero: false,
            extinction: false,
            joint_region: false,
            likelihood_grid: false,
        }
    }

    /// Derived quantities enabled by these stages
    pub fn quantities(&self) -> Vec<Quantity> {
        Quantity::ALL
            .into_iter()
            .filter(|q| match q {
                Quantity::Variance => self.variance,
                Quantity::Overdispersion => self.overdispersion,
                Quantity::Superspreading => self.superspreading,
                Quantity::ProbabilityZero => self.probability_zero,
                Quantity::Extinction => self.extinction,
            })
            .collect()
    }
}

/// Settings for one analysis of one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Registry name of the dataset to analyse
    pub dataset: String,
    /// Worker threads for the resampling batch
    pub workers: usize,
    pub resamples: usize,
    pub confidence_level: f64,
    /// Fixed seed for a reproducible run
    pub seed: Option<u64>,
    /// Cap on redraws of a zero-mean resample
    pub max_redraws: usize,
    /// Histogram binning for one-dimensional highest-density intervals
    pub binning: Binning,
    /// Binning per axis of the joint beta-Poisson histogram
    pub joint_binning: Binning,
    pub interval_method: IntervalMethod,
    pub seed_strategy: SeedStrategy,
    pub models: Vec<ModelKind>,
    pub stages: Stages,
    /// Points per axis of the likelihood grids
    pub grid_points: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset: "plague".to_string(),
            workers: num_cpus::get(),
            resamples: DEFAULT_RESAMPLES,
            confidence_level: ConfidenceLevel::NINETY_FIVE.value(),
            seed: None,
            max_redraws: DEFAULT_MAX_REDRAWS,
            binning: Binning::default(),
            joint_binning: Binning::Count(20),
            interval_method: IntervalMethod::default(),
            seed_strategy: SeedStrategy::default(),
            models: ModelKind::ALL.to_vec(),
            stages: Stages::default(),
            grid_points: 200,
        }
    }
}

impl AnalysisConfig {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_redraws(mut self, max_redraws: usize) -> Self {
        self.max_redraws = max_redraws;
        self
    }

    pub fn with_binning(mut self, binning: Binning) -> Self {
        self.binning = binning;
        self
    }

    pub fn with_joint_binning(mut self, binning: Binning) -> Self {
        self.joint_binning = binning;
        self
    }

    pub fn with_interval_method(mut self, method: IntervalMethod) -> Self {
        self.interval_method = method;
        self
    }

    pub fn with_seed_strategy(mut self, strategy: SeedStrategy) -> Self {
        self.seed_strategy = strategy;
        self
    }

    pub fn with_models(mut self, models: Vec<ModelKind>) -> Self {
        self.models = models;
        self
    }

    pub fn with_stages(mut self, stages: Stages) -> Self {
        self.stages = stages;
        self
    }

    pub fn with_grid_points(mut self, points: usize) -> Self {
        self.grid_points = points;
        self
    }

    pub fn level(&self) -> Result<ConfidenceLevel> {
        ConfidenceLevel::new(self.confidence_level)
    }

    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        if self.dataset.trim().is_empty() {
            return Err(Error::configuration("dataset name is empty"));
        }
        if self.workers == 0 {
            return Err(Error::configuration("worker count must be positive"));
        }
        if self.resamples == 0 {
            return Err(Error::configuration("resample count must be positive"));
        }
        self.level()?;
        for (name, binning) in [("binning", self.binning), ("joint_binning", self.joint_binning)] {
            binning
                .bins_for(0.0, 1.0)
                .map_err(|e| Error::configuration(format!("{name}: {e}")))?;
        }
        if self.models.is_empty() {
            return Err(Error::configuration("no models selected"));
        }
        let distinct: BTreeSet<ModelKind> = self.models.iter().copied().collect();
        if distinct.len() != self.models.len() {
            return Err(Error::configuration("a model is listed more than once"));
        }
        if self.stages.likelihood_grid && self.grid_points < 2 {
            return Err(Error::configuration("likelihood grids need at least two points"));
        }
        Ok(())
    }
}
