//! Offspring distribution analysis for transmission data
//!
//! This crate ties the workspace together into one analysis run per dataset:
//!
//! 1. **Fit**: Poisson, geometric, negative binomial, zero-inflated Poisson
//!    and beta-Poisson maximum-likelihood fits to the observed counts
//! 2. **Resample**: a seeded bootstrap that refits every model on each
//!    resample, in parallel when the `parallel` feature is enabled
//! 3. **Aggregate**: highest-density or percentile intervals for parameters
//!    and derived quantities, a joint beta-Poisson region, and optional
//!    likelihood-grid regions
//!
//! # Example
//!
//! ```rust,no_run
//! use offspring_stats::prelude::*;
//!
//! let config = AnalysisConfig::new("plague").with_resamples(500).with_seed(42);
//! let report = run_analysis(&config, &DatasetRegistry::builtin()).unwrap();
//!
//! let nb = report.model(ModelKind::NegativeBinomial).unwrap();
//! println!("theta = {:.3}", nb.parameters[1]);
//! if let Some(ci) = nb.interval("theta") {
//!     println!("{ci}");
//! }
//! ```
//!
//! The stages can also be driven one at a time:
//!
//! ```rust
//! use offspring_stats::prelude::*;
//! use offspring_stats::execution::sequential;
//!
//! let config = AnalysisConfig::new("mers")
//!     .with_models(vec![ModelKind::Poisson])
//!     .with_resamples(50)
//!     .with_seed(1);
//! let fitted = Analysis::from_registry(config, &DatasetRegistry::builtin()).unwrap();
//! let report = fitted.resample(sequential()).unwrap().aggregate().unwrap().into_report();
//! assert_eq!(report.resamples.requested, 50);
//! assert!(report.models.contains_key("poisson"));
//! ```

pub mod config;
pub mod datasets;
pub mod pipeline;
pub mod report;
pub mod sensitivity;

pub use config::{AnalysisConfig, Stages};
pub use datasets::DatasetRegistry;
pub use pipeline::{run_analysis, Aggregated, Analysis, AnalysisState, Fitted, Resampled};
pub use report::{AnalysisReport, DatasetSummary, ModelReport, QuantityReport, ResampleCounts};
pub use sensitivity::{
    beta_poisson_sensitivity, beta_poisson_sensitivity_full, beta_poisson_slice, BetaParameter, SensitivityAxes,
    SensitivityCurve, SensitivityReport, SensitivitySlice,
};

// Workspace crates
pub use offspring_confidence;
pub use offspring_core;
pub use offspring_distributions;
pub use offspring_fit;
pub use offspring_histogram;

pub use offspring_core::{execution, Error, Result};

/// Commonly used items
pub mod prelude {
    pub use crate::config::{AnalysisConfig, Stages};
    pub use crate::datasets::DatasetRegistry;
    pub use crate::pipeline::{run_analysis, Analysis};
    pub use crate::report::{AnalysisReport, ModelReport};
    pub use offspring_confidence::{ConfidenceInterval, IntervalMethod, JointRegion};
    pub use offspring_core::{AnyEngine, CountData, Error, ExecutionEngine, Result};
    pub use offspring_distributions::OffspringDistribution;
    pub use offspring_fit::{ModelKind, Quantity, SeedStrategy};
    pub use offspring_histogram::Binning;
}
