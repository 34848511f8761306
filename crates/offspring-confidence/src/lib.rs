//! Bootstrap confidence intervals for offspring distribution fits
//!
//! This crate turns fitted models into interval estimates:
//!
//! - **Resampling**: [`Bootstrap`] draws resamples with replacement on any
//!   [`ExecutionEngine`](offspring_core::ExecutionEngine), redrawing
//!   zero-mean resamples up to a cap
//! - **Refitting**: [`RefitContext`] refits every model on a resample and
//!   tags each model's result as [`FitOutcome::Succeeded`] or
//!   [`FitOutcome::Failed`]
//! - **Intervals**: [`HighestDensityBootstrap`] and [`PercentileBootstrap`]
//!   for single estimates, [`joint_highest_density_region`] for parameter
//!   vectors, and likelihood-grid regions for comparison
//!
//! # Example
//!
//! ```rust
//! use offspring_confidence::{
//!     collect_model_samples, Bootstrap, BootstrapMethod, HighestDensityBootstrap, RefitContext,
//! };
//! use offspring_core::{execution::sequential, CountData};
//! use offspring_fit::ModelKind;
//!
//! let data = CountData::new(vec![0, 0, 1, 1, 1, 2, 2, 3, 4, 7]).unwrap();
//! let context = RefitContext::new(vec![ModelKind::Poisson], 6);
//! let run = Bootstrap::new(sequential())
//!     .with_resamples(200)
//!     .with_seed(11)
//!     .run(&data, |i, resample| context.refit(i, resample))
//!     .unwrap();
//!
//! let samples = collect_model_samples(&run, &[ModelKind::Poisson]);
//! let lambda = samples[&ModelKind::Poisson].column(0);
//! let ci = HighestDensityBootstrap::default()
//!     .calculate_interval(&lambda, data.mean(), 0.95)
//!     .unwrap();
//! assert!(ci.contains(data.mean()));
//! ```

mod aggregate;
mod bootstrap;
mod joint;
mod likelihood_grid;
mod methods;
mod refit;
mod types;

pub use aggregate::{collect_model_samples, ModelSamples};
pub use bootstrap::{Bootstrap, BootstrapRun, ResampleOutcome, DEFAULT_MAX_REDRAWS, DEFAULT_RESAMPLES};
pub use joint::joint_highest_density_region;
pub use likelihood_grid::{likelihood_grid_2d, profile_grid_1d};
pub use methods::{AnyMethod, BootstrapMethod, HighestDensityBootstrap, IntervalMethod, PercentileBootstrap};
pub use refit::{FitOutcome, RefitContext, ResampleFits};
pub use types::{ConfidenceInterval, ConfidenceLevel, JointRegion};
