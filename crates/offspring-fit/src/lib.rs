//! Maximum-likelihood fitting of offspring distributions
//!
//! - [`ModelKind`] / [`FittedModel`]: the five models and their positional
//!   parameter layout
//! - [`Fitter`]: bounded likelihood solvers, reporting any failure as
//!   [`Error::FitFailure`](offspring_core::Error::FitFailure)
//! - [`InitialGuess`] / [`SeedStrategy`]: starting points for the solvers
//! - [`derive_quantities`]: variance, overdispersion, superspreading
//!   proportion, `P(0)` and extinction probability of a fitted model
//!
//! # Example
//!
//! ```rust
//! use offspring_core::CountData;
//! use offspring_fit::{Fitter, InitialGuess, ModelKind};
//!
//! let data = CountData::new(vec![0, 0, 0, 1, 1, 2, 3, 5, 9]).unwrap();
//! let fit = Fitter::new()
//!     .fit(ModelKind::NegativeBinomial, &data, &InitialGuess::from_moments(&data))
//!     .unwrap();
//!
//! let params = fit.parameters();
//! assert_eq!(params[0], data.mean());
//! assert!(params[1] > 0.0);
//! ```

pub mod derived;
pub mod likelihood;
pub mod mle;
pub mod model;
pub mod seeds;

pub use derived::{derive_quantities, superspreading_threshold, Quantity};
pub use likelihood::empirical_log_likelihood;
pub use mle::{
    beta_poisson_estimate, beta_poisson_log_likelihood, fit_geometric, fit_lambda_phi, fit_phi_nu, fit_poisson, fit_theta,
    fit_zip, FitSummary, Fitter, ModelFit,
};
pub use model::{FittedModel, ModelKind};
pub use seeds::{InitialGuess, SeedStrategy};
