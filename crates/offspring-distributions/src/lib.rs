//! Offspring distributions for branching-process transmission models
//!
//! This crate provides the likelihood kernels used to fit secondary-case
//! counts:
//!
//! - **Poisson** and **geometric** one-parameter laws
//! - **Negative binomial** in both the `(λ, θ)` and `(λ, φ = 1/θ)` forms
//! - **Zero-inflated Poisson** `(λ, σ)`
//! - **Beta-Poisson** `(λ, Φ, ν)`, whose PMF needs Kummer's function, provided
//!   by the [`kummer`] module with a double-precision and an extended-precision
//!   summation path
//!
//! Every law implements [`OffspringDistribution`], which also supplies the
//! log-likelihood of a [`CountData`](offspring_core::CountData) sample and the
//! [extinction probability](extinction::extinction_probability) of the
//! corresponding branching process.
//!
//! # Example
//!
//! ```rust
//! use offspring_core::CountData;
//! use offspring_distributions::{NegativeBinomial, OffspringDistribution};
//!
//! let data = CountData::new(vec![0, 0, 0, 1, 1, 2, 4, 7]).unwrap();
//! let nb = NegativeBinomial::new(data.mean(), 1.5).unwrap();
//!
//! let llh = nb.log_likelihood(&data).unwrap();
//! assert!(llh.is_finite() && llh < 0.0);
//!
//! let q = nb.extinction_probability().unwrap();
//! assert!((nb.pgf(q).unwrap() - q).abs() < 1e-6);
//! ```

pub mod beta_poisson;
pub mod extinction;
pub mod geometric;
pub mod kummer;
pub mod negative_binomial;
pub mod poisson;
mod special;
mod traits;
pub mod zip;

pub use beta_poisson::BetaPoisson;
pub use extinction::extinction_probability;
pub use geometric::Geometric;
pub use kummer::{kummer_m, kummer_m_each, ln_kummer_m, KummerPath, PRECISE_THRESHOLD};
pub use negative_binomial::{phi_to_theta, theta_to_phi, NegativeBinomial};
pub use poisson::Poisson;
pub use traits::OffspringDistribution;
pub use zip::ZeroInflatedPoisson;
