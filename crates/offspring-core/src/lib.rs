//! Core types and solvers for offspring distribution analysis
//!
//! This crate provides the foundation shared by the other offspring crates:
//!
//! - **Errors**: one [`Error`] enum covering domain errors, fit failures and
//!   configuration errors
//! - **Samples**: [`CountData`], an immutable sample of secondary-case counts
//!   with its moments and distinct-value table
//! - **Execution**: [`ExecutionEngine`] abstraction over sequential and
//!   rayon-backed batch execution
//! - **Optimisation**: box-constrained Nelder–Mead and Brent's bracketed root
//!   finder, both driven through `argmin`
//!
//! # Example
//!
//! ```rust
//! use argmin::core::{CostFunction, Error as SolverError};
//! use offspring_core::{optimize::{Bounds, SimplexMinimizer}, CountData};
//!
//! struct SquaredDistance(f64);
//!
//! impl CostFunction for SquaredDistance {
//!     type Param = Vec<f64>;
//!     type Output = f64;
//!
//!     fn cost(&self, x: &Vec<f64>) -> Result<f64, SolverError> {
//!         Ok((x[0] - self.0).powi(2))
//!     }
//! }
//!
//! let data = CountData::new(vec![0, 1, 1, 2, 5]).unwrap();
//! assert_eq!(data.frequencies(), &[(0, 1), (1, 2), (2, 1), (5, 1)]);
//!
//! let bounds = [Bounds::new(0.0, 10.0).unwrap()];
//! let min = SimplexMinimizer::new()
//!     .minimize(&SquaredDistance(data.mean()), &[5.0], &bounds)
//!     .unwrap();
//! assert!((min.x[0] - 1.8).abs() < 1e-3);
//! ```

pub mod error;
pub mod execution;
pub mod optimize;
pub mod sample;

pub use error::{Error, Result};
#[cfg(feature = "parallel")]
pub use execution::ParallelEngine;
pub use execution::{AnyEngine, ExecutionEngine, ExecutionStrategy, SequentialEngine};
pub use sample::CountData;
