//! Numerical solvers shared by the likelihood fits and the extinction solver
//!
//! Both wrap `argmin`: [`SimplexMinimizer`] drives its Nelder–Mead solver over
//! a box, and [`brent_root`] its bracketed Brent root finder.

mod root;
mod simplex;

pub use root::brent_root;
pub use simplex::{Boxed, Bounds, Minimum, SimplexMinimizer};
