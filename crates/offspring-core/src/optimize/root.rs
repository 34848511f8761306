//! Bracketed root finding with `argmin`'s Brent solver

use super::simplex::solver_error;
use crate::{Error, Result};
use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentRoot;

/// A scalar function whose iterates must stay finite
struct Scalar<F>(F);

impl<F> CostFunction for Scalar<F>
where
    F: Fn(f64) -> Result<f64>,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> std::result::Result<f64, argmin::core::Error> {
        let value = (self.0)(*x)?;
        if !value.is_finite() {
            return Err(Error::non_finite("root finder iterate").into());
        }
        Ok(value)
    }
}

/// Find a root of `f` inside `[lower, upper]`
///
/// `f(lower)` and `f(upper)` must have opposite signs (or one of them must be
/// exactly zero). The returned point is within `tolerance` of a sign change.
pub fn brent_root<F>(
    f: F,
    lower: f64,
    upper: f64,
    tolerance: f64,
    max_iterations: u64,
) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(Error::InvalidParameter(format!(
            "invalid bracket [{lower}, {upper}]"
        )));
    }
    if tolerance.is_nan() || tolerance <= 0.0 {
        return Err(Error::InvalidParameter(
            "root tolerance must be positive".to_string(),
        ));
    }

    let (fa, fb) = (f(lower)?, f(upper)?);
    if !fa.is_finite() || !fb.is_finite() {
        return Err(Error::non_finite("bracket endpoint value"));
    }
    if fa == 0.0 {
        return Ok(lower);
    }
    if fb == 0.0 {
        return Ok(upper);
    }
    if fa.signum() == fb.signum() {
        return Err(Error::InvalidInput(format!(
            "root not bracketed: f({lower}) = {fa}, f({upper}) = {fb}"
        )));
    }

    let result = Executor::new(Scalar(f), BrentRoot::new(lower, upper, tolerance))
        .configure(|state| state.max_iters(max_iterations))
        .run()
        .map_err(solver_error)?;

    let state = result.state();
    if matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::MaxItersReached)
    ) {
        return Err(Error::Computation(format!(
            "Brent's method did not converge in {max_iterations} iterations"
        )));
    }
    state
        .get_param()
        .or_else(|| state.get_best_param())
        .copied()
        .ok_or_else(|| Error::Computation("Brent's method returned no iterate".to_string()))
}
