//! Box-constrained Nelder–Mead minimisation on top of `argmin`
//!
//! `argmin`'s simplex is unconstrained, so the box is imposed by [`Boxed`]:
//! every trial point is projected onto the box before the inner cost is
//! evaluated, and a linear penalty on the distance outside keeps the simplex
//! pulled back in. Costs that come back as [`Error::Domain`] or NaN are
//! mapped to `+inf`, so infeasible vertices are never accepted.

use crate::{Error, Result};
use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use tracing::{debug, trace};

/// Cost added per box width travelled outside the bounds
const BOUND_PENALTY: f64 = 1e3;

/// Closed interval constraint for one coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// Create bounds, requiring finite `lower <= upper`
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(Error::InvalidParameter(format!(
                "invalid bounds [{lower}, {upper}]"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.lower).min(self.upper)
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }
}

/// Outcome of a minimisation
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found, inside the box
    pub x: Vec<f64>,
    /// Inner cost at `x`
    pub value: f64,
    /// Cost evaluations reported by the solver, including restarts
    pub evaluations: usize,
    /// Whether the last simplex collapsed below the cost tolerance
    pub converged: bool,
}

/// A cost function restricted to a box
pub struct Boxed<'a, C> {
    inner: &'a C,
    bounds: &'a [Bounds],
}

impl<'a, C> Boxed<'a, C> {
    pub fn new(inner: &'a C, bounds: &'a [Bounds]) -> Self {
        Self { inner, bounds }
    }

    /// Nearest point of the box
    pub fn project(&self, x: &[f64]) -> Vec<f64> {
        x.iter().zip(self.bounds).map(|(&v, b)| b.clamp(v)).collect()
    }

    fn outside(&self, x: &[f64], projected: &[f64]) -> f64 {
        x.iter()
            .zip(projected)
            .zip(self.bounds)
            .map(|((v, p), b)| {
                let scale = if b.width() > 0.0 { b.width() } else { 1.0 };
                (v - p).abs() / scale
            })
            .sum()
    }
}

impl<C> Clone for Boxed<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Boxed<'_, C> {}

impl<C> CostFunction for Boxed<'_, C>
where
    C: CostFunction<Param = Vec<f64>, Output = f64>,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> std::result::Result<f64, argmin::core::Error> {
        let projected = self.project(x);
        match self.inner.cost(&projected) {
            Ok(value) if value.is_nan() => Ok(f64::INFINITY),
            Ok(value) => Ok(value + BOUND_PENALTY * self.outside(x, &projected)),
            Err(err) => match err.downcast_ref::<Error>() {
                Some(Error::Domain(reason)) => {
                    trace!(?projected, %reason, "infeasible point rejected");
                    Ok(f64::INFINITY)
                }
                _ => Err(err),
            },
        }
    }
}

/// Bounded Nelder–Mead with restarts around the best vertex
#[derive(Debug, Clone)]
pub struct SimplexMinimizer {
    max_iterations: u64,
    tolerance: f64,
    initial_step: f64,
    restarts: usize,
}

impl Default for SimplexMinimizer {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            tolerance: 1e-10,
            initial_step: 0.05,
            restarts: 2,
        }
    }
}

impl SimplexMinimizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iteration budget of each simplex pass
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(Error::configuration("iteration budget must be positive"));
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }

    /// Standard deviation of the vertex costs at which a pass stops
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(Error::configuration(format!(
                "tolerance must be positive, got {tolerance}"
            )));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Relative size of the initial simplex edges
    pub fn with_initial_step(mut self, initial_step: f64) -> Result<Self> {
        if !(initial_step.is_finite() && initial_step > 0.0) {
            return Err(Error::configuration(format!(
                "initial step must be positive, got {initial_step}"
            )));
        }
        self.initial_step = initial_step;
        Ok(self)
    }

    /// Number of times the simplex is rebuilt around the best vertex
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Minimise `cost` over the box `bounds`, starting from `x0`
    ///
    /// `x0` is projected onto the box first. Fails when no feasible point is
    /// found, or when the cost returns an error other than [`Error::Domain`].
    pub fn minimize<C>(&self, cost: &C, x0: &[f64], bounds: &[Bounds]) -> Result<Minimum>
    where
        C: CostFunction<Param = Vec<f64>, Output = f64>,
    {
        if x0.is_empty() {
            return Err(Error::empty_input("minimisation"));
        }
        if x0.len() != bounds.len() {
            return Err(Error::InvalidInput(format!(
                "starting point has {} coordinates but {} bounds were given",
                x0.len(),
                bounds.len()
            )));
        }
        if x0.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("starting point"));
        }

        let problem = Boxed::new(cost, bounds);
        let mut best = self.run(problem, &problem.project(x0))?;
        for restart in 0..self.restarts {
            if !best.value.is_finite() {
                break;
            }
            let next = self.run(problem, &best.x)?;
            let gain = best.value - next.value;
            trace!(restart, gain, "simplex restart");
            let evaluations = best.evaluations + next.evaluations;
            best = if next.value < best.value {
                Minimum { evaluations, ..next }
            } else {
                Minimum {
                    evaluations,
                    converged: best.converged || next.converged,
                    ..best
                }
            };
            if gain <= self.tolerance * (1.0 + best.value.abs()) {
                break;
            }
        }

        if !best.value.is_finite() {
            return Err(Error::Computation(format!(
                "no feasible point found in {} evaluations",
                best.evaluations
            )));
        }
        debug!(evaluations = best.evaluations, value = best.value, converged = best.converged, "simplex finished");
        Ok(best)
    }

    /// One simplex pass from a fresh simplex around `x0`
    fn run<C>(&self, problem: Boxed<'_, C>, x0: &[f64]) -> Result<Minimum>
    where
        C: CostFunction<Param = Vec<f64>, Output = f64>,
    {
        let solver = NelderMead::new(self.initial_simplex(x0, problem.bounds))
            .with_sd_tolerance(self.tolerance)
            .map_err(solver_error)?;
        let result = Executor::new(problem, solver)
            .configure(|state| state.max_iters(self.max_iterations))
            .run()
            .map_err(solver_error)?;

        let state = result.state();
        let evaluations = state.get_func_counts().get("cost_count").copied().unwrap_or(0) as usize;
        let converged = matches!(
            state.get_termination_status(),
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        );
        let x = state
            .get_best_param()
            .map(|p| problem.project(p))
            .unwrap_or_else(|| x0.to_vec());
        // Re-evaluate at the projection so the value carries no penalty
        let value = if state.get_best_cost().is_finite() {
            problem.cost(&x).map_err(solver_error)?
        } else {
            f64::INFINITY
        };
        Ok(Minimum {
            x,
            value,
            evaluations: evaluations + 1,
            converged,
        })
    }

    fn initial_simplex(&self, x0: &[f64], bounds: &[Bounds]) -> Vec<Vec<f64>> {
        let mut simplex = Vec::with_capacity(x0.len() + 1);
        simplex.push(x0.to_vec());
        for (i, b) in bounds.iter().enumerate() {
            let step = (self.initial_step * x0[i].abs()).max(1e-3 * b.width());
            let mut vertex = x0.to_vec();
            vertex[i] = if x0[i] + step <= b.upper {
                x0[i] + step
            } else {
                b.clamp(x0[i] - step)
            };
            simplex.push(vertex);
        }
        simplex
    }
}

/// Recover our error from the solver's, keeping its variant
pub(crate) fn solver_error(err: argmin::core::Error) -> Error {
    match err.downcast::<Error>() {
        Ok(err) => err,
        Err(other) => Error::Computation(other.to_string()),
    }
}
