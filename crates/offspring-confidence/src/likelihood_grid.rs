//! Likelihood-based regions on a regular parameter grid
//!
//! The likelihood is evaluated at every grid point, rescaled so its largest
//! value is one, and treated as a probability mass over the points. The same
//! greedy highest-density selection used for bootstrap histograms then picks
//! the region. Points where the likelihood is infeasible carry no mass.

use crate::{ConfidenceInterval, JointRegion};
use offspring_core::{Error, Result};
use offspring_histogram::highest_density_cells;

/// `points` evenly spaced values from `range.0` to `range.1` inclusive
fn linspace(range: (f64, f64), points: usize) -> Result<Vec<f64>> {
    let (lo, hi) = range;
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(Error::InvalidParameter(format!("invalid grid range [{lo}, {hi}]")));
    }
    if points < 2 {
        return Err(Error::InvalidParameter("a grid needs at least two points".to_string()));
    }
    let step = (hi - lo) / (points - 1) as f64;
    Ok((0..points)
        .map(|i| if i + 1 == points { hi } else { lo + i as f64 * step })
        .collect())
}

/// Log-likelihood values turned into relative likelihood weights
fn relative_weights(log_likelihoods: &[Option<f64>]) -> Result<(Vec<f64>, usize)> {
    let (best, peak) = log_likelihoods
        .iter()
        .enumerate()
        .filter_map(|(i, llh)| llh.map(|v| (i, v)))
        .fold(None, |acc: Option<(usize, f64)>, (i, v)| match acc {
            Some((_, top)) if top >= v => acc,
            _ => Some((i, v)),
        })
        .ok_or_else(|| Error::domain("log-likelihood is infeasible at every grid point"))?;
    let weights = log_likelihoods
        .iter()
        .map(|llh| llh.map_or(0.0, |v| (v - peak).exp()))
        .collect();
    Ok((weights, best))
}

fn evaluate<F>(llh: &F, point: &[f64]) -> Result<Option<f64>>
where
    F: Fn(&[f64]) -> Result<f64>,
{
    match llh(point) {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(err) if err.is_domain() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Likelihood interval for one parameter
///
/// The estimate is the grid point with the largest likelihood.
pub fn profile_grid_1d<F>(llh: F, range: (f64, f64), points: usize, confidence_level: f64) -> Result<ConfidenceInterval>
where
    F: Fn(f64) -> Result<f64>,
{
    let grid = linspace(range, points)?;
    let llh = |x: &[f64]| llh(x[0]);
    let values = grid
        .iter()
        .map(|&x| evaluate(&llh, &[x]))
        .collect::<Result<Vec<_>>>()?;
    let (weights, best) = relative_weights(&values)?;
    let selection = highest_density_cells(&weights, confidence_level)?;

    let (lower, upper) = selection
        .cells
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
            (lo.min(grid[i]), hi.max(grid[i]))
        });
    Ok(ConfidenceInterval::new(lower, upper, grid[best], confidence_level))
}

/// Joint likelihood region for two parameters, `points` values per axis
pub fn likelihood_grid_2d<F>(
    llh: F,
    x_range: (f64, f64),
    y_range: (f64, f64),
    points: usize,
    confidence_level: f64,
) -> Result<JointRegion>
where
    F: Fn(f64, f64) -> Result<f64>,
{
    let xs = linspace(x_range, points)?;
    let ys = linspace(y_range, points)?;
    let llh = |p: &[f64]| llh(p[0], p[1]);

    let mut coordinates = Vec::with_capacity(points * points);
    let mut values = Vec::with_capacity(points * points);
    for &x in &xs {
        for &y in &ys {
            values.push(evaluate(&llh, &[x, y])?);
            coordinates.push((x, y));
        }
    }
    let (weights, best) = relative_weights(&values)?;
    let selection = highest_density_cells(&weights, confidence_level)?;

    let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); 2];
    for &i in &selection.cells {
        let (x, y) = coordinates[i];
        bounds[0] = (bounds[0].0.min(x), bounds[0].1.max(x));
        bounds[1] = (bounds[1].0.min(y), bounds[1].1.max(y));
    }
    let (bx, by) = coordinates[best];
    Ok(JointRegion {
        bounds,
        estimate: vec![bx, by],
        confidence_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gaussian_profile() {
        // ln L = −x²/2 puts 95% of the mass within ±1.96
        let ci = profile_grid_1d(|x| Ok(-0.5 * x * x), (-6.0, 6.0), 1201, 0.95).unwrap();
        assert_abs_diff_eq!(ci.estimate, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ci.lower, -1.96, epsilon = 0.02);
        assert_abs_diff_eq!(ci.upper, 1.96, epsilon = 0.02);
    }

    #[test]
    fn test_infeasible_points_carry_no_mass() {
        let llh = |x: f64| {
            if x < 0.0 {
                Err(Error::domain("negative"))
            } else {
                Ok(-x)
            }
        };
        let ci = profile_grid_1d(llh, (-1.0, 10.0), 111, 0.9).unwrap();
        assert_eq!(ci.lower, 0.0);
        assert_eq!(ci.estimate, 0.0);
        assert!(ci.upper > 2.0 && ci.upper < 2.6);

        let nowhere = |_: f64| Err(Error::domain("never"));
        assert!(profile_grid_1d(nowhere, (0.0, 1.0), 10, 0.9).is_err());
    }

    #[test]
    fn test_other_errors_propagate() {
        let broken = |_: f64| Err(Error::Computation("boom".to_string()));
        assert!(matches!(
            profile_grid_1d(broken, (0.0, 1.0), 10, 0.9),
            Err(Error::Computation(_))
        ));
    }

    #[test]
    fn test_two_dimensional_region() {
        let llh = |x: f64, y: f64| Ok(-0.5 * ((x - 1.0).powi(2) + (y / 0.1).powi(2)));
        let region = likelihood_grid_2d(llh, (-3.0, 5.0), (-0.5, 0.5), 81, 0.95).unwrap();
        assert_abs_diff_eq!(region.estimate[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(region.estimate[1], 0.0, epsilon = 1e-9);
        // Chi-square(2) radius 2.45 scaled per axis
        assert!(region.bounds[0].0 > -2.0 && region.bounds[0].1 < 4.0);
        assert!(region.bounds[1].0 > -0.3 && region.bounds[1].1 < 0.3);
        assert!(region.contains(&[1.0, 0.0]));
    }

    #[test]
    fn test_bad_grids() {
        assert!(profile_grid_1d(|x| Ok(x), (1.0, 1.0), 10, 0.9).is_err());
        assert!(profile_grid_1d(|x| Ok(x), (0.0, 1.0), 1, 0.9).is_err());
    }
}
