//! Extinction probability of a Galton–Watson branching process
//!
//! The process started by one case dies out with probability `q`, the
//! smallest fixed point of the offspring PGF on `[0, 1]`. A mean of at most
//! one makes extinction certain; otherwise the PGF is convex and increasing
//! with slope above one at `s = 1`, so `PGF(s) − s` has exactly one root in
//! `(0, 1)`, which is located by `argmin`'s Brent solver.

use crate::OffspringDistribution;
use offspring_core::optimize::brent_root;
use offspring_core::Result;
use tracing::{debug, warn};

/// Default gap below 1 for the upper end of the root bracket
pub const DEFAULT_BRACKET_GAP: f64 = 1e-6;

/// Smallest gap tried when a near-critical law keeps `PGF(s) ≥ s` close to 1
const MIN_BRACKET_GAP: f64 = 1e-12;

const ROOT_TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: u64 = 200;

/// Probability that a branching process with offspring law `dist` goes extinct
pub fn extinction_probability<D>(dist: &D) -> Result<f64>
where
    D: OffspringDistribution + ?Sized,
{
    if dist.mean() <= 1.0 {
        return Ok(1.0);
    }

    let fixed_point = |s: f64| -> Result<f64> { Ok(dist.pgf(s)? - s) };

    // For a mean barely above one the root sits very close to 1, possibly
    // above the default bracket; shrink the gap until the sign changes.
    let mut gap = dist.extinction_bracket_gap();
    while fixed_point(1.0 - gap)? >= 0.0 {
        if gap <= MIN_BRACKET_GAP {
            warn!(
                model = dist.name(),
                mean = dist.mean(),
                "no sign change below 1; reporting certain extinction"
            );
            return Ok(1.0);
        }
        gap = (gap / 100.0).max(MIN_BRACKET_GAP);
    }

    let q = brent_root(fixed_point, 0.0, 1.0 - gap, ROOT_TOLERANCE, MAX_ITERATIONS)?;
    debug!(model = dist.name(), q, "extinction probability");
    Ok(q.clamp(0.0, 1.0))
}
