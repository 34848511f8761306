//! Double-precision summation of the positive Kummer series

use offspring_core::{Error, Result};

/// Running sums are divided by this whenever they exceed it
const RESCALE_LIMIT: f64 = 1e250;

/// `ln Σ_k (α)_k / (b)_k · w^k / k!` by forward recurrence from `k = 0`
///
/// Expects `α > 0`, `b > 0`, `w > 0` (checked by the dispatcher). The cost is
/// linear in the peak index, roughly `max(w − b, 0)`.
pub fn ln_series(alpha: f64, b: f64, w: f64) -> Result<f64> {
    let (_, peak) = super::ratio_roots(alpha, b, w);
    let budget = super::term_budget(peak, w);

    let mut term = 1.0_f64;
    let mut sum = 1.0_f64;
    let mut ln_scale = 0.0_f64;

    for k in 0..budget {
        let k = k as f64;
        let ratio = (alpha + k) * w / ((b + k) * (k + 1.0));
        term *= ratio;
        sum += term;

        if sum > RESCALE_LIMIT {
            term /= RESCALE_LIMIT;
            sum /= RESCALE_LIMIT;
            ln_scale += RESCALE_LIMIT.ln();
        }

        // Past the peak the remaining tail is bounded by a geometric series
        if k > peak && ratio < 1.0 && term <= sum * f64::EPSILON * (1.0 - ratio) {
            return Ok(ln_scale + sum.ln());
        }
    }

    Err(Error::domain(format!(
        "Kummer series (alpha={alpha}, b={b}, w={w}) did not converge in {budget} terms"
    )))
}
