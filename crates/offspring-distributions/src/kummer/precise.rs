//! Extended-precision summation of the positive Kummer series
//!
//! The series is normalised by its largest term, whose logarithm is taken in
//! closed form from log-gamma values. The normalised terms are then summed
//! outwards from the peak in both directions in 170-bit arithmetic, so the
//! cost grows with the width of the term distribution rather than with the
//! position of its peak.

use dashu_float::{round::mode::HalfEven, FBig};
use offspring_core::{Error, Result};
use statrs::function::gamma::ln_gamma;

type Big = FBig<HalfEven, 2>;

/// Working precision in bits (about 51 significant decimal digits)
pub const WORKING_BITS: usize = 170;

/// A sweep stops once its terms fall below this fraction of the running sum
const TRUNCATION: f64 = 1e-34;

fn big(value: f64) -> Result<Big> {
    Big::try_from(value)
        .map(|v| v.with_precision(WORKING_BITS).value())
        .map_err(|_| Error::domain(format!("{value} has no extended-precision representation")))
}

fn relative(term: &Big, sum: &Big) -> f64 {
    (term / sum).to_f64().value()
}

/// `ln Σ_k (α)_k / (b)_k · w^k / k!`, summed around the largest term
///
/// Expects `α > 0`, `b > 0`, `w > 0` (checked by the dispatcher).
pub fn ln_series(alpha: f64, b: f64, w: f64) -> Result<f64> {
    let (lower, upper) = super::ratio_roots(alpha, b, w);
    let peak = upper.floor();
    let budget = super::term_budget(peak, w);

    // ln t_peak = ln[(α)_p / (b)_p · w^p / p!]
    let ln_peak = if peak == 0.0 {
        0.0
    } else {
        ln_gamma(alpha + peak) - ln_gamma(alpha) + ln_gamma(b) - ln_gamma(b + peak)
            + peak * w.ln()
            - ln_gamma(peak + 1.0)
    };

    let alpha_big = big(alpha)?;
    let b_big = big(b)?;
    let w_big = big(w)?;
    let one = big(1.0)?;
    let mut sum = one.clone();

    // Upward: t_{k+1} = t_k (α + k) w / ((b + k)(k + 1))
    let mut term = one.clone();
    let mut k = peak;
    let mut k_big = big(peak)?;
    let mut steps = 0_usize;
    loop {
        let numerator = &(&alpha_big + &k_big) * &w_big;
        let denominator = &(&b_big + &k_big) * &(&k_big + &one);
        term = &(&term * &numerator) / &denominator;
        sum = &sum + &term;
        k += 1.0;
        k_big = &k_big + &one;
        steps += 1;
        if k > upper && relative(&term, &sum) < TRUNCATION {
            break;
        }
        if steps > budget {
            return Err(Error::domain(format!(
                "Kummer series (alpha={alpha}, b={b}, w={w}) did not converge in {budget} terms"
            )));
        }
    }

    // Downward: t_k = t_{k+1} (b + k)(k + 1) / ((α + k) w). Below the lower
    // ratio root the terms grow again towards k = 0, so that sweep never
    // stops early.
    let sweep_to_zero = lower > 0.0;
    let mut term = one.clone();
    let mut k = peak;
    let mut k_big = big(peak)?;
    while k >= 1.0 {
        k -= 1.0;
        k_big = &k_big - &one;
        let numerator = &(&b_big + &k_big) * &(&k_big + &one);
        let denominator = &(&alpha_big + &k_big) * &w_big;
        term = &(&term * &numerator) / &denominator;
        sum = &sum + &term;
        if !sweep_to_zero && relative(&term, &sum) < TRUNCATION {
            break;
        }
    }

    let total = sum.to_f64().value();
    if !total.is_finite() || total <= 0.0 {
        return Err(Error::domain(format!(
            "Kummer series (alpha={alpha}, b={b}, w={w}) lost its normalisation"
        )));
    }
    Ok(ln_peak + total.ln())
}
