//! Kummer's confluent hypergeometric function `M(a, b, z) = ₁F₁(a; b; z)`
//!
//! The beta-Poisson likelihood needs `M(x + Φλ, x + ΦN, −N)`, i.e. a negative
//! argument whose magnitude is the contact rate `N`. Summing the defining
//! series directly at `z < 0` alternates in sign and cancels catastrophically,
//! so the evaluator first applies Kummer's transformation
//!
//! ```text
//! M(a, b, z) = e^z · M(b − a, b, −z)
//! ```
//!
//! which leaves a series of positive terms `Σ (α)_k / (b)_k · w^k / k!` with
//! `α = b − a ≥ 0` and `w = −z ≥ 0`. That series is summed by one of two
//! paths, selected by `b`:
//!
//! - `b < PRECISE_THRESHOLD`: [`fast`], a double-precision forward recurrence
//!   with periodic rescaling.
//! - `b ≥ PRECISE_THRESHOLD`: [`precise`], a peak-centred summation carried out
//!   in 170-bit binary floating point and rounded back to `f64`.
//!
//! Both paths return `ln M`, so large contact rates never overflow.

pub mod fast;
pub mod precise;

use offspring_core::{Error, Result};

/// Values of `b` at or above this use the extended-precision path
pub const PRECISE_THRESHOLD: f64 = 50.0;

/// Which summation path evaluates the series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KummerPath {
    /// Double precision forward recurrence
    Fast,
    /// Extended precision peak-centred summation
    Precise,
}

impl KummerPath {
    /// The path the evaluator dispatches to for a given `b`
    pub fn for_b(b: f64) -> Self {
        if b < PRECISE_THRESHOLD {
            Self::Fast
        } else {
            Self::Precise
        }
    }
}

/// `M(a, b, z)`
pub fn kummer_m(a: f64, b: f64, z: f64) -> Result<f64> {
    let value = ln_kummer_m(a, b, z)?.exp();
    if !value.is_finite() {
        return Err(Error::domain(format!(
            "M({a}, {b}, {z}) overflows double precision"
        )));
    }
    Ok(value)
}

/// `ln M(a, b, z)`, dispatching on `b`
pub fn ln_kummer_m(a: f64, b: f64, z: f64) -> Result<f64> {
    ln_kummer_m_with(KummerPath::for_b(b), a, b, z)
}

/// `ln M(a, b, z)` through an explicitly chosen path
pub fn ln_kummer_m_with(path: KummerPath, a: f64, b: f64, z: f64) -> Result<f64> {
    if !a.is_finite() || !b.is_finite() || !z.is_finite() {
        return Err(Error::domain(format!("M({a}, {b}, {z}) has non-finite arguments")));
    }
    if b <= 0.0 {
        return Err(Error::domain(format!("M(a, b, z) requires b > 0, got {b}")));
    }
    let (alpha, w, offset) = if z < 0.0 { (b - a, -z, z) } else { (a, z, 0.0) };
    Ok(offset + ln_positive_series_with(path, alpha, b, w)?)
}

/// Element-wise `M(a_i, b_i, z_i)`, each element dispatched on its own `b`
pub fn kummer_m_each(arguments: &[(f64, f64, f64)]) -> Result<Vec<f64>> {
    arguments
        .iter()
        .map(|&(a, b, z)| kummer_m(a, b, z))
        .collect()
}

/// `ln Σ_k (α)_k / (b)_k · w^k / k!` for `α ≥ 0`, `b > 0`, `w ≥ 0`
///
/// Callers that already know `α = b − a` exactly (the beta-Poisson kernel)
/// use this directly to avoid forming `b − a` in floating point.
pub(crate) fn ln_positive_series(alpha: f64, b: f64, w: f64) -> Result<f64> {
    ln_positive_series_with(KummerPath::for_b(b), alpha, b, w)
}

fn ln_positive_series_with(path: KummerPath, alpha: f64, b: f64, w: f64) -> Result<f64> {
    if alpha < 0.0 {
        return Err(Error::domain(format!(
            "series with negative numerator parameter {alpha} is not supported"
        )));
    }
    if b <= 0.0 || w < 0.0 || !alpha.is_finite() || !w.is_finite() {
        return Err(Error::domain(format!(
            "invalid series arguments alpha={alpha}, b={b}, w={w}"
        )));
    }
    if alpha == 0.0 || w == 0.0 {
        return Ok(0.0);
    }
    match path {
        KummerPath::Fast => fast::ln_series(alpha, b, w),
        KummerPath::Precise => precise::ln_series(alpha, b, w),
    }
}

/// Roots of `r_k = 1`, where `r_k = (α + k) w / ((b + k)(k + 1))` is the
/// ratio of consecutive terms. Terms grow between the roots and shrink
/// outside them; both roots are clamped to `k ≥ 0`.
pub(crate) fn ratio_roots(alpha: f64, b: f64, w: f64) -> (f64, f64) {
    // k² + (b + 1 − w) k + (b − α w) = 0
    let p = b + 1.0 - w;
    let q = b - alpha * w;
    let discriminant = p * p - 4.0 * q;
    if discriminant < 0.0 {
        return (0.0, 0.0);
    }
    let root = discriminant.sqrt();
    let upper = ((-p + root) / 2.0).max(0.0);
    let lower = ((-p - root) / 2.0).max(0.0);
    (lower, upper)
}

/// Iteration cap for either path; generous multiple of the term spread
pub(crate) fn term_budget(peak: f64, w: f64) -> usize {
    (peak + 60.0 * (peak + w + 1.0).sqrt() + 1_000.0) as usize
}
