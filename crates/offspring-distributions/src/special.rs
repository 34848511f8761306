//! Small numerical helpers shared by the kernels

use offspring_core::{Error, Result};
pub(crate) use statrs::function::factorial::ln_factorial;

/// `Σ_{j<k} ln(f(j))`, the building block of every rising-factorial ratio
///
/// Computing `ln Γ(a + k) − ln Γ(a)` as an explicit sum keeps full precision
/// for the small integer counts seen in offspring data, where the log-gamma
/// difference of two large, nearly equal values would not.
pub(crate) fn ln_product<F>(k: u64, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    (0..k).map(|j| f(j as f64).ln()).sum()
}

/// Require a finite, strictly positive parameter
pub(crate) fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::domain(format!("{name} must be positive and finite, got {value}")))
    }
}

/// Require a PGF argument in `[0, 1]`
pub(crate) fn unit_interval(s: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&s) {
        Ok(s)
    } else {
        Err(Error::domain(format!("PGF argument must lie in [0, 1], got {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::function::gamma::ln_gamma;

    #[test]
    fn test_ln_product_matches_log_gamma() {
        let a = 2.75;
        let direct = ln_product(6, |j| a + j);
        assert_relative_eq!(direct, ln_gamma(a + 6.0) - ln_gamma(a), max_relative = 1e-13);
        assert_eq!(ln_product(0, |j| a + j), 0.0);
    }

    #[test]
    fn test_validators() {
        assert!(positive("lambda", 0.0).unwrap_err().is_domain());
        assert!(positive("lambda", f64::INFINITY).is_err());
        assert_eq!(positive("lambda", 2.0).unwrap(), 2.0);
        assert!(unit_interval(1.0 + 1e-12).is_err());
        assert!(unit_interval(0.0).is_ok());
    }
}
