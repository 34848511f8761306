//! Beta-Poisson offspring distribution
//!
//! An individual makes Poisson(`N`)-many contacts, each infectious with a
//! probability drawn once from `Beta(Φλ, Φ(N − λ))`. The resulting count has
//! mean `λ`, and with `ν = 1/N`
//!
//! ```text
//! P(x) = N^x / x! · (Φλ)_x / (ΦN)_x · M(x + Φλ, x + ΦN, −N)
//! ```
//!
//! where `(a)_x` is the rising factorial and `M` Kummer's function. As
//! `ν → 0` the law tends to a negative binomial with `θ = 1/Φ`; `ν = 0` is
//! accepted and evaluated as that limit.

use crate::kummer::ln_positive_series;
use crate::special::{ln_factorial, ln_product, positive, unit_interval};
use crate::{NegativeBinomial, OffspringDistribution};
use offspring_core::{CountData, Error, Result};
use serde::Serialize;

/// Relative slack allowed on `ν ≤ 1/λ` before a point is rejected
const CONTACT_SLACK: f64 = 1e-12;

/// Beta-Poisson with mean `λ`, shape `Φ` and inverse contact rate `ν`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetaPoisson {
    lambda: f64,
    phi: f64,
    nu: f64,
}

impl BetaPoisson {
    /// `λ > 0`, `Φ > 0` and `0 ≤ ν ≤ 1/λ` (a mean cannot exceed the contact rate)
    pub fn new(lambda: f64, phi: f64, nu: f64) -> Result<Self> {
        let lambda = positive("lambda", lambda)?;
        let phi = positive("phi", phi)?;
        if !nu.is_finite() || nu < 0.0 {
            return Err(Error::domain(format!(
                "nu must be finite and non-negative, got {nu}"
            )));
        }
        if lambda * nu > 1.0 + CONTACT_SLACK {
            return Err(Error::domain(format!(
                "mean {lambda} exceeds the contact rate 1/nu = {}",
                1.0 / nu
            )));
        }
        Ok(Self { lambda, phi, nu })
    }

    /// Construct from the contact rate `N` instead of `ν`
    pub fn with_contact_rate(lambda: f64, phi: f64, n: f64) -> Result<Self> {
        let n = positive("N", n)?;
        Self::new(lambda, phi, 1.0 / n)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Contact rate `N = 1/ν`; infinite in the negative binomial limit
    pub fn contact_rate(&self) -> f64 {
        1.0 / self.nu
    }

    /// The `ν → 0` limit, `NegativeBinomial(λ, θ = 1/Φ)`
    pub fn negative_binomial_limit(&self) -> Result<NegativeBinomial> {
        NegativeBinomial::from_phi(self.lambda, self.phi)
    }

    /// Second Beta shape `Φ(N − λ)`, clamped at zero against rounding
    fn beta_shape(&self, n: f64) -> f64 {
        (self.phi * (n - self.lambda)).max(0.0)
    }
}

impl OffspringDistribution for BetaPoisson {
    fn name(&self) -> &'static str {
        "beta-Poisson"
    }

    fn ln_pmf(&self, x: u64) -> Result<f64> {
        if self.nu == 0.0 {
            return self.negative_binomial_limit()?.ln_pmf(x);
        }
        let n = self.contact_rate();
        let (phi, lambda) = (self.phi, self.lambda);

        // x ln N + ln (Φλ)_x − ln (ΦN)_x
        let prefactor = ln_product(x, |j| n * (phi * lambda + j) / (phi * n + j));
        // ln M(x + Φλ, x + ΦN, −N) = −N + ln M(Φ(N − λ), x + ΦN, N)
        let ln_m = -n + ln_positive_series(self.beta_shape(n), x as f64 + phi * n, n)?;

        let value = prefactor - ln_factorial(x) + ln_m;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::domain(format!(
                "beta-Poisson ln P({x}) is not finite at (lambda={lambda}, phi={phi}, nu={})",
                self.nu
            )))
        }
    }

    fn pgf(&self, s: f64) -> Result<f64> {
        let s = unit_interval(s)?;
        if self.nu == 0.0 {
            return self.negative_binomial_limit()?.pgf(s);
        }
        // M(λΦ, NΦ, N(s − 1)) = e^{N(s − 1)} M(Φ(N − λ), NΦ, N(1 − s))
        let n = self.contact_rate();
        let w = n * (1.0 - s);
        let ln_value = -w + ln_positive_series(self.beta_shape(n), self.phi * n, w)?;
        Ok(ln_value.exp())
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda * (1.0 + (1.0 - self.lambda * self.nu) / (self.phi + self.nu))
    }

    fn extinction_bracket_gap(&self) -> f64 {
        1e-4
    }
}

/// Beta-Poisson log-likelihood parameterised by the contact rate `N`
pub fn log_likelihood_contact_rate(data: &CountData, lambda: f64, phi: f64, n: f64) -> Result<f64> {
    BetaPoisson::with_contact_rate(lambda, phi, n)?.log_likelihood(data)
}
