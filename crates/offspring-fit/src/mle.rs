//! Maximum-likelihood solvers
//!
//! Poisson and geometric estimates are the sample mean. The other models are
//! fitted by minimising a negative log-likelihood [`CostFunction`] with the
//! bounded simplex of [`SimplexMinimizer`]; the mean is held at the sample
//! mean for the negative binomial and beta-Poisson fits. Any solver error,
//! including a nowhere-feasible objective, comes back as
//! [`Error::FitFailure`].

use crate::model::{FittedModel, ModelKind};
use crate::seeds::InitialGuess;
use argmin::core::{CostFunction, Error as SolverError};
use offspring_core::optimize::{Bounds, Minimum, SimplexMinimizer};
use offspring_core::{CountData, Error, Result};
use offspring_distributions::negative_binomial::log_likelihood_phi;
use offspring_distributions::{
    BetaPoisson, Geometric, NegativeBinomial, OffspringDistribution, Poisson, ZeroInflatedPoisson,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Negative binomial `θ`
pub const THETA_BOUNDS: Bounds = Bounds {
    lower: 1e-6,
    upper: 50.0,
};

/// Beta-Poisson `Φ`
pub const PHI_BOUNDS: Bounds = Bounds {
    lower: 1e-6,
    upper: 50.0,
};

/// Beta-Poisson `λ` when the contact rate is held fixed
pub const LAMBDA_BOUNDS: Bounds = Bounds {
    lower: 1e-6,
    upper: 10.0,
};

/// At or below this `ν` the beta-Poisson objective uses the negative
/// binomial limit with `φ = Φ`
pub const NU_FLOOR: f64 = 1e-4;

pub const ZIP_LAMBDA_UPPER: f64 = 50.0;

pub const SIGMA_UPPER: f64 = 1.0 - 1e-6;

/// A fitted model together with its log-likelihood at the estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelFit {
    pub model: FittedModel,
    pub log_likelihood: f64,
    /// Objective evaluations spent; zero for closed-form estimates
    pub evaluations: usize,
    pub converged: bool,
}

impl ModelFit {
    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn parameters(&self) -> Vec<f64> {
        self.model.parameters()
    }

    fn closed_form<D: OffspringDistribution>(model: FittedModel, dist: &D, data: &CountData) -> Result<Self> {
        Ok(Self {
            model,
            log_likelihood: dist.log_likelihood(data)?,
            evaluations: 0,
            converged: true,
        })
    }
}

/// Summary of a fit suitable for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub model: ModelKind,
    pub parameters: Vec<f64>,
    pub log_likelihood: f64,
}

impl From<&ModelFit> for FitSummary {
    fn from(fit: &ModelFit) -> Self {
        Self {
            model: fit.kind(),
            parameters: fit.parameters(),
            log_likelihood: fit.log_likelihood,
        }
    }
}

/// Beta-Poisson log-likelihood as seen by the `(Φ, ν)` solver
///
/// For `ν ≤ NU_FLOOR` the contact rate is so large that the Kummer term is
/// numerically degenerate; the negative binomial limit is used instead.
pub fn beta_poisson_log_likelihood(data: &CountData, lambda: f64, phi: f64, nu: f64) -> Result<f64> {
    if nu <= NU_FLOOR {
        log_likelihood_phi(data, lambda, phi)
    } else {
        BetaPoisson::new(lambda, phi, nu)?.log_likelihood(data)
    }
}

/// `−ℓ(θ)` for the negative binomial at a fixed mean
struct ThetaObjective<'a> {
    data: &'a CountData,
    lambda: f64,
}

impl CostFunction for ThetaObjective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> std::result::Result<f64, SolverError> {
        Ok(-NegativeBinomial::new(self.lambda, x[0])?.log_likelihood(self.data)?)
    }
}

/// `−ℓ(λ, σ)` for the zero-inflated Poisson
struct ZipObjective<'a> {
    data: &'a CountData,
}

impl CostFunction for ZipObjective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> std::result::Result<f64, SolverError> {
        Ok(-ZeroInflatedPoisson::new(x[0], x[1])?.log_likelihood(self.data)?)
    }
}

/// `−ℓ(Φ, ν)` for the beta-Poisson at a fixed mean
struct PhiNuObjective<'a> {
    data: &'a CountData,
    lambda: f64,
}

impl CostFunction for PhiNuObjective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> std::result::Result<f64, SolverError> {
        Ok(-beta_poisson_log_likelihood(self.data, self.lambda, x[0], x[1])?)
    }
}

/// `−ℓ(λ, Φ)` for the beta-Poisson at a fixed contact rate
struct LambdaPhiObjective<'a> {
    data: &'a CountData,
    contact_rate: f64,
}

impl CostFunction for LambdaPhiObjective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> std::result::Result<f64, SolverError> {
        Ok(-BetaPoisson::with_contact_rate(x[0], x[1], self.contact_rate)?.log_likelihood(self.data)?)
    }
}

/// The beta-Poisson law matching [`beta_poisson_log_likelihood`] at `(λ, Φ, ν)`
///
/// A `ν` at or below [`NU_FLOOR`] is stored as exactly zero, the negative
/// binomial limit, so derived quantities come from the same law that was
/// scored.
pub fn beta_poisson_estimate(lambda: f64, phi: f64, nu: f64) -> Result<BetaPoisson> {
    let nu = if nu <= NU_FLOOR { 0.0 } else { nu };
    BetaPoisson::new(lambda, phi, nu)
}

/// Runs the per-model solvers with a shared optimiser configuration
#[derive(Debug, Clone, Default)]
pub struct Fitter {
    optimizer: SimplexMinimizer,
}

impl Fitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_optimizer(optimizer: SimplexMinimizer) -> Self {
        Self { optimizer }
    }

    pub fn optimizer(&self) -> &SimplexMinimizer {
        &self.optimizer
    }

    /// Fit one model; every failure is reported as [`Error::FitFailure`]
    #[instrument(level = "debug", skip(self, data, guess), fields(model = %kind, n = data.len()))]
    pub fn fit(&self, kind: ModelKind, data: &CountData, guess: &InitialGuess) -> Result<ModelFit> {
        let result = if data.mean() <= 0.0 {
            Err(Error::domain("sample mean is zero"))
        } else {
            match kind {
                ModelKind::Poisson => self.poisson(data),
                ModelKind::Geometric => self.geometric(data),
                ModelKind::NegativeBinomial => self.negative_binomial(data, guess.theta),
                ModelKind::Zip => self.zip(data, guess.zip_lambda, guess.zip_sigma),
                ModelKind::BetaPoisson => self.beta_poisson(data, guess.phi, guess.nu),
            }
        };
        match result {
            Ok(fit) => {
                if !fit.converged {
                    warn!(model = %kind, evaluations = fit.evaluations, "solver stopped before converging");
                }
                debug!(model = %kind, parameters = ?fit.parameters(), llh = fit.log_likelihood, "fitted");
                Ok(fit)
            }
            Err(err @ Error::FitFailure { .. }) => Err(err),
            Err(err) => Err(Error::fit_failure(kind.key(), err.to_string())),
        }
    }

    /// Fit each model in `kinds`; one model failing does not stop the others
    pub fn fit_all(
        &self,
        kinds: &[ModelKind],
        data: &CountData,
        guess: &InitialGuess,
    ) -> Vec<(ModelKind, Result<ModelFit>)> {
        kinds
            .iter()
            .map(|&kind| (kind, self.fit(kind, data, guess)))
            .collect()
    }

    fn poisson(&self, data: &CountData) -> Result<ModelFit> {
        let dist = Poisson::new(data.mean())?;
        ModelFit::closed_form(FittedModel::Poisson(dist), &dist, data)
    }

    fn geometric(&self, data: &CountData) -> Result<ModelFit> {
        let dist = Geometric::new(data.mean())?;
        ModelFit::closed_form(FittedModel::Geometric(dist), &dist, data)
    }

    fn negative_binomial(&self, data: &CountData, theta0: f64) -> Result<ModelFit> {
        let lambda = data.mean();
        let min = self.optimizer.minimize(&ThetaObjective { data, lambda }, &[theta0], &[THETA_BOUNDS])?;
        let dist = NegativeBinomial::new(lambda, min.x[0])?;
        Ok(optimised(FittedModel::NegativeBinomial(dist), &min))
    }

    fn zip(&self, data: &CountData, lambda0: f64, sigma0: f64) -> Result<ModelFit> {
        // ZIP mean λ(1 − σ) cannot exceed λ, so λ starts at the sample mean
        let bounds = [
            Bounds::new(data.mean(), ZIP_LAMBDA_UPPER)?,
            Bounds::new(0.0, SIGMA_UPPER)?,
        ];
        let min = self.optimizer.minimize(&ZipObjective { data }, &[lambda0, sigma0], &bounds)?;
        let dist = ZeroInflatedPoisson::new(min.x[0], min.x[1])?;
        Ok(optimised(FittedModel::Zip(dist), &min))
    }

    fn beta_poisson(&self, data: &CountData, phi0: f64, nu0: f64) -> Result<ModelFit> {
        let lambda = data.mean();
        let bounds = [PHI_BOUNDS, Bounds::new(0.0, 1.0 / lambda)?];
        let min = self.optimizer.minimize(&PhiNuObjective { data, lambda }, &[phi0, nu0], &bounds)?;
        let dist = beta_poisson_estimate(lambda, min.x[0], min.x[1])?;
        Ok(optimised(FittedModel::BetaPoisson(dist), &min))
    }

    /// Beta-Poisson `(λ, Φ)` with the contact rate `N` held fixed
    #[instrument(level = "debug", skip(self, data), fields(n = data.len()))]
    pub fn lambda_phi(&self, data: &CountData, lambda0: f64, phi0: f64, contact_rate: f64) -> Result<ModelFit> {
        let fit = || -> Result<ModelFit> {
            let min = self.optimizer.minimize(
                &LambdaPhiObjective { data, contact_rate },
                &[lambda0, phi0],
                &[LAMBDA_BOUNDS, PHI_BOUNDS],
            )?;
            let dist = BetaPoisson::with_contact_rate(min.x[0], min.x[1], contact_rate)?;
            Ok(optimised(FittedModel::BetaPoisson(dist), &min))
        };
        fit().map_err(|err| Error::fit_failure(ModelKind::BetaPoisson.key(), err.to_string()))
    }
}

fn optimised(model: FittedModel, min: &Minimum) -> ModelFit {
    ModelFit {
        model,
        log_likelihood: -min.value,
        evaluations: min.evaluations,
        converged: min.converged,
    }
}

/// Poisson MLE: the sample mean
pub fn fit_poisson(data: &CountData) -> Result<f64> {
    first_parameter(Fitter::new().fit(ModelKind::Poisson, data, &InitialGuess::fixed())?)
}

/// Geometric MLE: the sample mean
pub fn fit_geometric(data: &CountData) -> Result<f64> {
    first_parameter(Fitter::new().fit(ModelKind::Geometric, data, &InitialGuess::fixed())?)
}

/// Negative binomial `θ` with `λ` at the sample mean, `θ ∈ [1e-6, 50]`
pub fn fit_theta(data: &CountData, theta0: f64) -> Result<f64> {
    let guess = InitialGuess {
        theta: theta0,
        ..InitialGuess::fixed()
    };
    let fit = Fitter::new().fit(ModelKind::NegativeBinomial, data, &guess)?;
    Ok(fit.parameters()[1])
}

/// Beta-Poisson `(Φ, ν)` with `λ` at the sample mean, `Φ ∈ [1e-6, 50]`,
/// `ν ∈ [0, 1/mean]`
pub fn fit_phi_nu(data: &CountData, phi0: f64, nu0: f64) -> Result<(f64, f64)> {
    let guess = InitialGuess {
        phi: phi0,
        nu: nu0,
        ..InitialGuess::fixed()
    };
    let fit = Fitter::new().fit(ModelKind::BetaPoisson, data, &guess)?;
    let p = fit.parameters();
    Ok((p[1], p[2]))
}

/// Zero-inflated Poisson `(λ, σ)`, `λ ∈ [mean, 50]`, `σ ∈ [0, 1 − 1e-6]`
pub fn fit_zip(data: &CountData, lambda0: f64, sigma0: f64) -> Result<(f64, f64)> {
    let guess = InitialGuess {
        zip_lambda: lambda0,
        zip_sigma: sigma0,
        ..InitialGuess::fixed()
    };
    let fit = Fitter::new().fit(ModelKind::Zip, data, &guess)?;
    let p = fit.parameters();
    Ok((p[0], p[1]))
}

/// Beta-Poisson `(λ, Φ)` at a fixed contact rate
pub fn fit_lambda_phi(data: &CountData, lambda0: f64, phi0: f64, contact_rate: f64) -> Result<(f64, f64)> {
    let fit = Fitter::new().lambda_phi(data, lambda0, phi0, contact_rate)?;
    let p = fit.parameters();
    Ok((p[0], p[1]))
}

fn first_parameter(fit: ModelFit) -> Result<f64> {
    Ok(fit.parameters()[0])
}
