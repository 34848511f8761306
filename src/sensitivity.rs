//! Beta-Poisson log-likelihood sensitivity around the fitted estimate
//!
//! Curves vary one parameter with the other two held at the estimate.
//! Slices hold one parameter at the estimate and vary the other two over a
//! full grid. Points outside the model's domain (for example `λν > 1`) are
//! reported as `None`.

use offspring_core::{CountData, Error, ExecutionEngine, Result};
use offspring_distributions::{BetaPoisson, OffspringDistribution};
use offspring_fit::beta_poisson_log_likelihood;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

/// One of the three beta-Poisson parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BetaParameter {
    Lambda,
    Phi,
    Nu,
}

impl BetaParameter {
    pub const ALL: [BetaParameter; 3] = [Self::Lambda, Self::Phi, Self::Nu];

    fn index(self) -> usize {
        match self {
            Self::Lambda => 0,
            Self::Phi => 1,
            Self::Nu => 2,
        }
    }

    /// The two parameters that vary when this one is fixed
    fn others(self) -> (BetaParameter, BetaParameter) {
        match self {
            Self::Lambda => (Self::Phi, Self::Nu),
            Self::Phi => (Self::Lambda, Self::Nu),
            Self::Nu => (Self::Lambda, Self::Phi),
        }
    }
}

impl fmt::Display for BetaParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lambda => "lambda",
            Self::Phi => "phi",
            Self::Nu => "nu",
        })
    }
}

/// Values visited along each parameter axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityAxes {
    pub lambda: Vec<f64>,
    pub phi: Vec<f64>,
    /// `ν = 0` is the negative binomial limit
    pub nu: Vec<f64>,
}

impl Default for SensitivityAxes {
    /// `λ ∈ {0.1, …, 4.9}`, `Φ ∈ {0.1, …, 9.9}`, `ν ∈ {0, 0.1, …, 0.9}`
    fn default() -> Self {
        Self {
            lambda: (1..50).map(|i| i as f64 / 10.0).collect(),
            phi: (1..100).map(|i| i as f64 / 10.0).collect(),
            nu: (0..10).map(|i| i as f64 / 10.0).collect(),
        }
    }
}

impl SensitivityAxes {
    pub fn new(lambda: Vec<f64>, phi: Vec<f64>, nu: Vec<f64>) -> Result<Self> {
        let axes = Self { lambda, phi, nu };
        for parameter in BetaParameter::ALL {
            let values = axes.axis(parameter);
            if values.is_empty() {
                return Err(Error::InvalidParameter(format!("{parameter} axis is empty")));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(Error::non_finite("sensitivity axis"));
            }
        }
        Ok(axes)
    }

    pub fn axis(&self, parameter: BetaParameter) -> &[f64] {
        match parameter {
            BetaParameter::Lambda => &self.lambda,
            BetaParameter::Phi => &self.phi,
            BetaParameter::Nu => &self.nu,
        }
    }
}

/// Log-likelihood along one axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityCurve {
    pub parameter: BetaParameter,
    pub points: Vec<(f64, Option<f64>)>,
}

impl SensitivityCurve {
    /// Axis value with the largest feasible log-likelihood
    pub fn argmax(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|&(x, llh)| llh.map(|v| (x, v)))
            .fold(None, |best, (x, v)| match best {
                Some((_, top)) if top >= v => best,
                _ => Some((x, v)),
            })
    }
}

/// Log-likelihood over a grid of two parameters, the third held fixed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivitySlice {
    pub fixed: BetaParameter,
    pub fixed_value: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Row-major: `values[i * y.len() + j]` is at `(x[i], y[j])`
    pub values: Vec<Option<f64>>,
}

impl SensitivitySlice {
    pub fn at(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i * self.y.len() + j).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    /// `(λ, Φ, ν)` the curves are centred on
    pub estimate: [f64; 3],
    pub curves: Vec<SensitivityCurve>,
    pub slices: Vec<SensitivitySlice>,
}

impl SensitivityReport {
    pub fn curve(&self, parameter: BetaParameter) -> Option<&SensitivityCurve> {
        self.curves.iter().find(|c| c.parameter == parameter)
    }

    pub fn slice(&self, fixed: BetaParameter) -> Option<&SensitivitySlice> {
        self.slices.iter().find(|s| s.fixed == fixed)
    }
}

fn log_likelihood_at(data: &CountData, point: [f64; 3]) -> Option<f64> {
    let [lambda, phi, nu] = point;
    let result = if nu == 0.0 {
        beta_poisson_log_likelihood(data, lambda, phi, 0.0)
    } else {
        BetaPoisson::new(lambda, phi, nu).and_then(|dist| dist.log_likelihood(data))
    };
    match result {
        Ok(v) if v.is_finite() => Some(v),
        Ok(_) => None,
        Err(err) => {
            debug!(lambda, phi, nu, error = %err, "infeasible sensitivity point");
            None
        }
    }
}

fn evaluate<E: ExecutionEngine>(engine: &E, data: &CountData, points: &[[f64; 3]]) -> Vec<Option<f64>> {
    engine.execute_batch(points.len(), |i| log_likelihood_at(data, points[i]))
}

fn vary(estimate: [f64; 3], parameter: BetaParameter, value: f64) -> [f64; 3] {
    let mut point = estimate;
    point[parameter.index()] = value;
    point
}

/// Curves along every axis through the fitted estimate
#[instrument(skip(data, fit, axes, engine), fields(n = data.len()))]
pub fn beta_poisson_sensitivity<E: ExecutionEngine>(
    data: &CountData,
    fit: &BetaPoisson,
    axes: &SensitivityAxes,
    engine: &E,
) -> Result<SensitivityReport> {
    let estimate = [fit.lambda(), fit.phi(), fit.nu()];
    let mut points = Vec::new();
    for parameter in BetaParameter::ALL {
        points.extend(axes.axis(parameter).iter().map(|&v| vary(estimate, parameter, v)));
    }
    let mut values = evaluate(engine, data, &points).into_iter();

    let curves = BetaParameter::ALL
        .into_iter()
        .map(|parameter| SensitivityCurve {
            parameter,
            points: axes
                .axis(parameter)
                .iter()
                .map(|&x| (x, values.next().flatten()))
                .collect(),
        })
        .collect();
    info!(points = points.len(), "sensitivity curves evaluated");

    Ok(SensitivityReport {
        estimate,
        curves,
        slices: Vec::new(),
    })
}

/// Grid over the two parameters other than `fixed`
#[instrument(skip(data, fit, axes, engine), fields(n = data.len()))]
pub fn beta_poisson_slice<E: ExecutionEngine>(
    data: &CountData,
    fit: &BetaPoisson,
    fixed: BetaParameter,
    axes: &SensitivityAxes,
    engine: &E,
) -> Result<SensitivitySlice> {
    let estimate = [fit.lambda(), fit.phi(), fit.nu()];
    let (px, py) = fixed.others();
    let (xs, ys) = (axes.axis(px), axes.axis(py));

    let points: Vec<[f64; 3]> = xs
        .iter()
        .flat_map(|&x| ys.iter().map(move |&y| vary(vary(estimate, px, x), py, y)))
        .collect();
    let values = evaluate(engine, data, &points);
    debug!(fixed = %fixed, points = points.len(), "sensitivity slice evaluated");

    Ok(SensitivitySlice {
        fixed,
        fixed_value: estimate[fixed.index()],
        x: xs.to_vec(),
        y: ys.to_vec(),
        values,
    })
}

/// Curves plus the three slices
pub fn beta_poisson_sensitivity_full<E: ExecutionEngine>(
    data: &CountData,
    fit: &BetaPoisson,
    axes: &SensitivityAxes,
    engine: &E,
) -> Result<SensitivityReport> {
    let mut report = beta_poisson_sensitivity(data, fit, axes, engine)?;
    report.slices = BetaParameter::ALL
        .into_iter()
        .map(|fixed| beta_poisson_slice(data, fit, fixed, axes, engine))
        .collect::<Result<_>>()?;
    Ok(report)
}
