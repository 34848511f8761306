//! Type-state analysis pipeline
//!
//! An analysis moves through three stages, each a distinct type:
//!
//! 1. [`Fitted`]: every configured model fitted to the full dataset
//! 2. [`Resampled`]: the bootstrap run, one refit of every model per resample
//! 3. [`Aggregated`]: intervals and derived quantities collected into an
//!    [`AnalysisReport`]
//!
//! Stage methods consume the previous stage, so an interval can never be
//! requested before its bootstrap run exists.

use crate::config::AnalysisConfig;
use crate::datasets::DatasetRegistry;
use crate::report::{AnalysisReport, DatasetSummary, ModelReport, QuantityReport, ResampleCounts};
use crate::sensitivity::{beta_poisson_sensitivity, SensitivityAxes, SensitivityReport};
use offspring_confidence::{
    collect_model_samples, likelihood_grid_2d, profile_grid_1d, AnyMethod, Bootstrap, BootstrapMethod,
    BootstrapRun, ConfidenceInterval, JointRegion, ModelSamples, RefitContext, ResampleFits,
};
use offspring_core::{AnyEngine, CountData, Error, ExecutionEngine, Result};
use offspring_distributions::{Geometric, OffspringDistribution, Poisson, ZeroInflatedPoisson};
use offspring_fit::mle::SIGMA_UPPER;
use offspring_fit::{
    derive_quantities, superspreading_threshold, FittedModel, Fitter, InitialGuess, ModelFit, ModelKind,
};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Type-state markers for the analysis pipeline
pub mod state {
    use super::{AnalysisReport, BTreeMap, BootstrapRun, ModelFit, ModelKind, ResampleFits};

    /// Full-data fits are available
    #[derive(Debug, Clone)]
    pub struct Fitted {
        pub(crate) fits: BTreeMap<ModelKind, ModelFit>,
        pub(crate) failed: BTreeMap<ModelKind, String>,
    }

    /// The bootstrap run has completed
    #[derive(Debug, Clone)]
    pub struct Resampled {
        pub(crate) fitted: Fitted,
        pub(crate) run: BootstrapRun<ResampleFits>,
    }

    /// The report is assembled
    #[derive(Debug, Clone)]
    pub struct Aggregated {
        pub(crate) report: AnalysisReport,
    }
}

pub use state::{Aggregated, Fitted, Resampled};

/// Pipeline state trait
pub trait AnalysisState {}

impl AnalysisState for Fitted {}
impl AnalysisState for Resampled {}
impl AnalysisState for Aggregated {}

/// One dataset moving through the analysis stages
#[derive(Debug, Clone)]
pub struct Analysis<S: AnalysisState> {
    config: AnalysisConfig,
    data: CountData,
    threshold: u64,
    state: S,
}

impl<S: AnalysisState> Analysis<S> {
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn data(&self) -> &CountData {
        &self.data
    }

    /// Superspreading threshold of the observed data
    pub fn threshold(&self) -> u64 {
        self.threshold
    }
}

impl Analysis<Fitted> {
    /// Validate `config` and fit every configured model to `data`
    ///
    /// A model whose full-data fit fails is recorded and left out of the
    /// later stages; the others continue.
    #[instrument(skip(config, data), fields(dataset = %config.dataset, n = data.len()))]
    pub fn fit(config: AnalysisConfig, data: CountData) -> Result<Self> {
        config.validate()?;
        if data.mean() <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "dataset '{}' has no secondary cases",
                config.dataset
            )));
        }
        let threshold = superspreading_threshold(&data)?;
        let guess = InitialGuess::from_moments(&data);

        let mut fits = BTreeMap::new();
        let mut failed = BTreeMap::new();
        for (kind, result) in Fitter::new().fit_all(&config.models, &data, &guess) {
            match result {
                Ok(fit) => {
                    fits.insert(kind, fit);
                }
                Err(err) => {
                    warn!(model = %kind, error = %err, "full-data fit failed");
                    failed.insert(kind, err.to_string());
                }
            }
        }
        info!(fitted = fits.len(), failed = failed.len(), threshold, "models fitted");

        Ok(Self {
            config,
            data,
            threshold,
            state: Fitted { fits, failed },
        })
    }

    /// Load the configured dataset from `registry` and fit it
    pub fn from_registry(config: AnalysisConfig, registry: &DatasetRegistry) -> Result<Self> {
        config.validate()?;
        let data = registry.get(&config.dataset)?;
        Self::fit(config, data)
    }

    pub fn fits(&self) -> &BTreeMap<ModelKind, ModelFit> {
        &self.state.fits
    }

    pub fn fit_of(&self, kind: ModelKind) -> Option<&ModelFit> {
        self.state.fits.get(&kind)
    }

    /// Models whose full-data fit failed, with the reason
    pub fn failed(&self) -> &BTreeMap<ModelKind, String> {
        &self.state.failed
    }

    fn refit_context(&self) -> RefitContext {
        let models: Vec<ModelKind> = self.state.fits.keys().copied().collect();
        let original: Vec<FittedModel> = self.state.fits.values().map(|fit| fit.model).collect();
        RefitContext::new(models, self.threshold)
            .with_original(original)
            .with_seed_strategy(self.config.seed_strategy)
            .with_quantities(self.config.stages.quantities())
    }

    /// Bootstrap every successfully fitted model on `engine`
    #[instrument(skip(self, engine), fields(dataset = %self.config.dataset, resamples = self.config.resamples))]
    pub fn resample<E: ExecutionEngine>(self, engine: E) -> Result<Analysis<Resampled>> {
        let context = self.refit_context();
        let mut bootstrap = Bootstrap::new(engine)
            .with_resamples(self.config.resamples)
            .with_max_redraws(self.config.max_redraws);
        if let Some(seed) = self.config.seed {
            bootstrap = bootstrap.with_seed(seed);
        }
        let run = bootstrap.run(&self.data, |index, resample| context.refit(index, resample))?;
        info!(
            completed = run.completed(),
            exhausted = run.exhausted(),
            seed = run.seed,
            "bootstrap finished"
        );

        Ok(Analysis {
            config: self.config,
            data: self.data,
            threshold: self.threshold,
            state: Resampled {
                fitted: self.state,
                run,
            },
        })
    }

    /// Bootstrap on an engine sized from the configured worker count
    pub fn resample_default(self) -> Result<Analysis<Resampled>> {
        let engine = AnyEngine::with_workers(self.config.workers)?;
        self.resample(engine)
    }

    /// Beta-Poisson likelihood curves through the full-data estimate
    pub fn sensitivity<E: ExecutionEngine>(&self, axes: &SensitivityAxes, engine: &E) -> Result<SensitivityReport> {
        match self.fit_of(ModelKind::BetaPoisson).map(|fit| fit.model) {
            Some(FittedModel::BetaPoisson(dist)) => beta_poisson_sensitivity(&self.data, &dist, axes, engine),
            _ => Err(Error::InvalidInput("beta-Poisson has no full-data fit".to_string())),
        }
    }
}

impl Analysis<Resampled> {
    pub fn run(&self) -> &BootstrapRun<ResampleFits> {
        &self.state.run
    }

    pub fn fits(&self) -> &BTreeMap<ModelKind, ModelFit> {
        &self.state.fitted.fits
    }

    /// Build intervals and derived quantities for every fitted model
    #[instrument(skip(self), fields(dataset = %self.config.dataset))]
    pub fn aggregate(self) -> Result<Analysis<Aggregated>> {
        let level = self.config.level()?.value();
        let method = self.config.interval_method.with_binning(self.config.binning);
        let fitted = &self.state.fitted;
        let kinds: Vec<ModelKind> = fitted.fits.keys().copied().collect();
        let samples = collect_model_samples(&self.state.run, &kinds);

        let mut models = BTreeMap::new();
        for (kind, fit) in &fitted.fits {
            let model_samples = samples.get(kind).cloned().unwrap_or_else(|| ModelSamples::new(*kind));
            let report = self.model_report(fit, &model_samples, &method, level);
            models.insert(kind.key().to_string(), report);
        }

        let run = &self.state.run;
        let report = AnalysisReport {
            dataset: DatasetSummary::new(self.config.dataset.clone(), &self.data, self.threshold),
            confidence_level: level,
            interval_method: self.config.interval_method,
            seed_strategy: self.config.seed_strategy,
            resamples: ResampleCounts {
                requested: run.requested(),
                completed: run.completed(),
                exhausted: run.exhausted(),
                seed: run.seed,
            },
            models,
            failed_models: fitted
                .failed
                .iter()
                .map(|(kind, reason)| (kind.key().to_string(), reason.clone()))
                .collect(),
        };
        info!(models = report.models.len(), "report assembled");

        Ok(Analysis {
            config: self.config,
            data: self.data,
            threshold: self.threshold,
            state: Aggregated { report },
        })
    }

    fn model_report(&self, fit: &ModelFit, samples: &ModelSamples, method: &AnyMethod, level: f64) -> ModelReport {
        let kind = fit.kind();
        let parameters = fit.parameters();
        let has_samples = samples.successes() > 0;
        if !has_samples {
            warn!(model = %kind, "no resample produced a fit, intervals omitted");
        }

        let intervals = parameters
            .iter()
            .enumerate()
            .map(|(i, &estimate)| {
                has_samples
                    .then(|| interval_or_warn(kind, kind.parameter_names()[i], || {
                        method.calculate_interval(&samples.column(i), estimate, level)
                    }))
                    .flatten()
            })
            .collect();

        let quantities = self
            .config
            .stages
            .quantities()
            .into_iter()
            .map(|quantity| {
                let value = derive_quantities(&fit.model, self.threshold, &[quantity])
                    .map_err(|err| warn!(model = %kind, %quantity, error = %err, "quantity undefined at the estimate"))
                    .ok()
                    .and_then(|values| values.get(&quantity).copied());
                let interval = value
                    .filter(|_| has_samples)
                    .and_then(|v| {
                        interval_or_warn(kind, quantity.key(), || samples.quantity_interval(method, quantity, v, level))
                    });
                (quantity.key().to_string(), QuantityReport { value, interval })
            })
            .collect();

        let joint_region = (kind == ModelKind::BetaPoisson && self.config.stages.joint_region && has_samples)
            .then(|| {
                samples
                    .joint_region(&parameters, level, self.config.joint_binning)
                    .map_err(|err| warn!(model = %kind, error = %err, "joint region failed"))
                    .ok()
            })
            .flatten();

        let likelihood_region = self
            .config
            .stages
            .likelihood_grid
            .then(|| likelihood_region(kind, &self.data, self.config.grid_points, level))
            .flatten();

        ModelReport {
            parameter_names: kind.parameter_names().iter().map(|s| s.to_string()).collect(),
            parameters,
            intervals,
            log_likelihood: fit.log_likelihood,
            converged: fit.converged,
            successful_resamples: samples.successes(),
            failed_resamples: samples.failures,
            quantities,
            joint_region,
            likelihood_region,
        }
    }
}

impl Analysis<Aggregated> {
    pub fn report(&self) -> &AnalysisReport {
        &self.state.report
    }

    pub fn into_report(self) -> AnalysisReport {
        self.state.report
    }
}

fn interval_or_warn<F>(kind: ModelKind, what: &str, interval: F) -> Option<ConfidenceInterval>
where
    F: FnOnce() -> Result<ConfidenceInterval>,
{
    interval()
        .map_err(|err| warn!(model = %kind, what, error = %err, "interval failed"))
        .ok()
}

/// `mean ± 6` standard errors under the geometric variance, kept positive
fn lambda_range(data: &CountData) -> (f64, f64) {
    let mean = data.mean();
    let half_width = 6.0 * (mean * (1.0 + mean) / data.len() as f64).sqrt();
    ((mean - half_width).max(1e-6), mean + half_width)
}

/// Likelihood-grid region for the models that have one
fn likelihood_region(kind: ModelKind, data: &CountData, points: usize, level: f64) -> Option<JointRegion> {
    let range = lambda_range(data);
    let region = match kind {
        ModelKind::Poisson => {
            profile_grid_1d(|l| Poisson::new(l)?.log_likelihood(data), range, points, level).map(one_dimensional)
        }
        ModelKind::Geometric => {
            profile_grid_1d(|l| Geometric::new(l)?.log_likelihood(data), range, points, level).map(one_dimensional)
        }
        ModelKind::Zip => likelihood_grid_2d(
            |l, s| ZeroInflatedPoisson::new(l, s)?.log_likelihood(data),
            (range.0, range.1 + data.mean()),
            (0.0, SIGMA_UPPER),
            points,
            level,
        ),
        ModelKind::NegativeBinomial | ModelKind::BetaPoisson => return None,
    };
    region
        .map_err(|err| warn!(model = %kind, error = %err, "likelihood grid failed"))
        .ok()
}

fn one_dimensional(ci: ConfidenceInterval) -> JointRegion {
    JointRegion {
        bounds: vec![(ci.lower, ci.upper)],
        estimate: vec![ci.estimate],
        confidence_level: ci.confidence_level,
    }
}

/// Fit, bootstrap and aggregate the configured dataset
pub fn run_analysis(config: &AnalysisConfig, registry: &DatasetRegistry) -> Result<AnalysisReport> {
    let report = Analysis::from_registry(config.clone(), registry)?
        .resample_default()?
        .aggregate()?
        .into_report();
    Ok(report)
}
