//! Refitting every model on a bootstrap resample

use offspring_core::CountData;
use offspring_fit::{derive_quantities, FittedModel, Fitter, ModelKind, Quantity, SeedStrategy};
use std::collections::BTreeMap;
use tracing::warn;

/// Result of fitting one model to one resample
///
/// A failure carries its reason instead of a placeholder estimate, so it
/// can never be mistaken for a fitted value.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    Succeeded {
        parameters: Vec<f64>,
        log_likelihood: f64,
        quantities: BTreeMap<Quantity, f64>,
    },
    Failed {
        reason: String,
    },
}

impl FitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn parameters(&self) -> Option<&[f64]> {
        match self {
            Self::Succeeded { parameters, .. } => Some(parameters),
            Self::Failed { .. } => None,
        }
    }
}

/// Every model's outcome on one resample
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleFits {
    pub sample_mean: f64,
    pub fits: BTreeMap<ModelKind, FitOutcome>,
}

/// Read-only inputs shared by all resample refits
#[derive(Debug, Clone)]
pub struct RefitContext {
    pub models: Vec<ModelKind>,
    /// Full-data fits, used as starting points under [`SeedStrategy::OriginalFit`]
    pub original: Vec<FittedModel>,
    pub seed_strategy: SeedStrategy,
    /// Superspreading threshold from the observed data
    pub threshold: u64,
    pub quantities: Vec<Quantity>,
    pub fitter: Fitter,
}

impl RefitContext {
    pub fn new(models: Vec<ModelKind>, threshold: u64) -> Self {
        Self {
            models,
            original: Vec::new(),
            seed_strategy: SeedStrategy::default(),
            threshold,
            quantities: Vec::new(),
            fitter: Fitter::new(),
        }
    }

    pub fn with_original(mut self, original: Vec<FittedModel>) -> Self {
        self.original = original;
        self
    }

    pub fn with_seed_strategy(mut self, seed_strategy: SeedStrategy) -> Self {
        self.seed_strategy = seed_strategy;
        self
    }

    pub fn with_quantities(mut self, quantities: Vec<Quantity>) -> Self {
        self.quantities = quantities;
        self
    }

    pub fn with_fitter(mut self, fitter: Fitter) -> Self {
        self.fitter = fitter;
        self
    }

    /// Fit every model to `resample`; one model failing leaves the others
    /// untouched
    pub fn refit(&self, index: usize, resample: &CountData) -> ResampleFits {
        let guess = self.seed_strategy.initial_guess(resample, &self.original);
        let fits = self
            .fitter
            .fit_all(&self.models, resample, &guess)
            .into_iter()
            .map(|(kind, result)| {
                let outcome = result
                    .and_then(|fit| {
                        let quantities = derive_quantities(&fit.model, self.threshold, &self.quantities)?;
                        Ok(FitOutcome::Succeeded {
                            parameters: fit.parameters(),
                            log_likelihood: fit.log_likelihood,
                            quantities,
                        })
                    })
                    .unwrap_or_else(|err| {
                        warn!(index, model = %kind, error = %err, "resample fit failed");
                        FitOutcome::Failed {
                            reason: err.to_string(),
                        }
                    });
                (kind, outcome)
            })
            .collect();

        ResampleFits {
            sample_mean: resample.mean(),
            fits,
        }
    }
}
