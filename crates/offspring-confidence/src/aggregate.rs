//! Per-model bootstrap distributions and their intervals

use crate::bootstrap::BootstrapRun;
use crate::joint::joint_highest_density_region;
use crate::methods::BootstrapMethod;
use crate::refit::{FitOutcome, ResampleFits};
use crate::{ConfidenceInterval, JointRegion};
use offspring_core::{Error, Result};
use offspring_fit::{ModelKind, Quantity};
use offspring_histogram::Binning;
use std::collections::BTreeMap;

/// Surviving bootstrap estimates of one model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSamples {
    pub kind: ModelKind,
    /// One parameter vector per successful resample
    pub parameters: Vec<Vec<f64>>,
    pub quantities: BTreeMap<Quantity, Vec<f64>>,
    /// Resamples that produced no estimate for this model
    pub failures: usize,
}

impl ModelSamples {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            parameters: Vec::new(),
            quantities: BTreeMap::new(),
            failures: 0,
        }
    }

    pub fn successes(&self) -> usize {
        self.parameters.len()
    }

    /// Bootstrap estimates of parameter `i`
    pub fn column(&self, i: usize) -> Vec<f64> {
        self.parameters.iter().filter_map(|p| p.get(i).copied()).collect()
    }

    pub fn quantity(&self, quantity: Quantity) -> Option<&[f64]> {
        self.quantities.get(&quantity).map(Vec::as_slice)
    }

    fn push(&mut self, outcome: &FitOutcome) {
        match outcome {
            FitOutcome::Succeeded {
                parameters,
                quantities,
                ..
            } => {
                self.parameters.push(parameters.clone());
                for (&quantity, &value) in quantities {
                    self.quantities.entry(quantity).or_default().push(value);
                }
            }
            FitOutcome::Failed { .. } => self.failures += 1,
        }
    }

    /// One interval per parameter, in positional order
    pub fn parameter_intervals<M: BootstrapMethod>(
        &self,
        method: &M,
        estimate: &[f64],
        confidence_level: f64,
    ) -> Result<Vec<ConfidenceInterval>> {
        if estimate.len() != self.kind.arity() {
            return Err(Error::InvalidInput(format!(
                "{} takes {} parameters, estimate has {}",
                self.kind,
                self.kind.arity(),
                estimate.len()
            )));
        }
        estimate
            .iter()
            .enumerate()
            .map(|(i, &value)| method.calculate_interval(&self.column(i), value, confidence_level))
            .collect()
    }

    pub fn quantity_interval<M: BootstrapMethod>(
        &self,
        method: &M,
        quantity: Quantity,
        estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        let values = self
            .quantity(quantity)
            .ok_or_else(|| Error::InvalidInput(format!("no bootstrap values of {quantity} for {}", self.kind)))?;
        method.calculate_interval(values, estimate, confidence_level)
    }

    /// Joint highest-density region over all parameters
    pub fn joint_region(&self, estimate: &[f64], confidence_level: f64, binning: Binning) -> Result<JointRegion> {
        joint_highest_density_region(&self.parameters, estimate, confidence_level, binning)
    }
}

/// Split a bootstrap run into per-model estimate collections
///
/// Resamples that never produced a usable draw count as failures for every
/// model.
pub fn collect_model_samples(
    run: &BootstrapRun<ResampleFits>,
    models: &[ModelKind],
) -> BTreeMap<ModelKind, ModelSamples> {
    let mut samples: BTreeMap<ModelKind, ModelSamples> =
        models.iter().map(|&kind| (kind, ModelSamples::new(kind))).collect();
    let exhausted = run.exhausted();

    for fits in run.values() {
        for (kind, outcome) in &fits.fits {
            if let Some(entry) = samples.get_mut(kind) {
                entry.push(outcome);
            }
        }
    }
    for entry in samples.values_mut() {
        entry.failures += exhausted;
    }
    samples
}
