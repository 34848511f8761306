//! Histogram building strategies

use crate::traits::HistogramBuilder;
use crate::types::{GridAxis, GridHistogram, Histogram, HistogramBin};
use offspring_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an axis is divided into bins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binning {
    /// A fixed number of equal-width bins over the observed range
    Count(usize),
    /// Equal bins no wider than this, covering the observed range
    Width(f64),
}

impl Default for Binning {
    fn default() -> Self {
        Binning::Count(50)
    }
}

impl Binning {
    /// Number of bins this rule gives an axis spanning `[min, max]`
    pub fn bins_for(&self, min: f64, max: f64) -> Result<usize> {
        match *self {
            Binning::Count(0) => Err(Error::InvalidParameter("bin count must be positive".to_string())),
            Binning::Count(n) => Ok(n),
            Binning::Width(w) if !(w.is_finite() && w > 0.0) => Err(Error::InvalidParameter(format!(
                "bin width must be positive and finite, got {w}"
            ))),
            Binning::Width(w) => Ok((((max - min) / w).ceil() as usize).max(1)),
        }
    }
}

/// Fixed-width histogram builder
///
/// Creates a histogram with equal-width bins over the sample range.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthBuilder {
    binning: Binning,
}

impl FixedWidthBuilder {
    /// Create a new fixed-width histogram builder
    pub fn new(num_bins: usize) -> Self {
        Self {
            binning: Binning::Count(num_bins.max(1)),
        }
    }

    pub fn with_binning(binning: Binning) -> Self {
        Self { binning }
    }
}

impl HistogramBuilder for FixedWidthBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        let mut sorted = sample.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        self.build_sorted(&sorted)
    }

    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        if sorted_sample.is_empty() {
            return Ok(Histogram::new(vec![], 0, 0.0, 0.0));
        }
        if sorted_sample.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("histogram sample"));
        }

        // O(1) min/max from sorted data
        let min = sorted_sample[0];
        let max = sorted_sample[sorted_sample.len() - 1];
        let total = sorted_sample.len();

        if max == min {
            // All values are the same
            let bin = HistogramBin::new(min, max, total, total);
            return Ok(Histogram::new(vec![bin], total, min, max));
        }

        let axis = GridAxis::new(min, max, self.binning.bins_for(min, max)?)?;
        let mut bins: Vec<HistogramBin> = (0..axis.bins)
            .map(|i| {
                let (left, right) = axis.edges(i);
                HistogramBin::new(left, right, 0, total)
            })
            .collect();

        // Single pass through sorted data
        let mut current_bin = 0;
        for &value in sorted_sample {
            while current_bin < axis.bins - 1 && value >= bins[current_bin].right {
                current_bin += 1;
            }
            bins[current_bin].count += 1;
        }

        for bin in &mut bins {
            bin.density = bin.count as f64 / (total as f64 * bin.width());
        }

        Ok(Histogram::new(bins, total, min, max))
    }

    fn target_bins(&self) -> Option<usize> {
        match self.binning {
            Binning::Count(n) => Some(n),
            Binning::Width(_) => None,
        }
    }
}

/// Builds sparse `d`-dimensional histograms with equal-width bins per axis
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    binning: Vec<Binning>,
}

impl GridBuilder {
    /// The same rule on every axis
    pub fn uniform(binning: Binning) -> Self {
        Self {
            binning: vec![binning],
        }
    }

    /// One rule per axis; must match the point dimension at build time
    pub fn per_axis(binning: Vec<Binning>) -> Self {
        Self { binning }
    }

    fn rule(&self, axis: usize) -> Binning {
        match self.binning.as_slice() {
            [] => Binning::default(),
            [only] => *only,
            rules => rules[axis],
        }
    }

    /// Histogram of `points`, each a coordinate vector of the same length
    pub fn build(&self, points: &[Vec<f64>]) -> Result<GridHistogram> {
        let first = points.first().ok_or_else(|| Error::empty_input("grid histogram"))?;
        let dimension = first.len();
        if dimension == 0 {
            return Err(Error::InvalidInput("points have no coordinates".to_string()));
        }
        if self.binning.len() > 1 && self.binning.len() != dimension {
            return Err(Error::InvalidParameter(format!(
                "{} binning rules for {dimension}-d points",
                self.binning.len()
            )));
        }
        if points.iter().any(|p| p.len() != dimension) {
            return Err(Error::InvalidInput("points differ in dimension".to_string()));
        }
        if points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("grid histogram sample"));
        }

        let axes = (0..dimension)
            .map(|axis| {
                let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p[axis]), hi.max(p[axis]))
                });
                GridAxis::new(min, max, self.rule(axis).bins_for(min, max)?)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut cells: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
        for point in points {
            let key: Vec<usize> = axes.iter().zip(point).map(|(axis, &v)| axis.index(v)).collect();
            *cells.entry(key).or_insert(0) += 1;
        }

        Ok(GridHistogram::new(axes, cells, points.len()))
    }
}
