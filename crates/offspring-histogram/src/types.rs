//! Core types for histogram representation

use crate::hdr::{highest_density_cells, HdrSelection};
use offspring_core::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single bin in a histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Left edge of the bin (inclusive)
    pub left: f64,
    /// Right edge of the bin (exclusive, except for the last bin)
    pub right: f64,
    /// Number of values in this bin
    pub count: usize,
    /// Density (count / (total_count * bin_width))
    pub density: f64,
}

impl HistogramBin {
    /// Create a new histogram bin
    pub fn new(left: f64, right: f64, count: usize, total_count: usize) -> Self {
        let width = right - left;
        let density = if width > 0.0 && total_count > 0 {
            count as f64 / (total_count as f64 * width)
        } else {
            0.0
        };

        Self {
            left,
            right,
            count,
            density,
        }
    }

    /// Get the center point of the bin
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Get the width of the bin
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Check if a value falls within this bin
    pub fn contains(&self, value: f64) -> bool {
        value >= self.left && value < self.right
    }

    /// Get the relative frequency (count / total_count)
    pub fn frequency(&self, total_count: usize) -> f64 {
        if total_count > 0 {
            self.count as f64 / total_count as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for HistogramBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}): count={}, density={:.3}",
            self.left, self.right, self.count, self.density
        )
    }
}

/// A one-dimensional histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
    total_count: usize,
    min: f64,
    max: f64,
}

impl Histogram {
    /// Create a new histogram
    pub fn new(bins: Vec<HistogramBin>, total_count: usize, min: f64, max: f64) -> Self {
        Self {
            bins,
            total_count,
            min,
            max,
        }
    }

    /// Get the bins
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Get the number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Get the total count of data points
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Find which bin contains a given value
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        // The last bin includes its right edge
        if let Some(last) = self.bins.last() {
            if value == last.right {
                return Some(self.bins.len() - 1);
            }
        }
        self.bins.iter().position(|bin| bin.contains(value))
    }

    /// Get counts as a vector
    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    /// Get frequencies as a vector
    pub fn frequencies(&self) -> Vec<f64> {
        self.bins
            .iter()
            .map(|bin| bin.frequency(self.total_count))
            .collect()
    }

    /// Smallest union of highest-count bins holding at least `level` of the
    /// sample, reported as `[lowest left edge, highest right edge]`
    pub fn highest_density_interval(&self, level: f64) -> Result<(f64, f64)> {
        let counts: Vec<f64> = self.bins.iter().map(|bin| bin.count as f64).collect();
        if counts.iter().all(|&c| c == 0.0) {
            return Err(Error::empty_input("highest-density interval"));
        }
        let HdrSelection { cells, .. } = highest_density_cells(&counts, level)?;
        Ok(cells.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
            (lo.min(self.bins[i].left), hi.max(self.bins[i].right))
        }))
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram({} bins, n={}, range=[{:.3}, {:.3}])",
            self.len(),
            self.total_count,
            self.min,
            self.max
        )
    }
}

/// Equal-width binning of one coordinate axis
///
/// An axis whose observed range is zero has a single bin of zero width at
/// that value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridAxis {
    pub min: f64,
    pub max: f64,
    pub bins: usize,
}

impl GridAxis {
    pub fn new(min: f64, max: f64, bins: usize) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::InvalidParameter(format!("invalid axis range [{min}, {max}]")));
        }
        let bins = if max > min { bins.max(1) } else { 1 };
        Ok(Self { min, max, bins })
    }

    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    /// Bin holding `value`; the top edge belongs to the last bin
    pub fn index(&self, value: f64) -> usize {
        let width = self.width();
        if width <= 0.0 {
            return 0;
        }
        (((value - self.min) / width).floor().max(0.0) as usize).min(self.bins - 1)
    }

    /// `(left, right)` edges of bin `i`
    pub fn edges(&self, i: usize) -> (f64, f64) {
        let width = self.width();
        let left = self.min + i as f64 * width;
        let right = if i + 1 == self.bins {
            self.max
        } else {
            self.min + (i + 1) as f64 * width
        };
        (left, right)
    }
}

/// A sparse histogram over points in `d` dimensions
///
/// Only occupied cells are stored, keyed by their per-axis bin indices.
#[derive(Debug, Clone, PartialEq)]
pub struct GridHistogram {
    axes: Vec<GridAxis>,
    cells: BTreeMap<Vec<usize>, usize>,
    total_count: usize,
}

impl GridHistogram {
    pub(crate) fn new(axes: Vec<GridAxis>, cells: BTreeMap<Vec<usize>, usize>, total_count: usize) -> Self {
        Self {
            axes,
            cells,
            total_count,
        }
    }

    pub fn axes(&self) -> &[GridAxis] {
        &self.axes
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }

    /// Count in the cell with the given per-axis indices
    pub fn count(&self, index: &[usize]) -> usize {
        self.cells.get(index).copied().unwrap_or(0)
    }

    /// Occupied cells with their counts, in index order
    pub fn cells(&self) -> impl Iterator<Item = (&[usize], usize)> {
        self.cells.iter().map(|(k, &v)| (k.as_slice(), v))
    }

    /// Per-axis `[min, max]` edges of the highest-density region
    ///
    /// The region is selected jointly over all cells; reporting its
    /// bounding box per axis is an outer approximation of the region.
    pub fn highest_density_region(&self, level: f64) -> Result<Vec<(f64, f64)>> {
        if self.cells.is_empty() {
            return Err(Error::empty_input("highest-density region"));
        }
        let keys: Vec<&Vec<usize>> = self.cells.keys().collect();
        let counts: Vec<f64> = self.cells.values().map(|&c| c as f64).collect();
        let selection = highest_density_cells(&counts, level)?;

        let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); self.axes.len()];
        for &cell in &selection.cells {
            for (axis, (&bin, bound)) in self.axes.iter().zip(keys[cell].iter().zip(bounds.iter_mut())) {
                let (left, right) = axis.edges(bin);
                bound.0 = bound.0.min(left);
                bound.1 = bound.1.max(right);
            }
        }
        Ok(bounds)
    }
}

impl fmt::Display for GridHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GridHistogram({}-d, {} occupied cells, n={})",
            self.dimension(),
            self.occupied(),
            self.total_count
        )
    }
}
