//! Greedy highest-density selection over weighted cells
//!
//! Cells are consumed in decreasing order of weight until the consumed share
//! of the total reaches the target level. The region is then every cell whose
//! weight is at least that of the last cell consumed, so cells tied with it
//! are always included and the visiting order among ties cannot matter.

use offspring_core::{Error, Result};
use std::cmp::Ordering;

/// Cells chosen by [`highest_density_cells`]
#[derive(Debug, Clone, PartialEq)]
pub struct HdrSelection {
    /// Indices of the selected cells, ascending
    pub cells: Vec<usize>,
    /// Weight of the last cell consumed; every selected cell weighs at least this
    pub threshold: f64,
    /// Share of the total weight covered by the selection
    pub mass: f64,
}

/// Select the smallest set of highest-weight cells holding at least `level`
/// of the total weight
///
/// Weights must be finite and non-negative with a positive total; zero-weight
/// cells are never selected.
pub fn highest_density_cells(weights: &[f64], level: f64) -> Result<HdrSelection> {
    if !(level > 0.0 && level < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "coverage level must lie in (0, 1), got {level}"
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(Error::InvalidInput(
            "cell weights must be finite and non-negative".to_string(),
        ));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(Error::InvalidInput("cell weights sum to zero".to_string()));
    }

    let mut order: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] > 0.0).collect();
    order.sort_by(|&a, &b| weights[b].partial_cmp(&weights[a]).unwrap_or(Ordering::Equal));

    // Consumption is tracked by position in `order`, never by editing weights
    let mut consumed = 0.0;
    let mut threshold = weights[order[0]];
    for &i in &order {
        threshold = weights[i];
        consumed += weights[i] / total;
        if consumed >= level {
            break;
        }
    }

    let cells: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] >= threshold).collect();
    let mass = cells.iter().map(|&i| weights[i]).sum::<f64>() / total;
    Ok(HdrSelection {
        cells,
        threshold,
        mass,
    })
}
