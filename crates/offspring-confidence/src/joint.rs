//! Joint highest-density regions over several parameters

use crate::JointRegion;
use offspring_core::{Error, Result};
use offspring_histogram::{Binning, GridBuilder};
use tracing::debug;

/// Highest-density region of bootstrap parameter vectors
///
/// The vectors are binned on a `d`-dimensional grid and the heaviest cells
/// are accumulated until they hold `confidence_level` of the resamples. The
/// region is reported per axis as the bounding box of those cells.
pub fn joint_highest_density_region(
    samples: &[Vec<f64>],
    estimate: &[f64],
    confidence_level: f64,
    binning: Binning,
) -> Result<JointRegion> {
    if let Some(first) = samples.first() {
        if first.len() != estimate.len() {
            return Err(Error::InvalidInput(format!(
                "{}-d estimate for {}-d bootstrap samples",
                estimate.len(),
                first.len()
            )));
        }
    }
    let grid = GridBuilder::uniform(binning).build(samples)?;
    let bounds = grid.highest_density_region(confidence_level)?;
    debug!(%grid, ?bounds, "joint highest-density region");

    Ok(JointRegion {
        bounds,
        estimate: estimate.to_vec(),
        confidence_level,
    })
}
