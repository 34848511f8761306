//! Histograms and highest-density regions for bootstrap estimates
//!
//! - [`FixedWidthBuilder`] builds one-dimensional fixed-width histograms
//! - [`GridBuilder`] builds sparse histograms over points in any dimension
//! - [`highest_density_cells`] selects the heaviest cells covering a target
//!   share of the mass; histograms report the selected region's per-axis
//!   bounds
//!
//! # Example
//!
//! ```rust
//! use offspring_histogram::{Binning, FixedWidthBuilder, GridBuilder, HistogramBuilder};
//!
//! let estimates = vec![0.9, 1.0, 1.0, 1.1, 1.1, 1.1, 1.2, 1.2, 1.3, 2.5];
//! let histogram = FixedWidthBuilder::new(8).build(&estimates).unwrap();
//! let (lower, upper) = histogram.highest_density_interval(0.75).unwrap();
//! assert!(lower <= 1.0 && upper < 2.5);
//!
//! let points: Vec<Vec<f64>> = estimates.iter().map(|&x| vec![x, 2.0 * x]).collect();
//! let grid = GridBuilder::uniform(Binning::Count(8)).build(&points).unwrap();
//! let region = grid.highest_density_region(0.75).unwrap();
//! assert_eq!(region.len(), 2);
//! ```

pub mod builders;
pub mod hdr;
pub mod traits;
pub mod types;

pub use builders::{Binning, FixedWidthBuilder, GridBuilder};
pub use hdr::{highest_density_cells, HdrSelection};
pub use traits::HistogramBuilder;
pub use types::{GridAxis, GridHistogram, Histogram, HistogramBin};

pub use offspring_core::Result;
