//! Common types for confidence intervals

use offspring_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A confidence interval with lower and upper bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound of the interval
    pub lower: f64,
    /// Upper bound of the interval
    pub upper: f64,
    /// The point estimate the interval was built around
    pub estimate: f64,
    /// Confidence level (e.g., 0.95 for 95% CI)
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    /// Create a new confidence interval
    pub fn new(lower: f64, upper: f64, estimate: f64, confidence_level: f64) -> Self {
        Self {
            lower,
            upper,
            estimate,
            confidence_level,
        }
    }

    /// An interval that has collapsed onto one value
    pub fn point(value: f64, confidence_level: f64) -> Self {
        Self::new(value, value, value, confidence_level)
    }

    /// Width of the confidence interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Check if a value is contained in the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Check if intervals overlap
    pub fn overlaps(&self, other: &ConfidenceInterval) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

impl fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}% CI: [{:.4}, {:.4}], estimate: {:.4}",
            self.confidence_level * 100.0,
            self.lower,
            self.upper,
            self.estimate
        )
    }
}

/// A joint confidence region reported as one interval per axis
///
/// The bounds are the bounding box of the selected histogram cells, which
/// contains the true highest-density region and is therefore conservative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointRegion {
    pub bounds: Vec<(f64, f64)>,
    pub estimate: Vec<f64>,
    pub confidence_level: f64,
}

impl JointRegion {
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Per-axis intervals around the joint estimate
    pub fn marginals(&self) -> Vec<ConfidenceInterval> {
        self.bounds
            .iter()
            .zip(&self.estimate)
            .map(|(&(lower, upper), &estimate)| {
                ConfidenceInterval::new(lower, upper, estimate, self.confidence_level)
            })
            .collect()
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.bounds.len()
            && self
                .bounds
                .iter()
                .zip(point)
                .all(|(&(lower, upper), &x)| x >= lower && x <= upper)
    }
}

/// Confidence level type with validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// Create a new confidence level, rejecting values outside `(0, 1)`
    pub fn new(level: f64) -> Result<Self> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(Error::configuration(format!(
                "confidence level must be in (0, 1), got {level}"
            )))
        }
    }

    /// Get the confidence level value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the alpha level (1 - confidence level)
    pub fn alpha(&self) -> f64 {
        1.0 - self.0
    }

    /// Get the tail probability (alpha/2 for two-tailed)
    pub fn tail_probability(&self) -> f64 {
        self.alpha() / 2.0
    }

    /// Common confidence levels
    pub const NINETY: Self = Self(0.90);
    pub const NINETY_FIVE: Self = Self(0.95);
    pub const NINETY_NINE: Self = Self(0.99);
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = Error;

    fn try_from(level: f64) -> Result<Self> {
        Self::new(level)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_interval() {
        let ci = ConfidenceInterval::new(2.0, 8.0, 5.0, 0.95);

        assert_eq!(ci.width(), 6.0);
        assert!(ci.contains(5.0));
        assert!(!ci.contains(1.0));
        assert!(!ci.contains(9.0));
    }

    #[test]
    fn test_overlap() {
        let ci1 = ConfidenceInterval::new(2.0, 6.0, 4.0, 0.95);
        let ci2 = ConfidenceInterval::new(4.0, 8.0, 6.0, 0.95);
        let ci3 = ConfidenceInterval::new(7.0, 9.0, 8.0, 0.95);

        assert!(ci1.overlaps(&ci2));
        assert!(ci2.overlaps(&ci1));
        assert!(!ci1.overlaps(&ci3));
    }

    #[test]
    fn test_point_interval() {
        let ci = ConfidenceInterval::point(0.3, 0.95);
        assert_eq!(ci.width(), 0.0);
        assert!(ci.contains(0.3));
    }

    #[test]
    fn test_joint_region_marginals() {
        let region = JointRegion {
            bounds: vec![(1.0, 2.0), (0.1, 0.4)],
            estimate: vec![1.5, 0.2],
            confidence_level: 0.9,
        };
        assert_eq!(region.dimension(), 2);
        assert!(region.contains(&[1.2, 0.3]));
        assert!(!region.contains(&[1.2, 0.5]));
        assert!(!region.contains(&[1.2]));
        let marginals = region.marginals();
        assert_eq!(marginals[1], ConfidenceInterval::new(0.1, 0.4, 0.2, 0.9));
    }

    #[test]
    fn test_confidence_level() {
        let level = ConfidenceLevel::new(0.95).unwrap();
        assert_eq!(level.value(), 0.95);
        assert!((level.alpha() - 0.05).abs() < 1e-10);
        assert!((level.tail_probability() - 0.025).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_confidence_level() {
        for bad in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            let err = ConfidenceLevel::new(bad).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{bad}");
        }
    }

    #[test]
    fn test_confidence_interval_display() {
        let ci = ConfidenceInterval::new(2.5, 7.5, 5.0, 0.95);
        let display = format!("{}", ci);
        assert!(display.contains("95.0%"));
        assert!(display.contains("2.5000"));
        assert!(display.contains("7.5000"));
        assert!(display.contains("5.0000"));
    }

    #[test]
    fn test_confidence_level_display() {
        assert_eq!(format!("{}", ConfidenceLevel::NINETY_FIVE), "95.0%");
        assert_eq!(format!("{}", ConfidenceLevel::new(0.99).unwrap()), "99.0%");
    }
}
