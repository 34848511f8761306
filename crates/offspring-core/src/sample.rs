//! Immutable samples of secondary-case counts

use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An observed sequence of non-negative counts
///
/// Summary statistics are computed once on construction. The distinct-value
/// table lets likelihoods evaluate each distinct observation only once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct CountData {
    values: Vec<u64>,
    frequencies: Vec<(u64, usize)>,
    mean: f64,
    variance: f64,
}

impl CountData {
    /// Build a sample, rejecting empty input
    pub fn new(values: Vec<u64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InsufficientData {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self::summarise(values))
    }

    fn summarise(values: Vec<u64>) -> Self {
        let mut table: BTreeMap<u64, usize> = BTreeMap::new();
        for &value in &values {
            *table.entry(value).or_insert(0) += 1;
        }

        let n = values.len() as f64;
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
        // Population variance, matching the moment estimators used for seeding
        let variance = values
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Self {
            values,
            frequencies: table.into_iter().collect(),
            mean,
            variance,
        }
    }

    /// Build a sample from a frequency table `(value, count)`
    pub fn from_frequencies(table: &[(u64, usize)]) -> Result<Self> {
        let values = table
            .iter()
            .flat_map(|&(value, count)| std::iter::repeat(value).take(count))
            .collect();
        Self::new(values)
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Distinct values in ascending order with their multiplicities
    pub fn frequencies(&self) -> &[(u64, usize)] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (divisor n)
    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn max(&self) -> u64 {
        self.frequencies.last().map(|&(v, _)| v).unwrap_or(0)
    }

    /// Number of observations equal to zero
    pub fn zeros(&self) -> usize {
        match self.frequencies.first() {
            Some(&(0, count)) => count,
            _ => 0,
        }
    }

    /// Excess variance relative to a Poisson with the same mean
    pub fn overdispersion(&self) -> Result<f64> {
        if self.mean <= 0.0 {
            return Err(Error::domain("overdispersion of a zero-mean sample"));
        }
        Ok((self.variance - self.mean) / self.mean)
    }

    /// Draw a sample of the same size with replacement
    pub fn resample<R: Rng + ?Sized>(&self, rng: &mut R) -> CountData {
        let n = self.values.len();
        let drawn = (0..n).map(|_| self.values[rng.gen_range(0..n)]).collect();
        Self::summarise(drawn)
    }
}

impl TryFrom<Vec<u64>> for CountData {
    type Error = Error;

    fn try_from(values: Vec<u64>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<CountData> for Vec<u64> {
    fn from(data: CountData) -> Self {
        data.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_summary_statistics() {
        let data = CountData::new(vec![0, 0, 1, 2, 2, 2, 7]).unwrap();
        assert_eq!(data.len(), 7);
        assert_relative_eq!(data.mean(), 2.0);
        // squared deviations: 4 4 1 0 0 0 25
        assert_relative_eq!(data.variance(), 34.0 / 7.0);
        assert_eq!(data.max(), 7);
        assert_eq!(data.zeros(), 2);
        assert_eq!(data.frequencies(), &[(0, 2), (1, 1), (2, 3), (7, 1)]);
    }

    #[test]
    fn test_empty_sample_rejected() {
        let err = CountData::new(vec![]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { expected: 1, actual: 0 }));
    }

    #[test]
    fn test_from_frequencies_round_trip() {
        let data = CountData::from_frequencies(&[(0, 3), (4, 2)]).unwrap();
        assert_eq!(data.values(), &[0, 0, 0, 4, 4]);
        assert_eq!(data.frequencies(), &[(0, 3), (4, 2)]);
    }

    #[test]
    fn test_overdispersion() {
        let data = CountData::new(vec![0, 0, 0, 6]).unwrap();
        // mean 1.5, variance 6.75
        assert_relative_eq!(data.overdispersion().unwrap(), 3.5);

        let zeros = CountData::new(vec![0, 0]).unwrap();
        assert!(zeros.overdispersion().unwrap_err().is_domain());
    }

    #[test]
    fn test_resample_draws_from_observed_values() {
        let data = CountData::new(vec![1, 5, 9]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let resample = data.resample(&mut rng);
            assert_eq!(resample.len(), 3);
            assert!(resample.values().iter().all(|v| [1, 5, 9].contains(v)));
        }
    }

    #[test]
    fn test_serde_as_plain_sequence() {
        let data = CountData::new(vec![3, 0, 1]).unwrap();
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, "[3,0,1]");
        let back: CountData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
        assert!(serde_json::from_str::<CountData>("[]").is_err());
    }
}
