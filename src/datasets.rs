//! Named transmission datasets
//!
//! The built-in catalog holds the secondary-case counts of eight published
//! outbreak studies. Counts are stored as frequency tables and expanded on
//! load.

use offspring_core::{CountData, Error, Result};
use std::collections::BTreeMap;

/// Pneumonic plague clusters
const PLAGUE: &[(u64, usize)] = &[(0, 16), (1, 10), (2, 7), (3, 2), (4, 3), (5, 1), (6, 1)];

/// Human monkeypox, four generations of transmission in order
const MONKEYPOX_GENERATIONS: &[&[(u64, usize)]] = &[
    &[(0, 114), (1, 23), (2, 8), (3, 1), (5, 1)],
    &[(0, 38), (1, 7), (2, 1), (3, 1)],
    &[(0, 9), (1, 1), (2, 1)],
    &[(0, 2), (1, 1)],
];

/// Ebola in Nigeria, 2014
const FASINA_EBOLA: &[(u64, usize)] = &[(0, 15), (1, 2), (2, 1), (3, 1), (12, 1)];

/// Ebola in Guinea; cases without reported secondary cases are implicit
const FAY_EBOLA_SOURCES: &[u64] = &[
    1, 2, 2, 5, 14, 1, 4, 4, 1, 3, 3, 8, 2, 1, 1, 4, 9, 9, 1, 1, 17, 2, 1, 1, 1, 4, 3, 3, 4, 2, 5, 1,
    2, 2, 1, 9, 1, 3, 1, 2, 1, 1, 2,
];
const FAY_EBOLA_CASES: usize = 152;

/// SARS in Singapore, 2003
const CDC_SARS: &[(u64, usize)] = &[
    (0, 162),
    (1, 19),
    (2, 8),
    (3, 7),
    (7, 1),
    (12, 1),
    (21, 1),
    (23, 1),
    (40, 1),
];

/// MERS in South Korea, 2015; non-transmitting cases are implicit
const COWLING_MERS_SOURCES: &[u64] = &[38, 3, 2, 1, 6, 81, 2, 23, 2, 1, 1, 1, 5, 1, 1, 1, 2, 1, 1, 1];
const COWLING_MERS_CASES: usize = 166;

/// MERS clusters in the Middle East
const MERS: &[(u64, usize)] = &[(0, 13), (1, 5), (2, 4), (3, 1), (7, 1)];

/// Norovirus in a hospital setting
const NORO: &[(u64, usize)] = &[(0, 22), (1, 13), (2, 6), (3, 3), (4, 1), (5, 1)];

fn expand(table: &[(u64, usize)]) -> Vec<u64> {
    table
        .iter()
        .flat_map(|&(value, count)| std::iter::repeat(value).take(count))
        .collect()
}

fn zero_padded(sources: &[u64], cases: usize) -> Vec<u64> {
    let mut values = sources.to_vec();
    values.resize(cases.max(sources.len()), 0);
    values
}

/// Datasets available to an analysis, looked up by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, Vec<u64>>,
}

impl DatasetRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The eight datasets of the reference study
    pub fn builtin() -> Self {
        let monkeypox = MONKEYPOX_GENERATIONS.iter().flat_map(|g| expand(g)).collect();
        Self::new()
            .with_dataset("plague", expand(PLAGUE))
            .with_dataset("monkeypox", monkeypox)
            .with_dataset("fasina_ebola", expand(FASINA_EBOLA))
            .with_dataset("fay_ebola", zero_padded(FAY_EBOLA_SOURCES, FAY_EBOLA_CASES))
            .with_dataset("cdc_sars", expand(CDC_SARS))
            .with_dataset("cowling_mers", zero_padded(COWLING_MERS_SOURCES, COWLING_MERS_CASES))
            .with_dataset("mers", expand(MERS))
            .with_dataset("noro", expand(NORO))
    }

    /// Add or replace a dataset
    pub fn with_dataset(mut self, name: impl Into<String>, values: Vec<u64>) -> Self {
        self.datasets.insert(name.into(), values);
        self
    }

    /// Load a dataset; a trailing `_data` on the name is accepted
    pub fn get(&self, name: &str) -> Result<CountData> {
        let key = name.strip_suffix("_data").unwrap_or(name);
        let values = self
            .datasets
            .get(key)
            .ok_or_else(|| Error::configuration(format!("unknown dataset '{name}'")))?;
        CountData::new(values.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name.strip_suffix("_data").unwrap_or(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_catalog() {
        let registry = DatasetRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec!["cdc_sars", "cowling_mers", "fasina_ebola", "fay_ebola", "mers", "monkeypox", "noro", "plague"]
        );
    }

    #[test]
    fn test_dataset_sizes() {
        let registry = DatasetRegistry::builtin();
        let sizes = [
            ("plague", 40),
            ("monkeypox", 208),
            ("fasina_ebola", 20),
            ("fay_ebola", 152),
            ("cdc_sars", 201),
            ("cowling_mers", 166),
            ("mers", 24),
            ("noro", 46),
        ];
        for (name, n) in sizes {
            assert_eq!(registry.get(name).unwrap().len(), n, "{name}");
        }
    }

    #[test]
    fn test_plague_summary() {
        let plague = DatasetRegistry::builtin().get("plague").unwrap();
        assert_relative_eq!(plague.mean(), 53.0 / 40.0);
        assert_eq!(plague.max(), 6);
        assert_eq!(plague.zeros(), 16);
    }

    #[test]
    fn test_padded_datasets_keep_their_totals() {
        let registry = DatasetRegistry::builtin();
        let fay = registry.get("fay_ebola").unwrap();
        assert_eq!(fay.values().iter().sum::<u64>(), FAY_EBOLA_SOURCES.iter().sum::<u64>());
        assert_eq!(fay.zeros(), 152 - FAY_EBOLA_SOURCES.len());
        let mers = registry.get("cowling_mers").unwrap();
        assert_eq!(mers.values().iter().sum::<u64>(), 174);
        assert_eq!(mers.max(), 81);
    }

    #[test]
    fn test_lookup() {
        let registry = DatasetRegistry::builtin();
        assert_eq!(registry.get("noro_data").unwrap(), registry.get("noro").unwrap());
        assert!(registry.contains("mers_data"));
        assert!(matches!(registry.get("influenza"), Err(Error::Configuration(_))));

        let custom = DatasetRegistry::new().with_dataset("toy", vec![0, 1, 2]);
        assert_eq!(custom.len(), 1);
        assert_relative_eq!(custom.get("toy").unwrap().mean(), 1.0);
        assert!(matches!(
            DatasetRegistry::new().with_dataset("empty", vec![]).get("empty"),
            Err(Error::InsufficientData { .. })
        ));
    }
}
