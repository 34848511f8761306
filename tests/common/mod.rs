//! Shared utilities for integration tests
#![allow(dead_code)]

use offspring_stats::prelude::*;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once; filter with `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A short, seeded, single-threaded run of `dataset`
pub fn quick_config(dataset: &str, resamples: usize) -> AnalysisConfig {
    AnalysisConfig::new(dataset)
        .with_resamples(resamples)
        .with_seed(20240601)
        .with_workers(1)
}
