//! Error types for offspring distribution analysis
//!
//! Provides a unified error type for all offspring-stats crates.

use thiserror::Error;

/// Core error type for estimation, resampling and interval construction
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A likelihood or special function was evaluated outside its domain.
    ///
    /// Optimisers treat this as an infeasible point rather than a failure.
    #[error("Domain error: {0}")]
    Domain(String),

    /// A solver could not produce a finite maximum-likelihood estimate
    #[error("Fit failure for {model}: {reason}")]
    FitFailure { model: String, reason: String },

    /// Invalid run configuration (unknown dataset, zero workers, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for empty input
    pub fn empty_input(operation: &str) -> Self {
        Self::InvalidInput(format!("{operation} requires at least one observation"))
    }

    /// Create a domain error
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Create a fit failure for the named model
    pub fn fit_failure(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FitFailure {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Whether this error marks an infeasible evaluation point
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Whether this error is a solver failure
    pub fn is_fit_failure(&self) -> bool {
        matches!(self, Self::FitFailure { .. })
    }
}
