//! Likelihood benchmarks that do not depend on a fitted model

use offspring_core::CountData;

/// Log-likelihood of the saturated model `P(x) = freq(x)/n`
///
/// No offspring law can exceed this on the same sample, which makes it the
/// reference point for comparing the models' log-likelihoods.
pub fn empirical_log_likelihood(data: &CountData) -> f64 {
    let n = data.len() as f64;
    data.frequencies()
        .iter()
        .map(|&(_, count)| {
            let count = count as f64;
            count * (count / n).ln()
        })
        .sum()
}
