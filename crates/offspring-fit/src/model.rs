//! The model registry: which offspring laws are fitted and how their
//! parameters are laid out

use offspring_core::{Error, Result};
use offspring_distributions::{
    BetaPoisson, Geometric, NegativeBinomial, OffspringDistribution, Poisson, ZeroInflatedPoisson,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five fitted offspring models
///
/// The string keys returned by [`ModelKind::key`] name each model in reports
/// and configuration files and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelKind {
    Poisson,
    Geometric,
    NegativeBinomial,
    Zip,
    BetaPoisson,
}

impl ModelKind {
    /// Every model, in reporting order
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Poisson,
        ModelKind::Geometric,
        ModelKind::NegativeBinomial,
        ModelKind::Zip,
        ModelKind::BetaPoisson,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Poisson => "poisson",
            Self::Geometric => "geometric",
            Self::NegativeBinomial => "negative binomial",
            Self::Zip => "zip",
            Self::BetaPoisson => "beta-Poisson",
        }
    }

    /// Names of the positional parameters, in output order
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Self::Poisson | Self::Geometric => &["lambda"],
            Self::NegativeBinomial => &["lambda", "theta"],
            Self::Zip => &["lambda", "sigma"],
            Self::BetaPoisson => &["lambda", "phi", "nu"],
        }
    }

    pub fn arity(self) -> usize {
        self.parameter_names().len()
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::configuration(format!("unknown model '{s}'")))
    }
}

impl TryFrom<String> for ModelKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ModelKind> for String {
    fn from(kind: ModelKind) -> Self {
        kind.key().to_string()
    }
}

/// A model with its point estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FittedModel {
    Poisson(Poisson),
    Geometric(Geometric),
    NegativeBinomial(NegativeBinomial),
    Zip(ZeroInflatedPoisson),
    BetaPoisson(BetaPoisson),
}

impl FittedModel {
    /// Rebuild a model from its positional parameters
    pub fn from_parameters(kind: ModelKind, parameters: &[f64]) -> Result<Self> {
        if parameters.len() != kind.arity() {
            return Err(Error::InvalidParameter(format!(
                "{kind} takes {} parameters, got {}",
                kind.arity(),
                parameters.len()
            )));
        }
        Ok(match kind {
            ModelKind::Poisson => Self::Poisson(Poisson::new(parameters[0])?),
            ModelKind::Geometric => Self::Geometric(Geometric::new(parameters[0])?),
            ModelKind::NegativeBinomial => {
                Self::NegativeBinomial(NegativeBinomial::new(parameters[0], parameters[1])?)
            }
            ModelKind::Zip => Self::Zip(ZeroInflatedPoisson::new(parameters[0], parameters[1])?),
            ModelKind::BetaPoisson => Self::BetaPoisson(BetaPoisson::new(
                parameters[0],
                parameters[1],
                parameters[2],
            )?),
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Poisson(_) => ModelKind::Poisson,
            Self::Geometric(_) => ModelKind::Geometric,
            Self::NegativeBinomial(_) => ModelKind::NegativeBinomial,
            Self::Zip(_) => ModelKind::Zip,
            Self::BetaPoisson(_) => ModelKind::BetaPoisson,
        }
    }

    /// Point estimate in the order given by [`ModelKind::parameter_names`]
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Self::Poisson(d) => vec![d.lambda()],
            Self::Geometric(d) => vec![d.lambda()],
            Self::NegativeBinomial(d) => vec![d.lambda(), d.theta()],
            Self::Zip(d) => vec![d.lambda(), d.sigma()],
            Self::BetaPoisson(d) => vec![d.lambda(), d.phi(), d.nu()],
        }
    }

    pub fn distribution(&self) -> &dyn OffspringDistribution {
        match self {
            Self::Poisson(d) => d,
            Self::Geometric(d) => d,
            Self::NegativeBinomial(d) => d,
            Self::Zip(d) => d,
            Self::BetaPoisson(d) => d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.key().parse::<ModelKind>().unwrap(), kind);
        }
        assert_eq!("Beta-Poisson".parse::<ModelKind>().unwrap(), ModelKind::BetaPoisson);
        assert!(matches!(
            "weibull".parse::<ModelKind>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_display_uses_keys() {
        assert_eq!(ModelKind::NegativeBinomial.to_string(), "negative binomial");
        assert_eq!(String::from(ModelKind::Zip), "zip");
    }

    #[test]
    fn test_parameters_are_positional() {
        let model = FittedModel::from_parameters(ModelKind::BetaPoisson, &[1.2, 0.5, 0.1]).unwrap();
        assert_eq!(model.parameters(), vec![1.2, 0.5, 0.1]);
        assert_eq!(model.kind(), ModelKind::BetaPoisson);
        assert_eq!(model.distribution().name(), "beta-Poisson");
        assert_eq!(ModelKind::BetaPoisson.parameter_names(), &["lambda", "phi", "nu"]);
    }

    #[test]
    fn test_arity_checked() {
        assert!(FittedModel::from_parameters(ModelKind::Zip, &[1.0]).is_err());
        assert!(FittedModel::from_parameters(ModelKind::Zip, &[1.0, 1.5])
            .unwrap_err()
            .is_domain());
    }
}
