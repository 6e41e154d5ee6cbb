//! Error taxonomy for the runoff and reservoir chain.
//!
//! Curve extrapolation is absent: out-of-range lookups succeed
//! and are reported through [`crate::curves::CurveLookup`] instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Scenario identifier outside the fixed set {1, 2, 3}.
    #[error("unknown scenario {0}: scenario must be 1, 2 or 3")]
    UnknownScenario(u8),

    /// Exact-match elevation lookup against the hypsometric table failed.
    #[error("elevation {elevation} m not found in hypsometric curve")]
    ElevationNotFound { elevation: f64 },

    /// Numeric input outside the domain of a formula.
    #[error("invalid {name} = {value}: {reason}")]
    Domain {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    #[error("invalid configuration: {}", join_config_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    #[error("cannot read configuration \"{}\": {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn domain(name: &'static str, value: f64, reason: &'static str) -> Self {
        Error::Domain {
            name,
            value,
            reason,
        }
    }
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
