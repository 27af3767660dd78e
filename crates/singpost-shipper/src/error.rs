//! # Shipper Errors
//!
//! Only setup can fail: loading display configuration or a rate card.
//! Quotes never return an error; see [`crate::Quote::reason`].

use std::path::PathBuf;

use singpost_rates::RateError;
use thiserror::Error;

/// Shipper setup failed.
#[derive(Error, Debug)]
pub enum ShipperError {
    /// Shipper configuration file was not found.
    #[error("shipper config not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Shipper configuration file could not be parsed.
    #[error("failed to parse shipper config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Rate tables could not be built or loaded.
    #[error("rate error: {0}")]
    Rate(#[from] RateError),

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shipper setup.
pub type ShipperResult<T> = Result<T, ShipperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_errors_convert() {
        let err: ShipperError = RateError::NoZones.into();
        assert!(matches!(err, ShipperError::Rate(RateError::NoZones)));
        assert!(err.to_string().contains("no zones"));
    }

    #[test]
    fn config_not_found_display() {
        let err = ShipperError::ConfigNotFound {
            path: PathBuf::from("/etc/singpost.yaml"),
        };
        assert!(err.to_string().contains("/etc/singpost.yaml"));
    }
}
