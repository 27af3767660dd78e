//! # Shipper Display Configuration
//!
//! Strings the storefront shows next to a shipping option. None of them
//! affect the computed cost.
//!
//! ```yaml
//! carrier: SingPost
//! method: SingPost Mail
//! expected_delivery: 3 - 7 business days
//! services:
//!   LOCAL: Local Mail
//!   AIR: Airmail
//! ```
//!
//! Every field is optional; missing fields keep their defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ShipperError, ShipperResult};

/// Display strings for SingPost shipping options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipperConfig {
    /// Carrier name, prefixed to every description.
    pub carrier: String,
    /// Delivery service label, e.g. "SingPost Mail".
    pub method: String,
    /// Expected delivery time, free text.
    pub expected_delivery: String,
    /// Human label per base service code.
    pub services: BTreeMap<String, String>,
    /// Appended to the description of registered variants.
    pub registered_label: String,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        let services = [
            ("LOCAL", "Local Mail"),
            ("SURFACE", "Surface Mail"),
            ("AIR", "Airmail"),
            ("SPEEDPOST", "Speedpost"),
            ("BULK_MAIL", "Bulk Mail"),
        ]
        .into_iter()
        .map(|(code, label)| (code.to_string(), label.to_string()))
        .collect();
        Self {
            carrier: "SingPost".to_string(),
            method: "SingPost Mail".to_string(),
            expected_delivery: "3 - 7 business days".to_string(),
            services,
            registered_label: "(Registered)".to_string(),
        }
    }
}

impl ShipperConfig {
    /// Parse from YAML text.
    pub fn from_yaml_str(yaml: &str) -> ShipperResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a config file.
    pub fn from_path(path: impl AsRef<Path>) -> ShipperResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ShipperError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|source| ShipperError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Label for a base service code; the code itself when unlabelled.
    pub fn service_label<'a>(&'a self, base: &'a str) -> &'a str {
        self.services.get(base).map(String::as_str).unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ShipperConfig::default();
        assert_eq!(config.carrier, "SingPost");
        assert_eq!(config.service_label("AIR"), "Airmail");
        assert_eq!(config.service_label("EXPRESS"), "EXPRESS");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ShipperConfig::from_yaml_str("expected_delivery: 1 - 2 days\n").unwrap();
        assert_eq!(config.expected_delivery, "1 - 2 days");
        assert_eq!(config.method, "SingPost Mail");
    }

    #[test]
    fn services_map_replaces_defaults() {
        let config = ShipperConfig::from_yaml_str("services:\n  LOCAL: Ordinary Mail\n").unwrap();
        assert_eq!(config.service_label("LOCAL"), "Ordinary Mail");
        assert_eq!(config.service_label("AIR"), "AIR");
    }

    #[test]
    fn missing_file() {
        let err = ShipperConfig::from_path("/nonexistent/shipper.yaml").unwrap_err();
        assert!(matches!(err, ShipperError::ConfigNotFound { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipper.yaml");
        std::fs::write(&path, "carrier: Singapore Post\n").unwrap();
        let config = ShipperConfig::from_path(&path).unwrap();
        assert_eq!(config.carrier, "Singapore Post");
    }
}
