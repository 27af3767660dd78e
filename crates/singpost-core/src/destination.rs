//! # Destination Codes
//!
//! Newtypes for the two facts the engine needs about where a parcel goes:
//! the ISO 3166-1 alpha-2 country and the two-letter continent code. You
//! cannot pass a continent where a country is expected.
//!
//! ## Validation
//!
//! Both codes are trimmed, must be exactly two ASCII letters, and are
//! stored upper-case, so `"sg"` and `" SG "` compare equal to `"SG"`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

fn normalize_code(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}

// -- Validating Deserialize ---------------------------------------------------

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ContinentCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// An ISO 3166-1 alpha-2 country code, e.g. `SG`, `MY`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CountryCode(String);

impl CountryCode {
    /// Create a country code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCountryCode`] unless the value is
    /// two ASCII letters after trimming.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        normalize_code(value)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidCountryCode(value.to_string()))
    }

    /// Parse a list of codes, failing on the first invalid one.
    pub fn parse_all<I, S>(values: I) -> Result<Vec<Self>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values.into_iter().map(|v| Self::new(v.as_ref())).collect()
    }

    /// Access the upper-case code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A two-letter continent code, e.g. `AS`, `EU`, `OC`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ContinentCode(String);

impl ContinentCode {
    /// Create a continent code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContinentCode`] unless the value
    /// is two ASCII letters after trimming.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        normalize_code(value)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidContinentCode(value.to_string()))
    }

    /// Parse a list of codes, failing on the first invalid one.
    pub fn parse_all<I, S>(values: I) -> Result<Vec<Self>, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values.into_iter().map(|v| Self::new(v.as_ref())).collect()
    }

    /// Access the upper-case code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContinentCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a parcel is going, as seen by the rate engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
    /// Destination country.
    pub country: CountryCode,
    /// Continent the country belongs to.
    pub continent: ContinentCode,
}

impl Destination {
    /// Build a destination from raw country and continent codes.
    pub fn new(country: &str, continent: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            country: CountryCode::new(country)?,
            continent: ContinentCode::new(continent)?,
        })
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.country, self.continent)
    }
}
