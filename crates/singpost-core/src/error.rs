//! # Validation Errors
//!
//! Construction-time failures for the core newtypes. Business outcomes
//! such as "destination not served" are not errors and never appear here.

use thiserror::Error;

/// A value failed validation while constructing a core type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Country codes are two ASCII letters (ISO 3166-1 alpha-2).
    #[error("invalid country code {0:?}: expected two ASCII letters")]
    InvalidCountryCode(String),

    /// Continent codes are two ASCII letters (e.g. `AS`, `EU`).
    #[error("invalid continent code {0:?}: expected two ASCII letters")]
    InvalidContinentCode(String),

    /// The text is not a decimal number.
    #[error("invalid decimal {0:?}")]
    InvalidDecimal(String),

    /// Weights cannot be negative.
    #[error("weight must be non-negative, got {0}")]
    NegativeWeight(String),

    /// Money amounts cannot be negative.
    #[error("money amount must be non-negative, got {0}")]
    NegativeMoney(String),
}
