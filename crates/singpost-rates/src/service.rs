//! # Service Codes
//!
//! A service code names a postal product, e.g. `LOCAL` or `AIR`. Appending
//! [`REGISTERED_SUFFIX`] selects the registered variant of the same product:
//! identical postage plus a destination-dependent surcharge.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Suffix that turns a base service into its registered variant.
pub const REGISTERED_SUFFIX: &str = "_REGISTERED";

/// A parsed service selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceCode {
    base: String,
    registered: bool,
}

impl ServiceCode {
    /// Parse a code. Matching is case-insensitive; codes are stored
    /// upper-case.
    pub fn parse(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        match code.strip_suffix(REGISTERED_SUFFIX) {
            Some(base) if !base.is_empty() => Self {
                base: base.to_string(),
                registered: true,
            },
            _ => Self {
                base: code,
                registered: false,
            },
        }
    }

    /// The plain variant of `base`.
    pub fn base_of(base: &str) -> Self {
        Self {
            base: base.trim().to_ascii_uppercase(),
            registered: false,
        }
    }

    /// The registered variant of this service.
    pub fn registered(&self) -> Self {
        Self {
            base: self.base.clone(),
            registered: true,
        }
    }

    /// Base product code, without the registered suffix.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether the registered surcharge applies.
    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

impl FromStr for ServiceCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl TryFrom<String> for ServiceCode {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self::parse(&value))
    }
}

impl From<ServiceCode> for String {
    fn from(code: ServiceCode) -> Self {
        code.to_string()
    }
}

impl std::fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.registered {
            write!(f, "{}{}", self.base, REGISTERED_SUFFIX)
        } else {
            f.write_str(&self.base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_code() {
        let code = ServiceCode::parse("LOCAL");
        assert_eq!(code.base(), "LOCAL");
        assert!(!code.is_registered());
        assert_eq!(code.to_string(), "LOCAL");
    }

    #[test]
    fn registered_code_strips_suffix() {
        let code = ServiceCode::parse("LOCAL_REGISTERED");
        assert_eq!(code.base(), "LOCAL");
        assert!(code.is_registered());
        assert_eq!(code.to_string(), "LOCAL_REGISTERED");
    }

    #[test]
    fn bare_suffix_is_not_registered() {
        let code = ServiceCode::parse("_REGISTERED");
        assert_eq!(code.base(), "_REGISTERED");
        assert!(!code.is_registered());
    }

    #[test]
    fn parsing_normalizes_case() {
        assert_eq!(ServiceCode::parse(" air_registered "), ServiceCode::parse("AIR_REGISTERED"));
        assert_eq!(ServiceCode::base_of("air").registered(), ServiceCode::parse("AIR_REGISTERED"));
    }

    #[test]
    fn serde_uses_display_form() {
        let code: ServiceCode = serde_yaml::from_str("SURFACE_REGISTERED").unwrap();
        assert!(code.is_registered());
        let yaml = serde_yaml::to_string(&code).unwrap();
        assert_eq!(yaml.trim(), "SURFACE_REGISTERED");
    }
}
