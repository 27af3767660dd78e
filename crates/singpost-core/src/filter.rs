//! # Country Filters
//!
//! A [`CountryFilter`] decides whether a rate table, zone, or surcharge
//! applies to a [`Destination`].
//!
//! ## Semantics
//!
//! ```text
//! accepts(dest) =
//!     dest.country ∉ exclude
//!     ∧ (include_continent = ∅ ∨ dest.continent ∈ include_continent)
//!     ∧ (include = ∅           ∨ dest.country ∈ include)
//! ```
//!
//! An empty include set is "no restriction", never "match nothing".
//! Exclusion short-circuits everything else.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::destination::{ContinentCode, CountryCode, Destination};

/// Destination predicate attached to tiers, zones and surcharges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryFilter {
    /// Countries served. Empty means every country.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub include: BTreeSet<CountryCode>,
    /// Countries never served, regardless of the other sets.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude: BTreeSet<CountryCode>,
    /// Continents served. Empty means every continent.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub include_continent: BTreeSet<ContinentCode>,
}

impl CountryFilter {
    /// A filter that accepts every destination.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Restrict to the given countries.
    pub fn including(mut self, countries: impl IntoIterator<Item = CountryCode>) -> Self {
        self.include.extend(countries);
        self
    }

    /// Reject the given countries.
    pub fn excluding(mut self, countries: impl IntoIterator<Item = CountryCode>) -> Self {
        self.exclude.extend(countries);
        self
    }

    /// Restrict to the given continents.
    pub fn on_continents(mut self, continents: impl IntoIterator<Item = ContinentCode>) -> Self {
        self.include_continent.extend(continents);
        self
    }

    /// Whether this filter places no restriction at all.
    pub fn is_unrestricted(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty() && self.include_continent.is_empty()
    }

    /// Decide whether `destination` is served.
    pub fn accepts(&self, destination: &Destination) -> bool {
        if self.exclude.contains(&destination.country) {
            return false;
        }
        let continent_ok = self.include_continent.is_empty()
            || self.include_continent.contains(&destination.continent);
        let country_ok = self.include.is_empty() || self.include.contains(&destination.country);
        continent_ok && country_ok
    }
}
