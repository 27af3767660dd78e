//! # Rate Cards
//!
//! A [`RateCard`] is the serializable form of a [`RateRegistry`]: the
//! tables a carrier publishes, kept in YAML next to the deployment instead
//! of compiled in.
//!
//! ```yaml
//! services:
//!   LOCAL:
//!     kind: explicit
//!     filter: { include: [SG] }
//!     rows: [[40, "0.50"], [100, "0.80"]]
//!   SURFACE:
//!     kind: implicit
//!     filter: { exclude: [SG] }
//!     rows: [[20, "0.50"], [100, "1.00"]]
//!     maximum_item_weight: 2000
//!     step: [100, "1.00"]
//!   AIR:
//!     kind: zoned
//!     maximum_item_weight: 2000
//!     zones:
//!       - name: zone-1
//!         filter: { include: [MY, BN] }
//!         rows: [[20, "0.65"], [50, "0.90"]]
//!         step: [10, "0.15"]
//!   SPEEDPOST: null
//! surcharges:
//!   - amount: "2.20"
//!   - { amount: "2.24", filter: { include: [SG] } }
//! ```
//!
//! Weights and amounts are strings or integers. Floats are rejected.
//!
//! ## Parsing
//!
//! [`RateCard::from_yaml_str`] and [`RateCard::from_path`] only parse;
//! [`RateCard::into_registry`] validates every table and names the
//! offending service on failure.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use singpost_core::{CountryFilter, Weight};

use crate::error::{RateError, RateResult};
use crate::registry::RateRegistry;
use crate::surcharge::{Surcharge, SurchargeSchedule};
use crate::tier::{
    CostTier, ExplicitTiers, ImpliedStep, ImplicitTiers, RateTable, TierRow, Zone, ZonedTierSet,
};

/// Serializable rate registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateCard {
    /// Base service code to table; `null` marks a recognised code without
    /// a table.
    #[serde(default)]
    pub services: BTreeMap<String, Option<TierSpec>>,
    /// Registered-mail surcharges, last match wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surcharges: Vec<Surcharge>,
}

/// Serializable form of a [`CostTier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierSpec {
    /// See [`ExplicitTiers`].
    Explicit {
        #[serde(default, skip_serializing_if = "CountryFilter::is_unrestricted")]
        filter: CountryFilter,
        rows: Vec<TierRow>,
    },
    /// See [`ImplicitTiers`].
    Implicit {
        #[serde(default, skip_serializing_if = "CountryFilter::is_unrestricted")]
        filter: CountryFilter,
        rows: Vec<TierRow>,
        maximum_item_weight: Weight,
        step: ImpliedStep,
    },
    /// See [`ZonedTierSet`].
    Zoned {
        maximum_item_weight: Weight,
        zones: Vec<ZoneSpec>,
    },
}

/// Serializable form of a [`Zone`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    /// Zone label.
    pub name: String,
    /// Destinations in the zone.
    #[serde(default, skip_serializing_if = "CountryFilter::is_unrestricted")]
    pub filter: CountryFilter,
    /// Explicit rows.
    pub rows: Vec<TierRow>,
    /// Extrapolation past the heaviest row.
    pub step: ImpliedStep,
}

impl TierSpec {
    /// Validate and build the tier.
    pub fn build(self) -> RateResult<CostTier> {
        match self {
            Self::Explicit { filter, rows } => Ok(CostTier::Explicit(
                ExplicitTiers::new(rows)?.with_filter(filter),
            )),
            Self::Implicit {
                filter,
                rows,
                maximum_item_weight,
                step,
            } => {
                let explicit = ExplicitTiers::new(rows)?.with_filter(filter);
                Ok(CostTier::Implicit(ImplicitTiers::new(
                    explicit,
                    maximum_item_weight,
                    step,
                )?))
            }
            Self::Zoned {
                maximum_item_weight,
                zones,
            } => {
                let zones = zones
                    .into_iter()
                    .map(|z| Zone::new(z.name, z.filter, z.rows, z.step))
                    .collect::<RateResult<Vec<_>>>()?;
                Ok(CostTier::Zoned(ZonedTierSet::new(maximum_item_weight, zones)?))
            }
        }
    }
}

impl From<&CostTier> for TierSpec {
    fn from(tier: &CostTier) -> Self {
        match tier {
            CostTier::Explicit(t) => Self::Explicit {
                filter: t.filter().clone(),
                rows: t.rows().to_vec(),
            },
            CostTier::Implicit(t) => Self::Implicit {
                filter: t.filter().clone(),
                rows: t.explicit().rows().to_vec(),
                maximum_item_weight: t.maximum_item_weight(),
                step: t.step(),
            },
            CostTier::Zoned(set) => Self::Zoned {
                maximum_item_weight: set.maximum_item_weight(),
                zones: set.zones().iter().map(ZoneSpec::from).collect(),
            },
        }
    }
}

impl From<&Zone> for ZoneSpec {
    fn from(zone: &Zone) -> Self {
        Self {
            name: zone.name().to_string(),
            filter: zone.filter().clone(),
            rows: zone.tiers().explicit().rows().to_vec(),
            step: zone.tiers().step(),
        }
    }
}

impl RateCard {
    /// Parse a rate card from YAML text.
    pub fn from_yaml_str(yaml: &str) -> RateResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a rate card file.
    pub fn from_path(path: impl AsRef<Path>) -> RateResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|source| RateError::YamlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as YAML.
    pub fn to_yaml_string(&self) -> RateResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Snapshot a registry as a card.
    pub fn from_registry(registry: &RateRegistry) -> Self {
        Self {
            services: registry
                .services()
                .map(|(code, tier)| (code.to_string(), tier.map(TierSpec::from)))
                .collect(),
            surcharges: registry.surcharges().rules().to_vec(),
        }
    }

    /// Validate every table and build the registry.
    ///
    /// # Errors
    ///
    /// [`RateError::InvalidService`] naming the first service whose table
    /// does not build.
    pub fn into_registry(self) -> RateResult<RateRegistry> {
        let mut registry =
            RateRegistry::new().with_surcharges(SurchargeSchedule::new(self.surcharges));
        for (code, entry) in self.services {
            registry = match entry {
                Some(entry) => {
                    let tier = entry.build().map_err(|source| RateError::InvalidService {
                        service: code.clone(),
                        source: Box::new(source),
                    })?;
                    registry.with_service(&code, tier)
                }
                None => registry.with_placeholder(&code),
            };
        }
        tracing::debug!(services = registry.services().count(), "rate card loaded");
        Ok(registry)
    }
}
