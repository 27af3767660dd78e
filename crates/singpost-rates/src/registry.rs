//! # Service Registry
//!
//! Maps base service codes to their [`CostTier`] and holds the surcharge
//! schedule shared by every registered variant.
//!
//! A code can be mapped to `None`: the product is recognised (it may be
//! offered in the storefront) but has no rate table yet. Such codes, and
//! codes the registry has never heard of, resolve to
//! [`Uncostable::UnimplementedService`].
//!
//! A registry is built once and then only read. It holds no interior
//! mutability and can be shared across threads behind `&` or `Arc`.

use std::collections::BTreeMap;

use singpost_core::{Destination, Money};

use crate::error::Uncostable;
use crate::service::ServiceCode;
use crate::surcharge::SurchargeSchedule;
use crate::tier::{CostTier, ResolvedTier, TierMiss};

/// Immutable catalogue of rate tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateRegistry {
    services: BTreeMap<String, Option<CostTier>>,
    surcharges: SurchargeSchedule,
}

impl RateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tier` under a base service code.
    pub fn with_service(mut self, base: &str, tier: CostTier) -> Self {
        self.services
            .insert(ServiceCode::base_of(base).base().to_string(), Some(tier));
        self
    }

    /// Register a recognised code that has no rate table.
    pub fn with_placeholder(mut self, base: &str) -> Self {
        self.services
            .insert(ServiceCode::base_of(base).base().to_string(), None);
        self
    }

    /// Set the registered-mail surcharge schedule.
    pub fn with_surcharges(mut self, surcharges: SurchargeSchedule) -> Self {
        self.surcharges = surcharges;
        self
    }

    /// Base codes with their tiers, in code order.
    pub fn services(&self) -> impl Iterator<Item = (&str, Option<&CostTier>)> {
        self.services
            .iter()
            .map(|(code, tier)| (code.as_str(), tier.as_ref()))
    }

    /// The tier behind `code`, ignoring the registered suffix.
    pub fn tier(&self, code: &ServiceCode) -> Option<&CostTier> {
        self.services.get(code.base()).and_then(Option::as_ref)
    }

    /// Whether `code` is known, with or without a rate table.
    pub fn is_recognised(&self, code: &ServiceCode) -> bool {
        self.services.contains_key(code.base())
    }

    /// Every selectable code: each base code, plus the registered variant of
    /// each implemented code when a surcharge schedule exists.
    pub fn service_codes(&self) -> Vec<ServiceCode> {
        let offer_registered = !self.surcharges.rules().is_empty();
        let mut codes = Vec::new();
        for (base, tier) in &self.services {
            let code = ServiceCode::base_of(base);
            if offer_registered && tier.is_some() {
                let registered = code.registered();
                codes.push(code);
                codes.push(registered);
            } else {
                codes.push(code);
            }
        }
        codes
    }

    /// The surcharge schedule.
    pub fn surcharges(&self) -> &SurchargeSchedule {
        &self.surcharges
    }

    /// Surcharge owed for `code` to `destination`: zero unless the code is a
    /// registered variant and a rule matches.
    pub fn surcharge_for(&self, code: &ServiceCode, destination: &Destination) -> Money {
        if !code.is_registered() {
            return Money::ZERO;
        }
        self.surcharges.resolve(destination).unwrap_or(Money::ZERO)
    }

    /// Find the table that prices `code` for `destination`.
    ///
    /// Destination rejections are logged at `error` level.
    pub fn resolve(
        &self,
        code: &ServiceCode,
        destination: &Destination,
    ) -> Result<ResolvedTier<'_>, Uncostable> {
        let Some(tier) = self.tier(code) else {
            tracing::debug!(service = %code, recognised = self.is_recognised(code), "service has no rate table");
            return Err(Uncostable::UnimplementedService {
                service: code.to_string(),
            });
        };
        match tier.resolve(destination) {
            Ok(resolved) => {
                tracing::debug!(
                    service = %code,
                    destination = %destination,
                    tier = tier.kind(),
                    zone = resolved.zone().unwrap_or("-"),
                    "tier resolved"
                );
                Ok(resolved)
            }
            Err(TierMiss::Excluded) => {
                tracing::error!(service = %code, destination = %destination, "destination excluded by tier filter");
                Err(Uncostable::DestinationExcluded {
                    service: code.to_string(),
                    destination: destination.to_string(),
                })
            }
            Err(TierMiss::NoZone) => {
                tracing::error!(service = %code, destination = %destination, "no zone accepts destination");
                Err(Uncostable::UnresolvedZone {
                    service: code.to_string(),
                    destination: destination.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surcharge::Surcharge;
    use crate::tier::{ExplicitTiers, RateTable, TierRow};
    use rust_decimal_macros::dec;
    use singpost_core::{CountryCode, CountryFilter, Weight};

    fn money(v: rust_decimal::Decimal) -> Money {
        Money::new(v).unwrap()
    }

    fn registry() -> RateRegistry {
        let sg = CountryFilter::unrestricted().including(CountryCode::parse_all(["SG"]).unwrap());
        let local = ExplicitTiers::new(vec![
            TierRow::new(Weight::from(40), money(dec!(0.50))),
            TierRow::new(Weight::from(500), money(dec!(1.50))),
        ])
        .unwrap()
        .with_filter(sg.clone());
        RateRegistry::new()
            .with_service("local", CostTier::Explicit(local))
            .with_placeholder("SPEEDPOST")
            .with_surcharges(SurchargeSchedule::new(vec![
                Surcharge::flat(money(dec!(2.20))),
                Surcharge::for_destinations(money(dec!(2.24)), sg),
            ]))
    }

    #[test]
    fn registered_code_resolves_to_base_tier() {
        let reg = registry();
        let sg = Destination::new("SG", "AS").unwrap();
        let plain = reg.resolve(&ServiceCode::parse("LOCAL"), &sg).unwrap();
        let registered = reg.resolve(&ServiceCode::parse("LOCAL_REGISTERED"), &sg).unwrap();
        assert_eq!(plain.heaviest_weight(), registered.heaviest_weight());
    }

    #[test]
    fn placeholder_and_unknown_are_unimplemented() {
        let reg = registry();
        let sg = Destination::new("SG", "AS").unwrap();
        for code in ["SPEEDPOST", "SPEEDPOST_REGISTERED", "CARRIER_PIGEON"] {
            let err = reg.resolve(&ServiceCode::parse(code), &sg).unwrap_err();
            assert!(matches!(err, Uncostable::UnimplementedService { .. }), "{code}");
        }
        assert!(reg.is_recognised(&ServiceCode::parse("SPEEDPOST")));
        assert!(!reg.is_recognised(&ServiceCode::parse("CARRIER_PIGEON")));
    }

    #[test]
    fn excluded_destination() {
        let reg = registry();
        let my = Destination::new("MY", "AS").unwrap();
        let err = reg.resolve(&ServiceCode::parse("LOCAL"), &my).unwrap_err();
        assert_eq!(
            err,
            Uncostable::DestinationExcluded {
                service: "LOCAL".to_string(),
                destination: "MY/AS".to_string(),
            }
        );
    }

    #[test]
    fn surcharge_only_for_registered_codes() {
        let reg = registry();
        let sg = Destination::new("SG", "AS").unwrap();
        assert_eq!(reg.surcharge_for(&ServiceCode::parse("LOCAL"), &sg), Money::ZERO);
        assert_eq!(
            reg.surcharge_for(&ServiceCode::parse("LOCAL_REGISTERED"), &sg),
            money(dec!(2.24))
        );
    }

    #[test]
    fn service_codes_include_registered_variants() {
        let codes: Vec<String> = registry()
            .service_codes()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(codes, vec!["LOCAL", "LOCAL_REGISTERED", "SPEEDPOST"]);
    }
}
