//! # Registered-Mail Surcharges
//!
//! Registered variants of a service add a flat fee per order on top of the
//! tier postage. The fee depends on the destination.
//!
//! Rules are checked in declaration order and the **last** matching rule
//! wins, so a general rule is listed first and narrower overrides after
//! it. Zone selection in [`crate::tier::ZonedTierSet`] is first-match.

use serde::{Deserialize, Serialize};
use singpost_core::{CountryFilter, Destination, Money};

/// A flat fee for the destinations its filter accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surcharge {
    /// Fee added once per order.
    pub amount: Money,
    /// Destinations the fee applies to.
    #[serde(default, skip_serializing_if = "CountryFilter::is_unrestricted")]
    pub filter: CountryFilter,
}

impl Surcharge {
    /// A fee applying to every destination.
    pub fn flat(amount: Money) -> Self {
        Self {
            amount,
            filter: CountryFilter::unrestricted(),
        }
    }

    /// A fee restricted to `filter`.
    pub fn for_destinations(amount: Money, filter: CountryFilter) -> Self {
        Self { amount, filter }
    }
}

/// Ordered surcharge rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurchargeSchedule {
    rules: Vec<Surcharge>,
}

impl SurchargeSchedule {
    /// Build a schedule from rules in match order.
    pub fn new(rules: Vec<Surcharge>) -> Self {
        Self { rules }
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Surcharge] {
        &self.rules
    }

    /// Fee for `destination`: the last rule that accepts it, if any.
    pub fn resolve(&self, destination: &Destination) -> Option<Money> {
        self.rules
            .iter()
            .filter(|rule| rule.filter.accepts(destination))
            .last()
            .map(|rule| rule.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use singpost_core::CountryCode;

    fn money(v: rust_decimal::Decimal) -> Money {
        Money::new(v).unwrap()
    }

    fn sg_only() -> CountryFilter {
        CountryFilter::unrestricted().including(CountryCode::parse_all(["SG"]).unwrap())
    }

    #[test]
    fn later_rule_overrides_earlier_match() {
        let schedule = SurchargeSchedule::new(vec![
            Surcharge::flat(money(dec!(2.20))),
            Surcharge::for_destinations(money(dec!(2.24)), sg_only()),
        ]);
        let sg = Destination::new("SG", "AS").unwrap();
        let my = Destination::new("MY", "AS").unwrap();
        assert_eq!(schedule.resolve(&sg), Some(money(dec!(2.24))));
        assert_eq!(schedule.resolve(&my), Some(money(dec!(2.20))));
    }

    #[test]
    fn general_rule_last_shadows_specific() {
        let schedule = SurchargeSchedule::new(vec![
            Surcharge::for_destinations(money(dec!(2.24)), sg_only()),
            Surcharge::flat(money(dec!(2.20))),
        ]);
        let sg = Destination::new("SG", "AS").unwrap();
        assert_eq!(schedule.resolve(&sg), Some(money(dec!(2.20))));
    }

    #[test]
    fn no_matching_rule() {
        let schedule =
            SurchargeSchedule::new(vec![Surcharge::for_destinations(money(dec!(2.24)), sg_only())]);
        assert_eq!(schedule.resolve(&Destination::new("FR", "EU").unwrap()), None);
        assert_eq!(SurchargeSchedule::default().resolve(&Destination::new("SG", "AS").unwrap()), None);
    }

    #[test]
    fn unrestricted_filter_is_omitted_from_yaml() {
        let yaml = serde_yaml::to_string(&Surcharge::flat(money(dec!(2.20)))).unwrap();
        assert!(!yaml.contains("filter"));
        let parsed: Surcharge = serde_yaml::from_str("amount: '2.20'").unwrap();
        assert_eq!(parsed, Surcharge::flat(money(dec!(2.20))));
    }
}
