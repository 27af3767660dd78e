//! # Built-in SingPost Rate Card
//!
//! The carrier's published tables, compiled in.
//!
//! | Service | Tier | Destinations | Ceiling |
//! |---------|------|--------------|---------|
//! | `LOCAL` | explicit | SG only | 2000 g (heaviest row) |
//! | `SURFACE` | implicit, +1.00 per 100 g | everywhere but SG | 2000 g |
//! | `AIR` | zoned | three zones, none covers SG | 2000 g |
//! | `SPEEDPOST` | none | | |
//! | `BULK_MAIL` | none | | |
//!
//! Registered variants add 2.20 per order, or 2.24 for deliveries within
//! Singapore.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use singpost_core::{ContinentCode, CountryCode, CountryFilter, Money, Weight};

use crate::error::RateResult;
use crate::registry::RateRegistry;
use crate::surcharge::{Surcharge, SurchargeSchedule};
use crate::tier::{CostTier, ExplicitTiers, ImpliedStep, ImplicitTiers, TierRow, Zone, ZonedTierSet};

/// Home country of the carrier.
pub const HOME_COUNTRY: &str = "SG";

/// Per-parcel ceiling for international mail, in grams.
pub const INTERNATIONAL_MAXIMUM_WEIGHT: u32 = 2000;

fn row(grams: u32, cost: Decimal) -> RateResult<TierRow> {
    Ok(TierRow::new(Weight::from(grams), Money::new(cost)?))
}

fn step(grams: u32, cost: Decimal) -> RateResult<ImpliedStep> {
    Ok(ImpliedStep::new(Weight::from(grams), Money::new(cost)?))
}

fn countries(codes: &[&str]) -> RateResult<Vec<CountryCode>> {
    Ok(CountryCode::parse_all(codes)?)
}

fn home_only() -> RateResult<CountryFilter> {
    Ok(CountryFilter::unrestricted().including(countries(&[HOME_COUNTRY])?))
}

fn abroad() -> RateResult<CountryFilter> {
    Ok(CountryFilter::unrestricted().excluding(countries(&[HOME_COUNTRY])?))
}

/// Non-standard local mail.
pub fn local_tiers() -> RateResult<CostTier> {
    let rows = vec![
        row(40, dec!(0.50))?,
        row(100, dec!(0.80))?,
        row(250, dec!(1.00))?,
        row(500, dec!(1.50))?,
        row(1000, dec!(2.55))?,
        row(2000, dec!(3.35))?,
    ];
    Ok(CostTier::Explicit(ExplicitTiers::new(rows)?.with_filter(home_only()?)))
}

/// Surface mail abroad.
pub fn surface_tiers() -> RateResult<CostTier> {
    let rows = vec![
        row(20, dec!(0.50))?,
        row(50, dec!(0.70))?,
        row(100, dec!(1.00))?,
    ];
    let explicit = ExplicitTiers::new(rows)?.with_filter(abroad()?);
    Ok(CostTier::Implicit(ImplicitTiers::new(
        explicit,
        Weight::from(INTERNATIONAL_MAXIMUM_WEIGHT),
        step(100, dec!(1.00))?,
    )?))
}

/// Airmail, priced by zone.
///
/// Malaysia and Brunei fall in both zone 1 and zone 2; zone 1 is declared
/// first and wins.
pub fn air_tiers() -> RateResult<CostTier> {
    let zone_1 = Zone::new(
        "zone-1",
        CountryFilter::unrestricted().including(countries(&["MY", "BN"])?),
        vec![row(20, dec!(0.65))?, row(50, dec!(0.90))?],
        step(10, dec!(0.15))?,
    )?;
    let zone_2 = Zone::new(
        "zone-2",
        abroad()?.on_continents(ContinentCode::parse_all(["AS", "OC"])?),
        vec![row(20, dec!(0.70))?, row(50, dec!(1.10))?],
        step(10, dec!(0.35))?,
    )?;
    let zone_3 = Zone::new(
        "zone-3",
        abroad()?,
        vec![row(20, dec!(1.10))?, row(50, dec!(2.00))?],
        step(10, dec!(0.50))?,
    )?;
    Ok(CostTier::Zoned(ZonedTierSet::new(
        Weight::from(INTERNATIONAL_MAXIMUM_WEIGHT),
        vec![zone_1, zone_2, zone_3],
    )?))
}

/// Registered-mail fees: a general rate, then the local override.
pub fn registered_surcharges() -> RateResult<SurchargeSchedule> {
    Ok(SurchargeSchedule::new(vec![
        Surcharge::flat(Money::new(dec!(2.20))?),
        Surcharge::for_destinations(Money::new(dec!(2.24))?, home_only()?),
    ]))
}

/// Build the complete SingPost registry.
pub fn build_singpost_registry() -> RateResult<RateRegistry> {
    Ok(RateRegistry::new()
        .with_service("LOCAL", local_tiers()?)
        .with_service("SURFACE", surface_tiers()?)
        .with_service("AIR", air_tiers()?)
        .with_placeholder("SPEEDPOST")
        .with_placeholder("BULK_MAIL")
        .with_surcharges(registered_surcharges()?))
}
