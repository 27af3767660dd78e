//! # Cost Tiers
//!
//! Maps the total weight of one parcel to its postage.
//!
//! Three shapes of table are in use:
//!
//! | Variant | Ceiling per parcel | Beyond the last row |
//! |---------|--------------------|---------------------|
//! | [`ExplicitTiers`] | heaviest row | not costable |
//! | [`ImplicitTiers`] | configured cap | `+ step_cost` per started `step_weight` |
//! | [`ZonedTierSet`] | shared cap | per zone, first matching zone wins |
//!
//! The common capability lives in the [`RateTable`] trait. `ImplicitTiers`
//! embeds an `ExplicitTiers` and delegates the row scan to it instead of
//! specializing it.
//!
//! ## Row Scan
//!
//! A row `(ceiling_i, cost_i)` matches weights in the half-open interval
//! `(ceiling_{i-1}, ceiling_i]`. The first row has no lower neighbour and so
//! matches nothing on its own: weights at or below the first ceiling return
//! `None` from [`RateTable::cost_for_weight`] and the caller charges
//! [`RateTable::lowest_cost`] instead.

use serde::{Deserialize, Serialize};
use singpost_core::{CartLine, CountryFilter, Destination, Money, Weight};

use crate::error::{RateError, RateResult, Uncostable};
use crate::partition::{partition, Shipment};

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One bracket of a rate table: parcels up to `weight_ceiling` cost `cost`.
///
/// Serialized as a `[weight, cost]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Weight, Money)", into = "(Weight, Money)")]
pub struct TierRow {
    /// Inclusive upper bound of the bracket, in grams.
    pub weight_ceiling: Weight,
    /// Postage for the bracket.
    pub cost: Money,
}

impl TierRow {
    /// Create a row.
    pub fn new(weight_ceiling: Weight, cost: Money) -> Self {
        Self {
            weight_ceiling,
            cost,
        }
    }
}

impl From<(Weight, Money)> for TierRow {
    fn from((weight_ceiling, cost): (Weight, Money)) -> Self {
        Self::new(weight_ceiling, cost)
    }
}

impl From<TierRow> for (Weight, Money) {
    fn from(row: TierRow) -> Self {
        (row.weight_ceiling, row.cost)
    }
}

/// Extrapolation beyond the heaviest row: every started `step_weight`
/// adds `step_cost`.
///
/// Serialized as a `[weight, cost]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Weight, Money)", into = "(Weight, Money)")]
pub struct ImpliedStep {
    /// Weight covered by one step.
    pub step_weight: Weight,
    /// Postage added per step.
    pub step_cost: Money,
}

impl ImpliedStep {
    /// Create a step.
    pub fn new(step_weight: Weight, step_cost: Money) -> Self {
        Self {
            step_weight,
            step_cost,
        }
    }
}

impl From<(Weight, Money)> for ImpliedStep {
    fn from((step_weight, step_cost): (Weight, Money)) -> Self {
        Self::new(step_weight, step_cost)
    }
}

impl From<ImpliedStep> for (Weight, Money) {
    fn from(step: ImpliedStep) -> Self {
        (step.step_weight, step.step_cost)
    }
}

// ---------------------------------------------------------------------------
// RateTable
// ---------------------------------------------------------------------------

/// What every concrete tier can answer about a single parcel.
pub trait RateTable: std::fmt::Debug + Send + Sync {
    /// Cost of the cheapest row.
    fn lowest_cost(&self) -> Money;

    /// The row with the largest ceiling.
    fn heaviest_weight_tier(&self) -> TierRow;

    /// Ceiling of [`RateTable::heaviest_weight_tier`].
    fn heaviest_weight(&self) -> Weight {
        self.heaviest_weight_tier().weight_ceiling
    }

    /// The most a single parcel may weigh under this table.
    fn maximum_item_weight(&self) -> Weight;

    /// Postage for a parcel of `weight`, or `None` when no row applies or
    /// the postage overflows.
    fn cost_for_weight(&self, weight: Weight) -> Option<Money>;
}

// ---------------------------------------------------------------------------
// ExplicitTiers
// ---------------------------------------------------------------------------

/// A closed table: parcels heavier than the heaviest row cannot be costed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitTiers {
    filter: CountryFilter,
    rows: Vec<TierRow>,
    heaviest: TierRow,
    lowest_cost: Money,
}

impl ExplicitTiers {
    /// Build a table from rows in any order.
    ///
    /// # Errors
    ///
    /// [`RateError::EmptyTable`] without rows,
    /// [`RateError::DuplicateCeiling`] when two rows share a ceiling.
    pub fn new(rows: impl IntoIterator<Item = TierRow>) -> RateResult<Self> {
        let mut rows: Vec<TierRow> = rows.into_iter().collect();
        rows.sort_by_key(|row| row.weight_ceiling);
        if let Some(pair) = rows
            .windows(2)
            .find(|pair| pair[0].weight_ceiling == pair[1].weight_ceiling)
        {
            return Err(RateError::DuplicateCeiling {
                ceiling: pair[0].weight_ceiling,
            });
        }
        let heaviest = *rows.last().ok_or(RateError::EmptyTable)?;
        let lowest_cost = rows.iter().map(|row| row.cost).min().unwrap_or(heaviest.cost);
        Ok(Self {
            filter: CountryFilter::unrestricted(),
            rows,
            heaviest,
            lowest_cost,
        })
    }

    /// Restrict the destinations this table serves.
    pub fn with_filter(mut self, filter: CountryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Destinations served.
    pub fn filter(&self) -> &CountryFilter {
        &self.filter
    }

    /// Rows in ascending ceiling order.
    pub fn rows(&self) -> &[TierRow] {
        &self.rows
    }

    /// Cost of the row whose `(previous ceiling, ceiling]` bracket holds
    /// `weight`.
    pub(crate) fn interval_cost(&self, weight: Weight) -> Option<Money> {
        self.rows
            .windows(2)
            .find(|pair| pair[0].weight_ceiling < weight && weight <= pair[1].weight_ceiling)
            .map(|pair| pair[1].cost)
    }
}

impl RateTable for ExplicitTiers {
    fn lowest_cost(&self) -> Money {
        self.lowest_cost
    }

    fn heaviest_weight_tier(&self) -> TierRow {
        self.heaviest
    }

    fn maximum_item_weight(&self) -> Weight {
        self.heaviest.weight_ceiling
    }

    fn cost_for_weight(&self, weight: Weight) -> Option<Money> {
        if weight > self.maximum_item_weight() {
            return None;
        }
        self.interval_cost(weight)
    }
}

// ---------------------------------------------------------------------------
// ImplicitTiers
// ---------------------------------------------------------------------------

/// An explicit table extended past its heaviest row by a fixed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitTiers {
    explicit: ExplicitTiers,
    maximum_item_weight: Weight,
    step: ImpliedStep,
}

impl ImplicitTiers {
    /// Extend `explicit` up to `maximum_item_weight` using `step`.
    ///
    /// # Errors
    ///
    /// [`RateError::InvalidStep`] for a zero step weight,
    /// [`RateError::InvalidMaximumWeight`] for a zero ceiling.
    pub fn new(
        explicit: ExplicitTiers,
        maximum_item_weight: Weight,
        step: ImpliedStep,
    ) -> RateResult<Self> {
        if step.step_weight.is_zero() {
            return Err(RateError::InvalidStep {
                step_weight: step.step_weight,
            });
        }
        if maximum_item_weight.is_zero() {
            return Err(RateError::InvalidMaximumWeight {
                maximum_item_weight,
            });
        }
        Ok(Self {
            explicit,
            maximum_item_weight,
            step,
        })
    }

    /// The explicit rows this table extends.
    pub fn explicit(&self) -> &ExplicitTiers {
        &self.explicit
    }

    /// Destinations served.
    pub fn filter(&self) -> &CountryFilter {
        self.explicit.filter()
    }

    /// The extrapolation step.
    pub fn step(&self) -> ImpliedStep {
        self.step
    }
}

impl RateTable for ImplicitTiers {
    fn lowest_cost(&self) -> Money {
        self.explicit.lowest_cost()
    }

    fn heaviest_weight_tier(&self) -> TierRow {
        self.explicit.heaviest_weight_tier()
    }

    fn maximum_item_weight(&self) -> Weight {
        self.maximum_item_weight
    }

    fn cost_for_weight(&self, weight: Weight) -> Option<Money> {
        let heaviest = self.heaviest_weight_tier();
        if weight <= heaviest.weight_ceiling {
            return self.explicit.interval_cost(weight);
        }
        let steps = weight
            .excess_over(heaviest.weight_ceiling)
            .steps_of(self.step.step_weight)?;
        heaviest.cost.checked_add(self.step.step_cost.times(steps)?)
    }
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// An implicit table scoped to a set of destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    name: String,
    tiers: ImplicitTiers,
}

impl Zone {
    /// Build a zone. Its per-parcel ceiling is replaced by the owning
    /// [`ZonedTierSet`]'s cap.
    pub fn new(
        name: impl Into<String>,
        filter: CountryFilter,
        rows: impl IntoIterator<Item = TierRow>,
        step: ImpliedStep,
    ) -> RateResult<Self> {
        let explicit = ExplicitTiers::new(rows)?.with_filter(filter);
        let ceiling = explicit.heaviest_weight();
        Ok(Self {
            name: name.into(),
            tiers: ImplicitTiers::new(explicit, ceiling, step)?,
        })
    }

    /// Zone label, e.g. `zone-1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Destinations in this zone.
    pub fn filter(&self) -> &CountryFilter {
        self.tiers.filter()
    }

    /// The zone's table.
    pub fn tiers(&self) -> &ImplicitTiers {
        &self.tiers
    }
}

impl RateTable for Zone {
    fn lowest_cost(&self) -> Money {
        self.tiers.lowest_cost()
    }

    fn heaviest_weight_tier(&self) -> TierRow {
        self.tiers.heaviest_weight_tier()
    }

    fn maximum_item_weight(&self) -> Weight {
        self.tiers.maximum_item_weight()
    }

    fn cost_for_weight(&self, weight: Weight) -> Option<Money> {
        self.tiers.cost_for_weight(weight)
    }
}

/// Ordered zones sharing one per-parcel ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedTierSet {
    zones: Vec<Zone>,
    maximum_item_weight: Weight,
}

impl ZonedTierSet {
    /// Build a zone set. Declaration order is match order.
    pub fn new(maximum_item_weight: Weight, zones: Vec<Zone>) -> RateResult<Self> {
        if zones.is_empty() {
            return Err(RateError::NoZones);
        }
        if maximum_item_weight.is_zero() {
            return Err(RateError::InvalidMaximumWeight {
                maximum_item_weight,
            });
        }
        let zones = zones
            .into_iter()
            .map(|mut zone| {
                zone.tiers.maximum_item_weight = maximum_item_weight;
                zone
            })
            .collect();
        Ok(Self {
            zones,
            maximum_item_weight,
        })
    }

    /// The first zone whose filter accepts `destination`.
    pub fn select_zone(&self, destination: &Destination) -> Option<&Zone> {
        self.zones
            .iter()
            .find(|zone| zone.filter().accepts(destination))
    }

    /// Zones in match order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Shared per-parcel ceiling.
    pub fn maximum_item_weight(&self) -> Weight {
        self.maximum_item_weight
    }
}

// ---------------------------------------------------------------------------
// CostTier
// ---------------------------------------------------------------------------

/// The table behind one postal service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostTier {
    /// Closed table.
    Explicit(ExplicitTiers),
    /// Table with stepped extrapolation.
    Implicit(ImplicitTiers),
    /// Destination-dependent tables.
    Zoned(ZonedTierSet),
}

/// Why [`CostTier::resolve`] found no table for a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierMiss {
    /// The tier's filter rejects the destination.
    Excluded,
    /// No zone accepts the destination.
    NoZone,
}

impl CostTier {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Explicit(_) => "explicit",
            Self::Implicit(_) => "implicit",
            Self::Zoned(_) => "zoned",
        }
    }

    /// Per-parcel ceiling of the tier (shared cap for zoned sets).
    pub fn maximum_item_weight(&self) -> Weight {
        match self {
            Self::Explicit(t) => t.maximum_item_weight(),
            Self::Implicit(t) => t.maximum_item_weight(),
            Self::Zoned(t) => t.maximum_item_weight(),
        }
    }

    /// Narrow this tier to the concrete table serving `destination`.
    pub fn resolve(&self, destination: &Destination) -> Result<ResolvedTier<'_>, TierMiss> {
        match self {
            Self::Explicit(t) if t.filter().accepts(destination) => Ok(ResolvedTier::new(t, None)),
            Self::Implicit(t) if t.filter().accepts(destination) => Ok(ResolvedTier::new(t, None)),
            Self::Explicit(_) | Self::Implicit(_) => Err(TierMiss::Excluded),
            Self::Zoned(set) => set
                .select_zone(destination)
                .map(|zone| ResolvedTier::new(zone, Some(zone.name())))
                .ok_or(TierMiss::NoZone),
        }
    }
}

/// A tier narrowed to one destination: the table that actually prices
/// parcels, plus the zone it came from.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTier<'a> {
    table: &'a dyn RateTable,
    zone: Option<&'a str>,
}

impl<'a> ResolvedTier<'a> {
    fn new(table: &'a dyn RateTable, zone: Option<&'a str>) -> Self {
        Self { table, zone }
    }

    /// Name of the selected zone, for zoned tiers.
    pub fn zone(&self) -> Option<&'a str> {
        self.zone
    }

    /// Split `lines` into parcels no heavier than this table's ceiling.
    pub fn partition<'c, L: CartLine>(
        &self,
        lines: &'c [L],
    ) -> Result<Vec<Shipment<'c, L>>, Uncostable> {
        partition(lines, self.table.maximum_item_weight())
    }
}

impl RateTable for ResolvedTier<'_> {
    fn lowest_cost(&self) -> Money {
        self.table.lowest_cost()
    }

    fn heaviest_weight_tier(&self) -> TierRow {
        self.table.heaviest_weight_tier()
    }

    fn maximum_item_weight(&self) -> Weight {
        self.table.maximum_item_weight()
    }

    fn cost_for_weight(&self, weight: Weight) -> Option<Money> {
        self.table.cost_for_weight(weight)
    }
}
