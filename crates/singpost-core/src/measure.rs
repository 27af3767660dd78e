//! # Weight and Money
//!
//! Exact-decimal newtypes for shipment weight (grams) and postage.
//!
//! Rate tables compare weights against tier ceilings with `<=` and `>`,
//! so a value that drifts by one ulp lands in the wrong tier. Both types
//! therefore wrap `rust_decimal::Decimal` and refuse floats on the
//! serialization boundary as well: YAML and JSON inputs must carry
//! weights and amounts as strings or integers.
//!
//! ## Lenient Parsing
//!
//! [`Weight::parse_lenient`] turns malformed catalogue data into a zero
//! weight instead of failing, and reports every occurrence at `warn`
//! level.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Number of decimal places money amounts are stored with.
pub const MONEY_SCALE: u32 = 2;

// ---------------------------------------------------------------------------
// Weight
// ---------------------------------------------------------------------------

/// A non-negative weight in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Weight(Decimal);

impl Weight {
    /// The empty weight.
    pub const ZERO: Weight = Weight(Decimal::ZERO);

    /// Create a weight, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeWeight`] for values below zero.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO {
            return Err(ValidationError::NegativeWeight(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse a catalogue weight, falling back to zero when the text is not
    /// a non-negative decimal.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.parse::<Weight>() {
            Ok(weight) => weight,
            Err(err) => {
                tracing::warn!(raw = %raw, error = %err, "malformed weight, treating as zero");
                Self::ZERO
            }
        }
    }

    /// Access the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether this weight is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The amount by which `self` exceeds `floor`, or zero when it does not.
    pub fn excess_over(self, floor: Weight) -> Weight {
        if self > floor {
            Weight(self.0 - floor.0)
        } else {
            Weight::ZERO
        }
    }

    /// How many `step`-sized increments are needed to cover this weight,
    /// counting any partial increment as a whole one.
    ///
    /// A zero `step` yields zero increments; callers validate steps at
    /// construction. `None` when the quotient does not fit a decimal.
    pub fn steps_of(self, step: Weight) -> Option<Decimal> {
        if step.is_zero() {
            return Some(Decimal::ZERO);
        }
        self.0.checked_div(step.0).map(|q| q.ceil())
    }

    /// How many whole `unit`s fit in this weight, capped at `limit`.
    /// A zero `unit` always fits `limit` times.
    pub fn fit_count(self, unit: Weight, limit: u32) -> u32 {
        if unit.is_zero() {
            return limit;
        }
        self.0
            .checked_div(unit.0)
            .and_then(|q| q.floor().to_u32())
            .map_or(limit, |fits| fits.min(limit))
    }

    /// `self + rhs`, or `None` on overflow.
    pub fn checked_add(self, rhs: Weight) -> Option<Weight> {
        self.0.checked_add(rhs.0).map(Weight)
    }

    /// `self * quantity`, or `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Weight> {
        self.0.checked_mul(Decimal::from(quantity)).map(Weight)
    }

    /// Sum of `weights`, or `None` on overflow.
    pub fn checked_sum(weights: impl IntoIterator<Item = Weight>) -> Option<Weight> {
        weights
            .into_iter()
            .try_fold(Weight::ZERO, |acc, w| acc.checked_add(w))
    }
}

impl From<u32> for Weight {
    fn from(grams: u32) -> Self {
        Self(Decimal::from(grams))
    }
}

impl FromStr for Weight {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| ValidationError::InvalidDecimal(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(DecimalVisitor)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// A non-negative postage amount, stored at [`MONEY_SCALE`] decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create an amount, rounding half away from zero to [`MONEY_SCALE`]
    /// places.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeMoney`] for values below zero.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO {
            return Err(ValidationError::NegativeMoney(value.to_string()));
        }
        Ok(Self::rounded(value))
    }

    fn rounded(value: Decimal) -> Self {
        let mut scaled =
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        scaled.rescale(MONEY_SCALE);
        Self(scaled)
    }

    /// Access the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Multiply by a non-negative count of units, or `None` on overflow.
    pub fn times(self, count: Decimal) -> Option<Money> {
        self.0.checked_mul(count.max(Decimal::ZERO)).map(Self::rounded)
    }

    /// `self + rhs`, or `None` on overflow.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Self::rounded)
    }

    /// Sum of `amounts`, or `None` on overflow.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| ValidationError::InvalidDecimal(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = deserializer.deserialize_any(DecimalVisitor)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Float-rejecting decimal visitor
// ---------------------------------------------------------------------------

struct DecimalVisitor;

impl<'de> de::Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        v.trim()
            .parse::<Decimal>()
            .map_err(|_| E::custom(ValidationError::InvalidDecimal(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        Err(E::custom(format!(
            "float values are not permitted for weights or money; use a string or integer: {v}"
        )))
    }
}
