//! # Cart Lines
//!
//! The shopping cart belongs to the host storefront. The engine sees it
//! only through [`CartLine`]: a shippability flag, a unit weight and a
//! quantity. Nothing here mutates a cart.

use serde::{Deserialize, Serialize};

use crate::measure::Weight;

/// Read-only view of one cart line.
pub trait CartLine {
    /// Identity used in diagnostics (product slug, SKU, ...).
    fn label(&self) -> &str;

    /// Whether the product is a physical good that needs posting.
    fn is_shippable(&self) -> bool;

    /// Weight of a single unit in grams.
    fn unit_weight(&self) -> Weight;

    /// Number of units on the line.
    fn quantity(&self) -> u32;

    /// Shippable weight of the whole line, or `None` when it overflows.
    fn line_weight(&self) -> Option<Weight> {
        if self.is_shippable() {
            self.unit_weight().checked_mul(self.quantity())
        } else {
            Some(Weight::ZERO)
        }
    }
}

/// Total shippable weight of a cart, or `None` when it overflows.
pub fn cart_weight<L: CartLine>(lines: &[L]) -> Option<Weight> {
    lines
        .iter()
        .try_fold(Weight::ZERO, |acc, line| acc.checked_add(line.line_weight()?))
}

/// A plain cart line, for hosts without their own line type and for tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identity.
    pub label: String,
    /// Weight of one unit.
    pub unit_weight: Weight,
    /// Units ordered.
    pub quantity: u32,
    /// Whether the product needs posting.
    #[serde(default = "default_shippable")]
    pub shippable: bool,
}

fn default_shippable() -> bool {
    true
}

impl LineItem {
    /// A shippable line.
    pub fn new(label: impl Into<String>, unit_weight: Weight, quantity: u32) -> Self {
        Self {
            label: label.into(),
            unit_weight,
            quantity,
            shippable: true,
        }
    }

    /// A shippable line whose weight comes from untrusted catalogue text.
    ///
    /// Malformed weights become zero (see [`Weight::parse_lenient`]).
    pub fn with_raw_weight(label: impl Into<String>, raw_weight: &str, quantity: u32) -> Self {
        let label = label.into();
        let unit_weight = {
            let _span = tracing::warn_span!("line_item", item = %label).entered();
            Weight::parse_lenient(raw_weight)
        };
        Self::new(label, unit_weight, quantity)
    }

    /// Mark the line as not needing postage (downloads, services).
    pub fn not_shippable(mut self) -> Self {
        self.shippable = false;
        self
    }
}

impl CartLine for LineItem {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_shippable(&self) -> bool {
        self.shippable
    }

    fn unit_weight(&self) -> Weight {
        self.unit_weight
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl<T: CartLine + ?Sized> CartLine for &T {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn is_shippable(&self) -> bool {
        (**self).is_shippable()
    }

    fn unit_weight(&self) -> Weight {
        (**self).unit_weight()
    }

    fn quantity(&self) -> u32 {
        (**self).quantity()
    }
}
