//! # Shipment Partitioning
//!
//! Splits a cart into parcels that each stay within a tier's per-parcel
//! ceiling.
//!
//! Units are packed greedily in cart order: a unit joins the open parcel
//! if it fits, otherwise the open parcel is sealed and a new one started.
//! A parcel that lands exactly on the ceiling is sealed at once. A unit
//! that alone outweighs the ceiling makes the whole cart unshippable under
//! that tier.
//!
//! Packing works on runs of identical units rather than on single units,
//! so a line's quantity never has to be expanded. When the whole cart
//! fits under the ceiling it becomes one parcel without any packing.
//!
//! Parcels hold references to cart lines. Nothing is copied or mutated.

use singpost_core::{CartLine, Weight};

use crate::error::Uncostable;

/// One physical parcel: runs of cart units packed into it.
#[derive(Debug)]
pub struct Shipment<'a, L> {
    lines: Vec<(&'a L, u32)>,
    weight: Weight,
}

impl<'a, L> Shipment<'a, L> {
    fn empty() -> Self {
        Self {
            lines: Vec::new(),
            weight: Weight::ZERO,
        }
    }

    fn push(&mut self, line: &'a L, count: u32, weight: Weight) {
        match self.lines.last_mut() {
            Some((last, n)) if std::ptr::eq(*last, line) => *n += count,
            _ => self.lines.push((line, count)),
        }
        self.weight = weight;
    }

    /// Cart lines in the parcel, each with the number of its units packed
    /// here.
    pub fn lines(&self) -> &[(&'a L, u32)] {
        &self.lines
    }

    /// Every unit in the parcel; a line appears once per packed unit.
    pub fn units(&self) -> impl Iterator<Item = &'a L> + '_ {
        self.lines
            .iter()
            .flat_map(|&(line, count)| std::iter::repeat(line).take(count as usize))
    }

    /// Total weight of the parcel.
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Number of units in the parcel.
    pub fn len(&self) -> u64 {
        self.lines.iter().map(|&(_, count)| u64::from(count)).sum()
    }

    /// Whether the parcel holds no units.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<L> Clone for Shipment<'_, L> {
    fn clone(&self) -> Self {
        Self {
            lines: self.lines.clone(),
            weight: self.weight,
        }
    }
}

fn overflow<L: CartLine>(line: &L) -> Uncostable {
    tracing::error!(item = %line.label(), "item weight overflows");
    Uncostable::WeightOverflow {
        item: line.label().to_string(),
    }
}

fn packed_weight(open: Weight, unit: Weight, count: u32) -> Option<Weight> {
    unit.checked_mul(count).and_then(|added| open.checked_add(added))
}

/// Pack the shippable units of `lines` into parcels of at most `ceiling`.
///
/// Returns an empty list when nothing in the cart needs posting.
///
/// # Errors
///
/// [`Uncostable::UnpartitionableItem`] when a single unit weighs more than
/// `ceiling`, [`Uncostable::WeightOverflow`] when a line or the cart total
/// exceeds the decimal range.
pub fn partition<'a, L: CartLine>(
    lines: &'a [L],
    ceiling: Weight,
) -> Result<Vec<Shipment<'a, L>>, Uncostable> {
    let shippable: Vec<&'a L> = lines
        .iter()
        .filter(|line| line.is_shippable() && line.quantity() > 0)
        .collect();
    if shippable.is_empty() {
        return Ok(Vec::new());
    }

    let mut total = Weight::ZERO;
    for &line in &shippable {
        total = line
            .line_weight()
            .and_then(|weight| total.checked_add(weight))
            .ok_or_else(|| overflow(line))?;
    }
    if total <= ceiling {
        return Ok(vec![Shipment {
            lines: shippable.into_iter().map(|line| (line, line.quantity())).collect(),
            weight: total,
        }]);
    }

    let mut shipments = Vec::new();
    let mut open = Shipment::empty();
    for line in shippable {
        let unit = line.unit_weight();
        if unit > ceiling {
            tracing::error!(
                item = %line.label(),
                weight = %unit,
                ceiling = %ceiling,
                "item exceeds the per-parcel ceiling, cart cannot be partitioned"
            );
            return Err(Uncostable::UnpartitionableItem {
                item: line.label().to_string(),
                weight: unit,
                ceiling,
            });
        }
        let mut remaining = line.quantity();
        while remaining > 0 {
            let mut fits = ceiling.excess_over(open.weight).fit_count(unit, remaining);
            let mut weight =
                packed_weight(open.weight, unit, fits).ok_or_else(|| overflow(line))?;
            // Quotient rounding can admit one unit too many.
            if weight > ceiling {
                fits -= 1;
                weight = packed_weight(open.weight, unit, fits).ok_or_else(|| overflow(line))?;
            }
            if fits == 0 {
                shipments.push(std::mem::replace(&mut open, Shipment::empty()));
                continue;
            }
            open.push(line, fits, weight);
            remaining -= fits;
            if open.weight == ceiling {
                shipments.push(std::mem::replace(&mut open, Shipment::empty()));
            }
        }
    }
    if !open.is_empty() {
        shipments.push(open);
    }
    Ok(shipments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use singpost_core::LineItem;

    fn blouse(quantity: u32) -> LineItem {
        LineItem::new("shoulder-blouse", Weight::from(315), quantity)
    }

    fn weights(shipments: &[Shipment<'_, LineItem>]) -> Vec<Weight> {
        shipments.iter().map(Shipment::weight).collect()
    }

    #[test]
    fn light_cart_is_one_parcel() {
        let cart = vec![blouse(3)];
        let shipments = partition(&cart, Weight::from(2000)).unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].len(), 3);
        assert_eq!(shipments[0].weight(), Weight::from(945));
    }

    #[test]
    fn heavy_cart_splits_greedily() {
        let cart = vec![blouse(9)];
        let shipments = partition(&cart, Weight::from(2000)).unwrap();
        assert_eq!(weights(&shipments), vec![Weight::from(1890), Weight::from(945)]);
        assert_eq!(shipments[0].len(), 6);
        assert_eq!(shipments[1].len(), 3);
    }

    #[test]
    fn exact_ceiling_seals_the_parcel() {
        let cart = vec![LineItem::new("brick", Weight::from(500), 5)];
        let shipments = partition(&cart, Weight::from(1000)).unwrap();
        assert_eq!(
            weights(&shipments),
            vec![Weight::from(1000), Weight::from(1000), Weight::from(500)]
        );
    }

    #[test]
    fn oversized_unit_fails() {
        let cart = vec![blouse(1), LineItem::new("anvil", Weight::from(2001), 1)];
        let err = partition(&cart, Weight::from(2000)).unwrap_err();
        assert_eq!(
            err,
            Uncostable::UnpartitionableItem {
                item: "anvil".to_string(),
                weight: Weight::from(2001),
                ceiling: Weight::from(2000),
            }
        );
    }

    #[test]
    fn oversized_unit_fails_even_when_alone() {
        let cart = vec![LineItem::new("anvil", Weight::from(2001), 1)];
        assert!(partition(&cart, Weight::from(2000)).is_err());
    }

    #[test]
    fn non_shippable_lines_are_left_out() {
        let cart = vec![
            blouse(1),
            LineItem::new("gift-card", Weight::from(5000), 1).not_shippable(),
        ];
        let shipments = partition(&cart, Weight::from(2000)).unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].lines().len(), 1);
        assert_eq!(shipments[0].lines()[0].0.label, "shoulder-blouse");
    }

    #[test]
    fn empty_cart_has_no_parcels() {
        let cart: Vec<LineItem> = Vec::new();
        assert!(partition(&cart, Weight::from(2000)).unwrap().is_empty());
        let zero_qty = vec![blouse(0)];
        assert!(partition(&zero_qty, Weight::from(2000)).unwrap().is_empty());
    }

    #[test]
    fn units_reference_cart_lines() {
        let cart = vec![blouse(9)];
        let shipments = partition(&cart, Weight::from(2000)).unwrap();
        assert!(shipments
            .iter()
            .flat_map(|shipment| shipment.units())
            .all(|unit| std::ptr::eq(unit, &cart[0])));
        assert_eq!(shipments[0].lines(), [(&cart[0], 6u32)].as_slice());
    }

    #[test]
    fn huge_quantity_of_weightless_units_is_not_expanded() {
        let cart = vec![blouse(1), LineItem::new("sticker", Weight::ZERO, u32::MAX)];
        let shipments = partition(&cart, Weight::from(2000)).unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].len(), u64::from(u32::MAX) + 1);
        assert_eq!(shipments[0].weight(), Weight::from(315));
    }

    #[test]
    fn huge_quantity_survives_splitting() {
        let cart = vec![blouse(9), LineItem::new("sticker", Weight::ZERO, u32::MAX)];
        let shipments = partition(&cart, Weight::from(2000)).unwrap();
        assert_eq!(weights(&shipments), vec![Weight::from(1890), Weight::from(945)]);
        assert_eq!(shipments[1].len(), 3 + u64::from(u32::MAX));
    }

    #[test]
    fn overflowing_line_is_reported() {
        let cart = vec![
            blouse(1),
            LineItem::with_raw_weight("crate", "79228162514264337593543950335", 2),
        ];
        let err = partition(&cart, Weight::from(2000)).unwrap_err();
        assert_eq!(
            err,
            Uncostable::WeightOverflow {
                item: "crate".to_string()
            }
        );
    }

    #[test]
    fn overflowing_total_is_reported() {
        let huge = Weight::parse_lenient("79228162514264337593543950335");
        let cart = vec![LineItem::new("crate", huge, 1), LineItem::new("pallet", huge, 1)];
        let err = partition(&cart, Weight::from(2000)).unwrap_err();
        assert!(matches!(err, Uncostable::WeightOverflow { item } if item == "pallet"));
    }

    /// Reference packing that walks one unit at a time.
    fn unit_by_unit(lines: &[LineItem], ceiling: Weight) -> Option<Vec<(Weight, u64)>> {
        let units: Vec<Weight> = lines
            .iter()
            .filter(|line| line.shippable)
            .flat_map(|line| std::iter::repeat(line.unit_weight).take(line.quantity as usize))
            .collect();
        let total = Weight::checked_sum(units.iter().copied())?;
        if units.is_empty() {
            return Some(Vec::new());
        }
        if total <= ceiling {
            return Some(vec![(total, units.len() as u64)]);
        }
        let mut parcels = Vec::new();
        let (mut weight, mut count) = (Weight::ZERO, 0u64);
        for unit in units {
            if unit > ceiling {
                return None;
            }
            if weight.checked_add(unit)? > ceiling {
                parcels.push((weight, count));
                (weight, count) = (Weight::ZERO, 0);
            }
            weight = weight.checked_add(unit)?;
            count += 1;
            if weight == ceiling {
                parcels.push((weight, count));
                (weight, count) = (Weight::ZERO, 0);
            }
        }
        if count > 0 {
            parcels.push((weight, count));
        }
        Some(parcels)
    }

    fn cart_strategy() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec((1u32..=2000, 0u32..6, any::<bool>()), 0..8).prop_map(|lines| {
            lines
                .into_iter()
                .enumerate()
                .map(|(i, (grams, quantity, shippable))| {
                    let line = LineItem::new(format!("item-{i}"), Weight::from(grams), quantity);
                    if shippable {
                        line
                    } else {
                        line.not_shippable()
                    }
                })
                .collect()
        })
    }

    proptest! {
        /// Partitioning neither loses nor invents weight.
        #[test]
        fn partition_preserves_total_weight(cart in cart_strategy()) {
            let shipments = partition(&cart, Weight::from(2000)).unwrap();
            let packed = Weight::checked_sum(shipments.iter().map(Shipment::weight));
            prop_assert_eq!(packed, singpost_core::cart_weight(&cart));
        }

        /// Packing runs of units gives the same parcels as packing units one by one.
        #[test]
        fn run_packing_matches_unit_packing(cart in cart_strategy(), ceiling in 1u32..=3000) {
            let ceiling = Weight::from(ceiling);
            let expected = unit_by_unit(&cart, ceiling);
            let actual = partition(&cart, ceiling)
                .ok()
                .map(|shipments| shipments.iter().map(|s| (s.weight(), s.len())).collect::<Vec<_>>());
            prop_assert_eq!(actual, expected);
        }

        /// No parcel exceeds the ceiling, and none is empty.
        #[test]
        fn partition_respects_ceiling(cart in cart_strategy()) {
            let ceiling = Weight::from(2000);
            for shipment in partition(&cart, ceiling).unwrap() {
                prop_assert!(shipment.weight() <= ceiling);
                prop_assert!(!shipment.is_empty());
            }
        }
    }
}
