//! # Shipper and Quote
//!
//! A [`Shipper`] is one shipping option offered to a customer: a SingPost
//! service code bound to the rate registry. Quoting a cart for a
//! destination produces a [`Quote`].
//!
//! ## States
//!
//! ```text
//! Shipper ──quote(cart, destination)──▶ Quote
//!                                         ├─ invalid:   no tier for destination / service
//!                                         ├─ uncostable: tier found, cart cannot be posted
//!                                         └─ costed:    total = Σ parcel postage + surcharge
//! ```
//!
//! Cost exists only on a `Quote`. A `Shipper` that has not seen a cart has
//! no cost method to call.
//!
//! ## Costing
//!
//! 1. Resolve the service code (ignoring `_REGISTERED`) to a tier, and a
//!    zoned tier to the zone serving the destination.
//! 2. Partition the cart's shippable units under the tier's ceiling.
//! 3. Price each parcel; a parcel no row prices is charged the table's
//!    lowest cost.
//! 4. Add the registered-mail surcharge, if the code asks for one.

use std::fmt;

use singpost_core::{cart_weight, CartLine, Destination, Money, Weight};
use singpost_rates::{RateRegistry, RateTable, ResolvedTier, ServiceCode, Shipment, Uncostable};

use crate::config::ShipperConfig;

/// Identifier the storefront registers this shipping module under.
pub const SHIPPER_ID: &str = "SingPost";

/// A SingPost shipping option.
#[derive(Debug, Clone)]
pub struct Shipper<'r> {
    registry: &'r RateRegistry,
    service: ServiceCode,
    config: ShipperConfig,
}

impl<'r> Shipper<'r> {
    /// Offer `service` (e.g. `LOCAL_REGISTERED`) from `registry`.
    pub fn new(registry: &'r RateRegistry, service: &str) -> Self {
        Self {
            registry,
            service: ServiceCode::parse(service),
            config: ShipperConfig::default(),
        }
    }

    /// Replace the display configuration.
    pub fn with_config(mut self, config: ShipperConfig) -> Self {
        self.config = config;
        self
    }

    /// One shipper per selectable code in `registry`.
    pub fn all(registry: &'r RateRegistry) -> Vec<Self> {
        Self::all_with_config(registry, &ShipperConfig::default())
    }

    /// One shipper per selectable code in `registry`, each labelled by
    /// `config`.
    pub fn all_with_config(registry: &'r RateRegistry, config: &ShipperConfig) -> Vec<Self> {
        registry
            .service_codes()
            .into_iter()
            .map(|service| Self {
                registry,
                service,
                config: config.clone(),
            })
            .collect()
    }

    /// Module identifier.
    pub fn id(&self) -> &'static str {
        SHIPPER_ID
    }

    /// The selected service.
    pub fn service_code(&self) -> &ServiceCode {
        &self.service
    }

    /// Whether the service has a rate table.
    pub fn is_implemented(&self) -> bool {
        self.registry.tier(&self.service).is_some()
    }

    /// Label shown when the customer picks a shipping option.
    pub fn description(&self) -> String {
        let label = self.config.service_label(self.service.base());
        if self.service.is_registered() {
            format!("{} {} {}", self.config.carrier, label, self.config.registered_label)
        } else {
            format!("{} {}", self.config.carrier, label)
        }
    }

    /// Delivery service label.
    pub fn method(&self) -> &str {
        &self.config.method
    }

    /// Expected delivery time.
    pub fn expected_delivery(&self) -> &str {
        &self.config.expected_delivery
    }

    /// Price `cart` for delivery to `destination`.
    pub fn quote<'c, L: CartLine>(&self, cart: &'c [L], destination: &Destination) -> Quote<'c, L> {
        let _span =
            tracing::debug_span!("quote", service = %self.service, destination = %destination)
                .entered();
        let weight = cart_weight(cart);
        let (resolved, zone, outcome) = match self.registry.resolve(&self.service, destination) {
            Ok(tier) => (
                true,
                tier.zone().map(str::to_string),
                self.price(tier, cart, destination),
            ),
            Err(reason) => (false, None, Err(reason)),
        };
        Quote {
            service: self.service.clone(),
            destination: destination.clone(),
            weight,
            resolved,
            zone,
            outcome,
        }
    }

    fn price<'c, L: CartLine>(
        &self,
        tier: ResolvedTier<'_>,
        cart: &'c [L],
        destination: &Destination,
    ) -> Result<Costing<'c, L>, Uncostable> {
        let shipments = tier.partition(cart)?;
        if shipments.is_empty() {
            tracing::debug!("cart has nothing to post");
            return Err(Uncostable::EmptyCart);
        }
        tracing::debug!(shipments = shipments.len(), "cart partitioned");

        let shipments: Vec<CostedShipment<'c, L>> = shipments
            .into_iter()
            .map(|shipment| match tier.cost_for_weight(shipment.weight()) {
                Some(cost) => CostedShipment {
                    shipment,
                    cost,
                    lowest_cost_applied: false,
                },
                None => CostedShipment {
                    shipment,
                    cost: tier.lowest_cost(),
                    lowest_cost_applied: true,
                },
            })
            .collect();
        let surcharge = self.registry.surcharge_for(&self.service, destination);
        let (postage, total) = Money::checked_sum(shipments.iter().map(CostedShipment::cost))
            .and_then(|postage| Some((postage, postage.checked_add(surcharge)?)))
            .ok_or_else(|| {
                tracing::error!(service = %self.service, "postage overflows");
                Uncostable::CostOverflow {
                    service: self.service.to_string(),
                }
            })?;
        tracing::debug!(postage = %postage, surcharge = %surcharge, total = %total, "quote costed");
        Ok(Costing {
            shipments,
            postage,
            surcharge,
            total,
        })
    }
}

impl fmt::Display for Shipper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", SHIPPER_ID, self.service, self.description())
    }
}

/// One priced parcel.
#[derive(Debug)]
pub struct CostedShipment<'c, L> {
    shipment: Shipment<'c, L>,
    cost: Money,
    lowest_cost_applied: bool,
}

impl<'c, L> CostedShipment<'c, L> {
    /// The packed cart lines and unit counts.
    pub fn shipment(&self) -> &Shipment<'c, L> {
        &self.shipment
    }

    /// Parcel weight.
    pub fn weight(&self) -> Weight {
        self.shipment.weight()
    }

    /// Parcel postage.
    pub fn cost(&self) -> Money {
        self.cost
    }

    /// Whether no row priced the parcel and the lowest cost was charged.
    pub fn lowest_cost_applied(&self) -> bool {
        self.lowest_cost_applied
    }
}

#[derive(Debug)]
struct Costing<'c, L> {
    shipments: Vec<CostedShipment<'c, L>>,
    postage: Money,
    surcharge: Money,
    total: Money,
}

/// The result of quoting one cart for one destination.
#[derive(Debug)]
pub struct Quote<'c, L> {
    service: ServiceCode,
    destination: Destination,
    weight: Option<Weight>,
    resolved: bool,
    zone: Option<String>,
    outcome: Result<Costing<'c, L>, Uncostable>,
}

impl<'c, L> Quote<'c, L> {
    /// Whether the service has a table serving the destination.
    pub fn valid(&self) -> bool {
        self.resolved
    }

    /// Total postage including any surcharge; `None` when the order
    /// cannot be shipped.
    pub fn cost(&self) -> Option<Money> {
        self.outcome.as_ref().ok().map(|costing| costing.total)
    }

    /// Why the order cannot be shipped.
    pub fn reason(&self) -> Option<&Uncostable> {
        self.outcome.as_ref().err()
    }

    /// Total shippable weight of the cart; `None` when it overflows.
    pub fn weight(&self) -> Option<Weight> {
        self.weight
    }

    /// Postage before the surcharge.
    pub fn postage(&self) -> Option<Money> {
        self.outcome.as_ref().ok().map(|costing| costing.postage)
    }

    /// Registered-mail surcharge included in [`Quote::cost`].
    pub fn surcharge(&self) -> Option<Money> {
        self.outcome.as_ref().ok().map(|costing| costing.surcharge)
    }

    /// Priced parcels; empty when the order cannot be shipped.
    pub fn shipments(&self) -> &[CostedShipment<'c, L>] {
        match &self.outcome {
            Ok(costing) => &costing.shipments,
            Err(_) => &[],
        }
    }

    /// Zone that priced the order, for zoned services.
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// The quoted service.
    pub fn service(&self) -> &ServiceCode {
        &self.service
    }

    /// The quoted destination.
    pub fn destination(&self) -> &Destination {
        &self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use singpost_core::LineItem;
    use singpost_rates::build_singpost_registry;

    fn money(v: rust_decimal::Decimal) -> Money {
        Money::new(v).unwrap()
    }

    fn sg() -> Destination {
        Destination::new("SG", "AS").unwrap()
    }

    fn blouse(quantity: u32) -> LineItem {
        LineItem::new("shoulder-blouse", Weight::from(315), quantity)
    }

    #[test]
    fn identity_and_labels() {
        let registry = build_singpost_registry().unwrap();
        let shipper = Shipper::new(&registry, "local_registered");
        assert_eq!(shipper.id(), "SingPost");
        assert_eq!(shipper.service_code().to_string(), "LOCAL_REGISTERED");
        assert_eq!(shipper.description(), "SingPost Local Mail (Registered)");
        assert_eq!(shipper.method(), "SingPost Mail");
        assert_eq!(shipper.expected_delivery(), "3 - 7 business days");
        assert!(shipper.to_string().starts_with("SingPost LOCAL_REGISTERED"));
    }

    #[test]
    fn custom_config() {
        let registry = build_singpost_registry().unwrap();
        let config = ShipperConfig::from_yaml_str("carrier: Singapore Post\nmethod: Post\n").unwrap();
        let shipper = Shipper::new(&registry, "AIR").with_config(config);
        assert_eq!(shipper.description(), "Singapore Post Airmail");
        assert_eq!(shipper.method(), "Post");
    }

    #[test]
    fn all_offers_every_code() {
        let registry = build_singpost_registry().unwrap();
        let shippers = Shipper::all(&registry);
        assert_eq!(shippers.len(), registry.service_codes().len());
        assert_eq!(shippers.iter().filter(|s| s.is_implemented()).count(), 6);
    }

    #[test]
    fn all_with_config_labels_every_shipper() {
        let registry = build_singpost_registry().unwrap();
        let config = ShipperConfig::from_yaml_str("carrier: Singapore Post\nmethod: Post\n").unwrap();
        let shippers = Shipper::all_with_config(&registry, &config);
        assert_eq!(shippers.len(), registry.service_codes().len());
        for shipper in &shippers {
            assert!(shipper.description().starts_with("Singapore Post "), "{shipper}");
            assert_eq!(shipper.method(), "Post");
        }
    }

    #[test]
    fn overflowing_cart_is_uncostable() {
        let registry = build_singpost_registry().unwrap();
        let cart = vec![LineItem::with_raw_weight(
            "crate",
            "79228162514264337593543950335",
            2,
        )];
        let quote = Shipper::new(&registry, "LOCAL").quote(&cart, &sg());
        assert!(quote.valid());
        assert_eq!(quote.weight(), None);
        assert_eq!(quote.cost(), None);
        assert!(matches!(quote.reason(), Some(Uncostable::WeightOverflow { .. })));
    }

    #[test]
    fn quote_exposes_parcels() {
        let registry = build_singpost_registry().unwrap();
        let cart = vec![blouse(9)];
        let quote = Shipper::new(&registry, "LOCAL").quote(&cart, &sg());
        let parcels: Vec<(Weight, Money)> = quote
            .shipments()
            .iter()
            .map(|s| (s.weight(), s.cost()))
            .collect();
        assert_eq!(
            parcels,
            vec![
                (Weight::from(1890), money(dec!(3.35))),
                (Weight::from(945), money(dec!(2.55))),
            ]
        );
        assert_eq!(quote.shipments()[0].shipment().len(), 6);
        assert_eq!(quote.surcharge(), Some(Money::ZERO));
        assert_eq!(quote.cost(), Some(money(dec!(5.90))));
    }

    #[test]
    fn light_parcel_is_charged_lowest_cost() {
        let registry = build_singpost_registry().unwrap();
        let cart = vec![LineItem::new("postcard", Weight::from(20), 1)];
        let quote = Shipper::new(&registry, "LOCAL").quote(&cart, &sg());
        assert_eq!(quote.cost(), Some(money(dec!(0.50))));
        assert!(quote.shipments()[0].lowest_cost_applied());
    }

    #[test]
    fn empty_cart_is_valid_but_uncostable() {
        let registry = build_singpost_registry().unwrap();
        let cart = vec![LineItem::new("e-voucher", Weight::from(0), 1).not_shippable()];
        let quote = Shipper::new(&registry, "LOCAL").quote(&cart, &sg());
        assert!(quote.valid());
        assert_eq!(quote.cost(), None);
        assert_eq!(quote.reason(), Some(&Uncostable::EmptyCart));
        assert!(quote.shipments().is_empty());
    }

    #[test]
    fn zoned_quote_reports_zone() {
        let registry = build_singpost_registry().unwrap();
        let cart = vec![LineItem::new("letter", Weight::from(60), 1)];
        let my = Destination::new("MY", "AS").unwrap();
        let quote = Shipper::new(&registry, "AIR").quote(&cart, &my);
        assert_eq!(quote.zone(), Some("zone-1"));
        assert_eq!(quote.cost(), Some(money(dec!(1.05))));
        assert_eq!(quote.destination(), &my);
        assert_eq!(quote.service().base(), "AIR");
    }
}
