//! # singpost-shipper — SingPost Shipping Option
//!
//! The storefront-facing side of the engine. A [`Shipper`] binds a service
//! code to a [`singpost_rates::RateRegistry`] and quotes carts.
//!
//! ```
//! use singpost_core::{Destination, LineItem, Weight};
//! use singpost_rates::build_singpost_registry;
//! use singpost_shipper::Shipper;
//!
//! let registry = build_singpost_registry()?;
//! let cart = vec![LineItem::new("shoulder-blouse", Weight::from(315), 3)];
//! let quote = Shipper::new(&registry, "LOCAL").quote(&cart, &Destination::new("SG", "AS")?);
//! assert!(quote.valid());
//! assert_eq!(quote.cost().map(|c| c.to_string()), Some("2.55".to_string()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A shipper has no cost until it has quoted a cart:
//!
//! ```compile_fail
//! use singpost_rates::build_singpost_registry;
//! use singpost_shipper::Shipper;
//!
//! let registry = build_singpost_registry().unwrap();
//! let shipper = Shipper::new(&registry, "LOCAL");
//! // ERROR: no method named `cost` found for `Shipper`
//! let _ = shipper.cost();
//! ```
//!
//! ## Crate Policy
//!
//! - Quoting never fails. Orders that cannot ship yield `cost() == None`
//!   with an [`singpost_rates::Uncostable`] reason.
//! - Shippers are per-request values; the registry they borrow is shared.
//! - The library installs no tracing subscriber.

pub mod config;
pub mod error;
pub mod shipper;

pub use config::ShipperConfig;
pub use error::{ShipperError, ShipperResult};
pub use shipper::{CostedShipment, Quote, Shipper, SHIPPER_ID};
