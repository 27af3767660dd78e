//! # singpost-rates — Rate Tiering and Shipment Partitioning
//!
//! Decides which table prices an order, how the cart is split into
//! parcels, and what each parcel costs.
//!
//! - **Tiers** (`tier.rs`): [`CostTier`] with its explicit, implicit and
//!   zoned variants behind the [`RateTable`] trait.
//!
//! - **Partitioning** (`partition.rs`): greedy packing of cart units into
//!   parcels under a tier's per-parcel ceiling.
//!
//! - **Surcharges** (`surcharge.rs`): registered-mail fees, last matching
//!   rule wins.
//!
//! - **Registry** (`registry.rs`, `service.rs`): service codes, the
//!   `_REGISTERED` suffix, and the immutable [`RateRegistry`].
//!
//! - **Rate cards** (`card.rs`, `singpost.rs`): the built-in SingPost
//!   tables and their YAML form.
//!
//! ## Crate Policy
//!
//! - Depends only on `singpost-core` internally.
//! - A registry is built once at startup and shared read-only afterwards.
//! - Per-order failures are [`Uncostable`] values, never panics.

pub mod card;
pub mod error;
pub mod partition;
pub mod registry;
pub mod service;
pub mod singpost;
pub mod surcharge;
pub mod tier;

pub use card::{RateCard, TierSpec, ZoneSpec};
pub use error::{RateError, RateResult, Uncostable};
pub use partition::{partition, Shipment};
pub use registry::RateRegistry;
pub use service::{ServiceCode, REGISTERED_SUFFIX};
pub use singpost::build_singpost_registry;
pub use surcharge::{Surcharge, SurchargeSchedule};
pub use tier::{
    CostTier, ExplicitTiers, ImpliedStep, ImplicitTiers, RateTable, ResolvedTier, TierMiss,
    TierRow, Zone, ZonedTierSet,
};
