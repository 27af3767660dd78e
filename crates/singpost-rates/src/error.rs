//! # Rate Engine Errors
//!
//! [`RateError`] covers rate tables that cannot be built and rate cards
//! that cannot be loaded. These are configuration faults, detected once at
//! startup.
//!
//! Per-order conditions (destination not served, parcel too heavy, service
//! not offered) are not errors. They are reported as [`Uncostable`]
//! reasons and never abort a calculation.

use std::path::PathBuf;

use singpost_core::{ValidationError, Weight};
use thiserror::Error;

/// A rate table or rate card is malformed.
#[derive(Error, Debug)]
pub enum RateError {
    /// A tier table needs at least one row.
    #[error("rate table has no rows")]
    EmptyTable,

    /// Two rows declare the same ceiling.
    #[error("rate table declares ceiling {ceiling} more than once")]
    DuplicateCeiling { ceiling: Weight },

    /// Implied steps must cover a positive weight.
    #[error("implied step weight must be positive, got {step_weight}")]
    InvalidStep { step_weight: Weight },

    /// The per-parcel ceiling must be positive.
    #[error("maximum item weight must be positive, got {maximum_item_weight}")]
    InvalidMaximumWeight { maximum_item_weight: Weight },

    /// A zoned tier set needs at least one zone.
    #[error("zoned tier set has no zones")]
    NoZones,

    /// A service entry in a rate card failed to build.
    #[error("service {service:?}: {source}")]
    InvalidService {
        service: String,
        #[source]
        source: Box<RateError>,
    },

    /// A value in a rate card failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Rate card file was not found.
    #[error("rate card not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Rate card file could not be parsed.
    #[error("failed to parse rate card at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rate engine construction.
pub type RateResult<T> = Result<T, RateError>;

/// Why an order cannot be costed under a given service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Uncostable {
    /// The tier's country filter rejects the destination.
    #[error("service {service} does not deliver to {destination}")]
    DestinationExcluded { service: String, destination: String },

    /// No zone of a zoned tier set accepts the destination.
    #[error("service {service} has no zone covering {destination}")]
    UnresolvedZone { service: String, destination: String },

    /// The service code is unknown or has no rate table yet.
    #[error("service {service} is not implemented")]
    UnimplementedService { service: String },

    /// One unit alone is heavier than the per-parcel ceiling.
    #[error("item {item} weighs {weight}, above the {ceiling} ceiling")]
    UnpartitionableItem {
        item: String,
        weight: Weight,
        ceiling: Weight,
    },

    /// A line's weight, or the cart total, exceeds the decimal range.
    #[error("weight of item {item} overflows")]
    WeightOverflow { item: String },

    /// Postage exceeds the decimal range.
    #[error("postage for service {service} overflows")]
    CostOverflow { service: String },

    /// The cart has nothing to post.
    #[error("cart has no shippable units")]
    EmptyCart,
}
