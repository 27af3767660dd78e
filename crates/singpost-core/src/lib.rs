//! # singpost-core — Foundational Types for the Shipping Engine
//!
//! This crate defines the primitives every other crate in the workspace
//! builds on. It depends on no internal crate.
//!
//! ## Key Design Principles
//!
//! 1. **Exact decimals only.** [`Weight`] and [`Money`] wrap
//!    `rust_decimal::Decimal`. Tier boundaries are compared with `<=`/`>`,
//!    so binary floating point never appears in a weight or a cost.
//!
//! 2. **Validated code newtypes.** [`CountryCode`] and [`ContinentCode`]
//!    are normalized at construction. No bare strings reach a filter.
//!
//! 3. **Absence of a restriction means unrestricted.** An empty include
//!    set in a [`CountryFilter`] matches every destination; exclusion
//!    always wins over inclusion.
//!
//! 4. **The cart is a collaborator.** The engine reads carts through the
//!    [`CartLine`] trait and never mutates them.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod cart;
pub mod destination;
pub mod error;
pub mod filter;
pub mod measure;

// Re-export primary types for ergonomic imports.
pub use cart::{cart_weight, CartLine, LineItem};
pub use destination::{ContinentCode, CountryCode, Destination};
pub use error::ValidationError;
pub use filter::CountryFilter;
pub use measure::{Money, Weight, MONEY_SCALE};
