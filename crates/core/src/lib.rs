//! Pizzeria Pricing Core - cost breakdown and multi-channel pricing engine.
//!
//! This crate provides the pricing core used by the pizzeria tooling:
//! - `cli` - Command-line front end that loads data snapshots and prints reports
//! - `integration-tests` - End-to-end scenarios over fixture snapshots
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no clocks except the `computed_at` metadata stamp. Every operation works on
//! caller-supplied snapshots, so it can be called from anywhere without
//! synchronization.
//!
//! # Modules
//!
//! - [`types`] - Ids, ingredients, recipes, operating costs, channels and results
//! - [`catalog`] - Ingredient lookup seam and an in-memory catalog with price history
//! - [`pricing`] - Cost, suggested price and realized margin calculations
//! - [`validation`] - Boundary checks callers run before invoking the engine
//!
//! # Example
//!
//! ```
//! use pizzeria_pricing_core::{compute_realized_margin, compute_suggested_price};
//!
//! let price = compute_suggested_price(6.1, 0.65, 0.15);
//! assert!((price - 30.5).abs() < 1e-9);
//!
//! let margin = compute_realized_margin(price, 6.1, 0.15);
//! assert!((margin - 0.7647).abs() < 1e-3);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod pricing;
pub mod types;
pub mod validation;

pub use catalog::{CatalogError, IngredientCatalog, IngredientLookup};
pub use pricing::*;
pub use types::*;
pub use validation::{PricingInputError, validate_pricing_inputs};
