//! Core types for pizzeria pricing.
//!
//! This module provides the plain data shapes the engine reads and produces.

pub mod channel;
pub mod costs;
pub mod id;
pub mod ingredient;
pub mod recipe;
pub mod result;

pub use channel::SalesChannel;
pub use costs::{CostLine, DeliveryCosts, MonthlyFixedCosts, OperatingCosts, PackagingCosts};
pub use id::*;
pub use ingredient::{Ingredient, PriceHistoryEntry, Unit};
pub use recipe::{CompositionEntry, ParsePizzaSizeError, PizzaSize, Recipe, RecipeSizeComposition};
pub use result::{ChannelPricing, PricingResult};
