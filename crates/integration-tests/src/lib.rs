//! Integration tests for pizzeria pricing.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pizzeria-pricing-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `pricing_scenarios` - Worked examples priced end to end from the fixture
//! - `pricing_properties` - Invariants checked across every recipe and channel
//! - `catalog_updates` - Price history changes flowing into prices
//!
//! Fixtures live in `tests/fixtures/` and use the same YAML layout as the
//! CLI snapshot files.

use std::path::PathBuf;

use pizzeria_pricing_core::{
    Ingredient, IngredientCatalog, OperatingCosts, Recipe, RecipeId, SalesChannel,
};
use serde::Deserialize;

/// Fixture file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub ingredients: Vec<Ingredient>,
    pub recipes: Vec<Recipe>,
    pub operating_costs: OperatingCosts,
    pub channels: Vec<SalesChannel>,
}

impl Fixture {
    /// Ingredient catalog of the fixture.
    #[must_use]
    pub fn catalog(&self) -> IngredientCatalog {
        self.ingredients.iter().cloned().collect()
    }

    /// Recipe by id.
    ///
    /// # Panics
    ///
    /// Panics if the fixture has no such recipe.
    #[must_use]
    pub fn recipe(&self, id: &str) -> &Recipe {
        let id = RecipeId::new(id);
        self.recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .unwrap_or_else(|| panic!("fixture has no recipe {id}"))
    }
}

/// Load a fixture from `tests/fixtures/`.
///
/// # Panics
///
/// Panics if the file is missing or malformed.
#[must_use]
pub fn load_fixture(name: &str) -> Fixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

/// Assert two amounts are equal within `1e-9`.
///
/// # Panics
///
/// Panics if they are not.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
