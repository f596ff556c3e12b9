//! Recipes and their per-size ingredient compositions.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{IngredientId, RecipeId};
use crate::catalog::IngredientLookup;
use crate::pricing::compute_ingredient_cost;

/// Pizza size, ordered from smallest to largest.
///
/// Serialized with the labels used on the menu board: `P`, `M`, `G`, `GG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PizzaSize {
    #[serde(rename = "P")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "G")]
    Large,
    #[serde(rename = "GG")]
    ExtraLarge,
}

impl PizzaSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::ExtraLarge];

    /// Menu label (`P`, `M`, `G`, `GG`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Small => "P",
            Self::Medium => "M",
            Self::Large => "G",
            Self::ExtraLarge => "GG",
        }
    }
}

impl std::fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a size label is not recognized.
#[derive(Debug, Clone, Error)]
#[error("unknown pizza size: {0} (expected P, M, G or GG)")]
pub struct ParsePizzaSizeError(String);

impl FromStr for PizzaSize {
    type Err = ParsePizzaSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P" => Ok(Self::Small),
            "M" => Ok(Self::Medium),
            "G" => Ok(Self::Large),
            "GG" => Ok(Self::ExtraLarge),
            _ => Err(ParsePizzaSizeError(s.to_owned())),
        }
    }
}

/// One ingredient line of a composition, in the ingredient's purchase unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub ingredient_id: IngredientId,
    pub quantity: f64,
}

impl CompositionEntry {
    #[must_use]
    pub fn new(ingredient_id: impl Into<IngredientId>, quantity: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            quantity,
        }
    }
}

/// Ingredient composition of one recipe size.
///
/// `cost_total` is derived data: it is whatever the last
/// [`Recipe::refresh_costs`] computed and is never read by the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecipeSizeComposition {
    #[serde(default)]
    pub entries: Vec<CompositionEntry>,
    #[serde(default)]
    pub cost_total: f64,
}

impl RecipeSizeComposition {
    #[must_use]
    pub const fn new(entries: Vec<CompositionEntry>) -> Self {
        Self {
            entries,
            cost_total: 0.0,
        }
    }
}

/// A pizza recipe with one composition per offered size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sizes: BTreeMap<PizzaSize, RecipeSizeComposition>,
}

impl Recipe {
    #[must_use]
    pub fn new(id: impl Into<RecipeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            sizes: BTreeMap::new(),
        }
    }

    /// Builder-style helper to set the composition of a size.
    #[must_use]
    pub fn with_size(mut self, size: PizzaSize, entries: Vec<CompositionEntry>) -> Self {
        self.sizes.insert(size, RecipeSizeComposition::new(entries));
        self
    }

    /// Composition for a size, if the recipe offers it.
    #[must_use]
    pub fn composition(&self, size: PizzaSize) -> Option<&RecipeSizeComposition> {
        self.sizes.get(&size)
    }

    /// Recompute the derived `cost_total` of every size against `catalog`.
    pub fn refresh_costs<L>(&mut self, catalog: &L)
    where
        L: IngredientLookup + ?Sized,
    {
        for composition in self.sizes.values_mut() {
            composition.cost_total = compute_ingredient_cost(&composition.entries, catalog);
        }
    }
}
