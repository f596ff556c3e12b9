//! Ingredient lookup and an in-memory catalog.
//!
//! The engine only needs [`IngredientLookup`]: resolve an id to an
//! ingredient, or report that it is not there. Catalog stores implement it
//! however they keep their data; the common map and slice shapes are covered
//! here, plus [`IngredientCatalog`] which also maintains price history.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{Ingredient, IngredientId};

/// Resolve ingredients by id.
pub trait IngredientLookup {
    /// Return the ingredient for `id`, or `None` when it is not in the catalog.
    fn lookup(&self, id: &IngredientId) -> Option<&Ingredient>;
}

impl<S: BuildHasher> IngredientLookup for HashMap<IngredientId, Ingredient, S> {
    fn lookup(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.get(id)
    }
}

impl IngredientLookup for BTreeMap<IngredientId, Ingredient> {
    fn lookup(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.get(id)
    }
}

/// Linear scan. When ids repeat, the last record wins, as it does for an
/// [`IngredientCatalog`] collected from the same list.
impl IngredientLookup for [Ingredient] {
    fn lookup(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.iter().rev().find(|ingredient| &ingredient.id == id)
    }
}

impl IngredientLookup for Vec<Ingredient> {
    fn lookup(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.as_slice().lookup(id)
    }
}

/// Errors that can occur when updating an [`IngredientCatalog`].
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// No ingredient with this id.
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(IngredientId),
}

/// Ingredient catalog keyed by id, iterated in id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientCatalog {
    ingredients: BTreeMap<IngredientId, Ingredient>,
}

impl IngredientCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an ingredient, returning the previous record.
    pub fn insert(&mut self, ingredient: Ingredient) -> Option<Ingredient> {
        self.ingredients.insert(ingredient.id.clone(), ingredient)
    }

    #[must_use]
    pub fn get(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn remove(&mut self, id: &IngredientId) -> Option<Ingredient> {
        self.ingredients.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    /// Ingredients currently offered for new recipes.
    pub fn active(&self) -> impl Iterator<Item = &Ingredient> {
        self.iter().filter(|ingredient| ingredient.active)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Record a purchase price for an ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownIngredient`] if `id` is not in the catalog.
    pub fn record_price(
        &mut self,
        id: &IngredientId,
        price: f64,
        date: NaiveDate,
        supplier: Option<String>,
        notes: Option<String>,
    ) -> Result<(), CatalogError> {
        let ingredient = self
            .ingredients
            .get_mut(id)
            .ok_or_else(|| CatalogError::UnknownIngredient(id.clone()))?;
        ingredient.record_price(price, date, supplier, notes);
        Ok(())
    }
}

impl IngredientLookup for IngredientCatalog {
    fn lookup(&self, id: &IngredientId) -> Option<&Ingredient> {
        self.get(id)
    }
}

impl FromIterator<Ingredient> for IngredientCatalog {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for ingredient in iter {
            catalog.insert(ingredient);
        }
        catalog
    }
}

impl Extend<Ingredient> for IngredientCatalog {
    fn extend<I: IntoIterator<Item = Ingredient>>(&mut self, iter: I) {
        for ingredient in iter {
            self.insert(ingredient);
        }
    }
}
