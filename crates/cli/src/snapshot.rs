//! Data snapshot files.
//!
//! A snapshot holds everything one pricing run needs: the ingredient catalog,
//! the recipes, the operating costs and optionally a channel table and a
//! target margin. YAML (`.yaml`/`.yml`) and JSON (`.json`) are accepted.
//!
//! ```yaml
//! ingredients:
//!   - { id: cheese, name: Mozzarella, unit: kg, current_price: 20.0 }
//! recipes:
//!   - id: margherita
//!     name: Margherita
//!     sizes:
//!       M: { entries: [{ ingredient_id: cheese, quantity: 0.2 }] }
//! operating_costs:
//!   fixed: { rent: 1000 }
//!   packaging: { box_by_size: { M: 0.5 }, bag: 0.3, napkin: 0.1 }
//!   monthly_sales_volume: 1000
//! target_margin: 0.65
//! ```

use std::path::Path;

use pizzeria_pricing_core::{
    Ingredient, IngredientCatalog, OperatingCosts, Recipe, RecipeId, SalesChannel,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML content is malformed.
    #[error("Invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON content is malformed.
    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension names no known format.
    #[error("Unsupported snapshot format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    /// No recipe with the requested id.
    #[error("Recipe not found: {0}")]
    UnknownRecipe(String),
}

/// Snapshot file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub operating_costs: OperatingCosts,
    /// Falls back to [`SalesChannel::reference_table`] when absent.
    #[serde(default)]
    pub channels: Option<Vec<SalesChannel>>,
    #[serde(default)]
    pub target_margin: Option<f64>,
}

impl Snapshot {
    /// Load a snapshot, picking the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or does not parse.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !matches!(extension.as_str(), "yaml" | "yml" | "json") {
            return Err(SnapshotError::UnsupportedFormat(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Read snapshot");

        if extension == "json" {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse a YAML snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid snapshot.
    pub fn from_yaml_str(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid snapshot.
    pub fn from_json_str(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Ingredient catalog built from the snapshot. Later duplicates win; `check`
    /// reports them.
    #[must_use]
    pub fn catalog(&self) -> IngredientCatalog {
        self.ingredients.iter().cloned().collect()
    }

    /// Channel table of the snapshot, or the reference table.
    #[must_use]
    pub fn channels(&self) -> Vec<SalesChannel> {
        self.channels
            .clone()
            .unwrap_or_else(SalesChannel::reference_table)
    }

    /// Find a recipe by id.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnknownRecipe`] if no recipe has this id.
    pub fn recipe(&self, id: &str) -> Result<&Recipe, SnapshotError> {
        let id = RecipeId::new(id);
        self.recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .ok_or_else(|| SnapshotError::UnknownRecipe(id.into_inner()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use pizzeria_pricing_core::{IngredientId, IngredientLookup, PizzaSize};

    use super::*;

    const YAML: &str = r"
ingredients:
  - { id: cheese, name: Mozzarella, unit: kg, current_price: 20.0 }
  - { id: basil, name: Basil, unit: unit, current_price: 0.1, active: false }
recipes:
  - id: margherita
    name: Margherita
    sizes:
      M:
        entries:
          - { ingredient_id: cheese, quantity: 0.2 }
          - { ingredient_id: basil, quantity: 4 }
operating_costs:
  fixed: { rent: 1000 }
  packaging: { box_by_size: { M: 0.5 }, bag: 0.3, napkin: 0.1 }
  monthly_sales_volume: 1000
";

    #[test]
    fn test_parse_yaml() {
        let snapshot = Snapshot::from_yaml_str(YAML).unwrap();

        assert_eq!(snapshot.ingredients.len(), 2);
        assert!(snapshot.target_margin.is_none());

        let recipe = snapshot.recipe("margherita").unwrap();
        let medium = recipe.composition(PizzaSize::Medium).unwrap();
        assert_eq!(medium.entries.len(), 2);

        let catalog = snapshot.catalog();
        let basil = catalog.lookup(&IngredientId::new("basil")).unwrap();
        assert!(!basil.active);
    }

    #[test]
    fn test_channels_default_to_reference_table() {
        let snapshot = Snapshot::from_yaml_str(YAML).unwrap();
        assert_eq!(snapshot.channels(), SalesChannel::reference_table());
    }

    #[test]
    fn test_custom_channels() {
        let json = r#"{
            "channels": [{"id": "phone", "name": "Phone orders", "has_delivery": true}],
            "target_margin": 0.6
        }"#;
        let snapshot = Snapshot::from_json_str(json).unwrap();
        let channels = snapshot.channels();

        assert_eq!(channels.len(), 1);
        assert!(channels[0].has_delivery);
        assert!(channels[0].commission_rate.abs() < f64::EPSILON);
        assert_eq!(snapshot.target_margin, Some(0.6));
    }

    #[test]
    fn test_unknown_recipe() {
        let snapshot = Snapshot::from_yaml_str(YAML).unwrap();
        let err = snapshot.recipe("quattro-formaggi").unwrap_err();
        assert_eq!(err.to_string(), "Recipe not found: quattro-formaggi");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Snapshot::load(Path::new("pizzeria.toml")).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Snapshot::load(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }
}
