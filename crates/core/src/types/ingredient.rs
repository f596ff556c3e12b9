//! Ingredient records and their price history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::IngredientId;

/// Purchase unit an ingredient price refers to.
///
/// Composition quantities are expressed in the same unit, so
/// `quantity × current_price` is always a money amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    G,
    L,
    Ml,
    Unit,
}

impl Unit {
    /// Short label used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::G => "g",
            Self::L => "l",
            Self::Ml => "ml",
            Self::Unit => "unit",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A catalog ingredient.
///
/// `price_history` is append-only and kept in insertion order, which is not
/// necessarily chronological: a late invoice can be recorded after a newer one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub unit: Unit,
    pub current_price: f64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub price_history: Vec<PriceHistoryEntry>,
}

const fn default_active() -> bool {
    true
}

impl Ingredient {
    /// Create an active ingredient with an empty price history.
    #[must_use]
    pub fn new(id: impl Into<IngredientId>, name: impl Into<String>, unit: Unit, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit,
            current_price: price,
            supplier: None,
            category: String::new(),
            active: true,
            price_history: Vec::new(),
        }
    }

    /// Record a new purchase price.
    ///
    /// Appends to the history and makes `price` the current price. When a
    /// supplier is given it also becomes the ingredient's current supplier.
    pub fn record_price(
        &mut self,
        price: f64,
        date: NaiveDate,
        supplier: Option<String>,
        notes: Option<String>,
    ) {
        if let Some(name) = &supplier {
            self.supplier = Some(name.clone());
        }
        self.current_price = price;
        self.price_history.push(PriceHistoryEntry {
            date,
            price,
            supplier,
            notes,
        });
    }

    /// Fractional change between the last two recorded prices.
    ///
    /// Uses insertion order. Returns `None` with fewer than two entries or
    /// when the previous price is zero.
    #[must_use]
    pub fn last_price_variation(&self) -> Option<f64> {
        let [.., previous, last] = self.price_history.as_slice() else {
            return None;
        };
        if previous.price.abs() < f64::EPSILON {
            return None;
        }
        Some((last.price - previous.price) / previous.price)
    }
}
