//! Boundary validation for pricing inputs.
//!
//! The engine accepts anything and lets the arithmetic decide. Callers that
//! take data from people run these checks first and refuse to price when a
//! blocking finding comes back.
//!
//! Every `validate_*` function returns the full list of findings; an empty
//! list means the input is fine.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::catalog::IngredientLookup;
use crate::types::{
    ChannelId, CostLine, Ingredient, IngredientId, OperatingCosts, PizzaSize, Recipe, RecipeId, SalesChannel,
};

/// A problem found in pricing inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingInputError {
    /// Fixed costs cannot be rationed over zero or negative orders.
    #[error("monthly sales volume must be positive (got {0})")]
    NonPositiveSalesVolume(f64),

    /// Target margin outside `[0, 1)`.
    #[error("target margin must be at least 0 and below 1 (got {0})")]
    TargetMarginOutOfRange(f64),

    /// Channel commission outside `[0, 1)`.
    #[error("commission of channel {channel} must be at least 0 and below 1 (got {rate})")]
    CommissionOutOfRange {
        /// Offending channel.
        channel: ChannelId,
        /// Configured commission rate.
        rate: f64,
    },

    /// Two channels share an id, so one would hide the other's figures.
    #[error("channel {channel} is listed more than once")]
    DuplicateChannel {
        /// Repeated channel id.
        channel: ChannelId,
    },

    /// Two ingredients share an id; only the last one is ever priced.
    #[error("ingredient {ingredient} is listed more than once")]
    DuplicateIngredient {
        /// Repeated ingredient id.
        ingredient: IngredientId,
    },

    /// Margin plus commission leaves no room for a price.
    #[error(
        "target margin {margin} plus commission {commission} of channel {channel} reaches 100%; \
         the suggested price would fall back to twice the cost"
    )]
    DegenerateChannel {
        /// Offending channel.
        channel: ChannelId,
        /// Requested target margin.
        margin: f64,
        /// Channel commission rate.
        commission: f64,
    },

    /// A money amount below zero.
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount {
        /// Dotted path of the field.
        field: String,
        /// Configured value.
        value: f64,
    },

    /// A NaN or infinite number.
    #[error("{field} is not a finite number")]
    NonFiniteAmount {
        /// Dotted path of the field.
        field: String,
    },

    /// A composition quantity below zero.
    #[error("recipe {recipe} size {size}: quantity of {ingredient} must not be negative (got {quantity})")]
    NegativeQuantity {
        /// Recipe holding the entry.
        recipe: RecipeId,
        /// Size holding the entry.
        size: PizzaSize,
        /// Ingredient of the entry.
        ingredient: IngredientId,
        /// Configured quantity.
        quantity: f64,
    },

    /// A composition entry that the catalog cannot resolve.
    #[error("recipe {recipe} size {size}: ingredient {ingredient} is not in the catalog")]
    UnknownIngredient {
        /// Recipe holding the entry.
        recipe: RecipeId,
        /// Size holding the entry.
        size: PizzaSize,
        /// Unresolved ingredient id.
        ingredient: IngredientId,
    },
}

impl PricingInputError {
    /// Whether pricing must be refused.
    ///
    /// Unknown ingredients are advisory: the engine skips them, which prices
    /// the recipe too low but still consistently.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        !matches!(self, Self::UnknownIngredient { .. })
    }
}

/// Check a target margin fraction.
///
/// # Errors
///
/// Returns [`PricingInputError::TargetMarginOutOfRange`] unless `0 <= margin < 1`.
pub fn validate_target_margin(margin: f64) -> Result<(), PricingInputError> {
    if (0.0..1.0).contains(&margin) {
        Ok(())
    } else {
        Err(PricingInputError::TargetMarginOutOfRange(margin))
    }
}

/// Check every amount in the operating cost configuration.
#[must_use]
pub fn validate_operating_costs(costs: &OperatingCosts) -> Vec<PricingInputError> {
    let mut errors = Vec::new();
    let fixed = &costs.fixed;
    let packaging = &costs.packaging;
    let delivery = &costs.delivery;

    let named = [
        ("fixed.rent", fixed.rent),
        ("fixed.electricity", fixed.electricity),
        ("fixed.water", fixed.water),
        ("fixed.gas", fixed.gas),
        ("fixed.internet", fixed.internet),
        ("fixed.payroll", fixed.payroll),
        ("fixed.payroll_taxes", fixed.payroll_taxes),
        ("fixed.accounting", fixed.accounting),
        ("fixed.marketing", fixed.marketing),
        ("fixed.software", fixed.software),
        ("packaging.bag", packaging.bag),
        ("packaging.napkin", packaging.napkin),
        ("packaging.paper", packaging.paper),
        ("delivery.fuel", delivery.fuel),
        ("delivery.maintenance", delivery.maintenance),
        ("delivery.courier", delivery.courier),
        ("delivery.insurance", delivery.insurance),
    ];
    for (field, value) in named {
        check_amount(&mut errors, field.to_owned(), value);
    }

    check_lines(&mut errors, "fixed.other", &fixed.other);
    check_lines(&mut errors, "packaging.condiments", &packaging.condiments);
    check_lines(&mut errors, "delivery.other", &delivery.other);

    for (size, &value) in &packaging.box_by_size {
        check_amount(&mut errors, format!("packaging.box_by_size.{size}"), value);
    }

    let volume = costs.monthly_sales_volume;
    if !volume.is_finite() {
        errors.push(PricingInputError::NonFiniteAmount {
            field: "monthly_sales_volume".to_owned(),
        });
    } else if volume <= 0.0 {
        errors.push(PricingInputError::NonPositiveSalesVolume(volume));
    }

    errors
}

/// Check channel ids are unique, and that each commission leaves room for
/// `target_margin`.
#[must_use]
pub fn validate_channels(channels: &[SalesChannel], target_margin: f64) -> Vec<PricingInputError> {
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();
    for channel in channels {
        if !seen.insert(&channel.id) {
            errors.push(PricingInputError::DuplicateChannel {
                channel: channel.id.clone(),
            });
        }
        let rate = channel.commission_rate;
        if !(0.0..1.0).contains(&rate) {
            errors.push(PricingInputError::CommissionOutOfRange {
                channel: channel.id.clone(),
                rate,
            });
        } else if 1.0 - target_margin - rate <= 0.0 {
            errors.push(PricingInputError::DegenerateChannel {
                channel: channel.id.clone(),
                margin: target_margin,
                commission: rate,
            });
        }
    }
    errors
}

/// Check an ingredient list for repeated ids.
#[must_use]
pub fn validate_ingredients(ingredients: &[Ingredient]) -> Vec<PricingInputError> {
    let mut seen = BTreeSet::new();
    ingredients
        .iter()
        .filter(|ingredient| !seen.insert(&ingredient.id))
        .map(|ingredient| PricingInputError::DuplicateIngredient {
            ingredient: ingredient.id.clone(),
        })
        .collect()
}

/// Check a recipe's quantities and that every ingredient resolves.
#[must_use]
pub fn validate_recipe<L>(recipe: &Recipe, catalog: &L) -> Vec<PricingInputError>
where
    L: IngredientLookup + ?Sized,
{
    let mut errors = Vec::new();
    for (&size, composition) in &recipe.sizes {
        for entry in &composition.entries {
            if !entry.quantity.is_finite() {
                errors.push(PricingInputError::NonFiniteAmount {
                    field: format!("recipes.{}.{size}.{}", recipe.id, entry.ingredient_id),
                });
            } else if entry.quantity < 0.0 {
                errors.push(PricingInputError::NegativeQuantity {
                    recipe: recipe.id.clone(),
                    size,
                    ingredient: entry.ingredient_id.clone(),
                    quantity: entry.quantity,
                });
            }

            match catalog.lookup(&entry.ingredient_id) {
                None => errors.push(PricingInputError::UnknownIngredient {
                    recipe: recipe.id.clone(),
                    size,
                    ingredient: entry.ingredient_id.clone(),
                }),
                Some(ingredient) => check_amount(
                    &mut errors,
                    format!("ingredients.{}.current_price", ingredient.id),
                    ingredient.current_price,
                ),
            }
        }
    }
    errors
}

/// Run every check against one pricing request.
#[must_use]
pub fn validate_pricing_inputs<L>(
    recipe: &Recipe,
    catalog: &L,
    costs: &OperatingCosts,
    channels: &[SalesChannel],
    target_margin: f64,
) -> Vec<PricingInputError>
where
    L: IngredientLookup + ?Sized,
{
    let mut errors = Vec::new();
    if let Err(e) = validate_target_margin(target_margin) {
        errors.push(e);
    }
    errors.extend(validate_operating_costs(costs));
    errors.extend(validate_channels(channels, target_margin));
    errors.extend(validate_recipe(recipe, catalog));
    errors
}

fn check_amount(errors: &mut Vec<PricingInputError>, field: String, value: f64) {
    if !value.is_finite() {
        errors.push(PricingInputError::NonFiniteAmount { field });
    } else if value < 0.0 {
        errors.push(PricingInputError::NegativeAmount { field, value });
    }
}

fn check_lines(errors: &mut Vec<PricingInputError>, prefix: &str, lines: &[CostLine]) {
    for line in lines {
        check_amount(errors, format!("{prefix}.{}", line.name), line.amount);
    }
}
