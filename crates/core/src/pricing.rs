//! Pricing engine.
//!
//! Pure functions turning a catalog snapshot, a recipe composition, the
//! operating cost configuration and the channel table into cost breakdowns,
//! suggested prices and realized margins.
//!
//! All figures are plain `f64` money amounts and fractions. Nothing here
//! validates business sanity: negative or NaN inputs propagate through the
//! arithmetic. Run [`crate::validation`] first when inputs come from users.
//!
//! Two guards exist:
//! - a margin plus commission that leaves no room for a price falls back to
//!   twice the cost ([`compute_suggested_price`])
//! - a non-positive net revenue yields a zero margin ([`compute_realized_margin`])
//!
//! Fixed costs are divided by `monthly_sales_volume` unguarded.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::catalog::IngredientLookup;
use crate::types::{
    ChannelPricing, CompositionEntry, OperatingCosts, PizzaSize, PricingResult, Recipe, RecipeId,
    RecipeSizeComposition, SalesChannel,
};

/// Ingredient cost of a composition: `Σ quantity × current_price`.
///
/// Entries whose ingredient does not resolve contribute nothing.
#[must_use]
pub fn compute_ingredient_cost<L>(entries: &[CompositionEntry], catalog: &L) -> f64
where
    L: IngredientLookup + ?Sized,
{
    entries
        .iter()
        .filter_map(|entry| {
            catalog
                .lookup(&entry.ingredient_id)
                .map(|ingredient| entry.quantity * ingredient.current_price)
        })
        .sum()
}

/// Fixed costs rationed over the monthly sales volume.
///
/// The caller guarantees `monthly_sales_volume > 0`; otherwise the result
/// is infinite or NaN.
#[must_use]
pub fn compute_fixed_costs_per_order(costs: &OperatingCosts) -> f64 {
    costs.fixed.total() / costs.monthly_sales_volume
}

/// Operating cost of one order of `size`.
///
/// Rationed fixed costs, plus the size's box, the flat packaging items and
/// every condiment.
#[must_use]
pub fn compute_operating_cost_per_order(costs: &OperatingCosts, size: PizzaSize) -> f64 {
    let packaging = &costs.packaging;
    compute_fixed_costs_per_order(costs)
        + packaging.box_cost(size)
        + packaging.flat_total()
        + packaging.condiments_total()
}

/// Cost of delivering one order.
///
/// Always the full sum; whether it applies is the channel's decision.
#[must_use]
pub fn compute_delivery_cost(costs: &OperatingCosts) -> f64 {
    costs.delivery.total()
}

/// Price at which `target_margin` is kept after the channel's commission.
///
/// `total_cost / (1 − target_margin − commission_rate)`. When the
/// denominator is not positive there is no such price, and the result is
/// `total_cost × 2`. That fallback does not achieve the requested margin.
#[must_use]
pub fn compute_suggested_price(total_cost: f64, target_margin: f64, commission_rate: f64) -> f64 {
    suggest_price(total_cost, target_margin, commission_rate).0
}

/// Suggested price plus whether the fallback produced it.
fn suggest_price(total_cost: f64, target_margin: f64, commission_rate: f64) -> (f64, bool) {
    let denominator = 1.0 - target_margin - commission_rate;
    if denominator > 0.0 {
        (total_cost / denominator, false)
    } else {
        (total_cost * 2.0, true)
    }
}

/// Margin actually kept when selling at `suggested_price`.
///
/// `(net_revenue − total_cost) / net_revenue` with
/// `net_revenue = suggested_price × (1 − commission_rate)`, or 0 when the net
/// revenue is not positive.
#[must_use]
pub fn compute_realized_margin(suggested_price: f64, total_cost: f64, commission_rate: f64) -> f64 {
    let net_revenue = suggested_price * (1.0 - commission_rate);
    if net_revenue > 0.0 {
        (net_revenue - total_cost) / net_revenue
    } else {
        0.0
    }
}

/// Figures for one channel given the order's total cost.
#[must_use]
pub fn compute_channel(
    channel: &SalesChannel,
    total_cost: f64,
    delivery_cost: f64,
    target_margin: f64,
) -> ChannelPricing {
    let delivery_cost = if channel.has_delivery {
        delivery_cost
    } else {
        0.0
    };
    let total_channel_cost = total_cost + delivery_cost;
    let commission_rate = channel.commission_rate;

    let (suggested_price, price_fallback) =
        suggest_price(total_channel_cost, target_margin, commission_rate);
    let net_revenue = suggested_price * (1.0 - commission_rate);

    ChannelPricing {
        commission_rate,
        delivery_cost,
        total_channel_cost,
        suggested_price,
        realized_margin: compute_realized_margin(
            suggested_price,
            total_channel_cost,
            commission_rate,
        ),
        net_revenue,
        net_profit: net_revenue - total_channel_cost,
        price_fallback,
    }
}

/// Price one recipe size across every channel, stamped with the current time.
///
/// Results are keyed by channel id. When `channels` repeats an id, the last
/// entry replaces the earlier ones; [`crate::validation::validate_channels`]
/// reports such tables as [`crate::PricingInputError::DuplicateChannel`].
#[must_use]
pub fn compute_channel_pricing<L>(
    recipe_id: &RecipeId,
    size: PizzaSize,
    composition: &RecipeSizeComposition,
    catalog: &L,
    operating_costs: &OperatingCosts,
    channels: &[SalesChannel],
    target_margin: f64,
) -> PricingResult
where
    L: IngredientLookup + ?Sized,
{
    PricingRequest {
        recipe_id,
        size,
        composition,
        target_margin,
    }
    .compute(catalog, operating_costs, channels, Utc::now())
}

/// Same as [`compute_channel_pricing`] with an explicit `computed_at`.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn compute_channel_pricing_at<L>(
    recipe_id: &RecipeId,
    size: PizzaSize,
    composition: &RecipeSizeComposition,
    catalog: &L,
    operating_costs: &OperatingCosts,
    channels: &[SalesChannel],
    target_margin: f64,
    computed_at: DateTime<Utc>,
) -> PricingResult
where
    L: IngredientLookup + ?Sized,
{
    PricingRequest {
        recipe_id,
        size,
        composition,
        target_margin,
    }
    .compute(catalog, operating_costs, channels, computed_at)
}

/// Price every size a recipe offers, smallest first.
///
/// All results share one `computed_at`.
#[must_use]
pub fn price_recipe<L>(
    recipe: &Recipe,
    catalog: &L,
    operating_costs: &OperatingCosts,
    channels: &[SalesChannel],
    target_margin: f64,
) -> Vec<PricingResult>
where
    L: IngredientLookup + ?Sized,
{
    let computed_at = Utc::now();
    recipe
        .sizes
        .iter()
        .map(|(&size, composition)| {
            PricingRequest {
                recipe_id: &recipe.id,
                size,
                composition,
                target_margin,
            }
            .compute(catalog, operating_costs, channels, computed_at)
        })
        .collect()
}

struct PricingRequest<'a> {
    recipe_id: &'a RecipeId,
    size: PizzaSize,
    composition: &'a RecipeSizeComposition,
    target_margin: f64,
}

impl PricingRequest<'_> {
    fn compute<L>(
        &self,
        catalog: &L,
        operating_costs: &OperatingCosts,
        channels: &[SalesChannel],
        computed_at: DateTime<Utc>,
    ) -> PricingResult
    where
        L: IngredientLookup + ?Sized,
    {
        let ingredient_cost = compute_ingredient_cost(&self.composition.entries, catalog);
        let operating_cost = compute_operating_cost_per_order(operating_costs, self.size);
        let total_cost = ingredient_cost + operating_cost;
        let delivery_cost = compute_delivery_cost(operating_costs);

        let channels: BTreeMap<_, _> = channels
            .iter()
            .map(|channel| {
                (
                    channel.id.clone(),
                    compute_channel(channel, total_cost, delivery_cost, self.target_margin),
                )
            })
            .collect();

        PricingResult {
            recipe_id: self.recipe_id.clone(),
            size: self.size,
            ingredient_cost,
            operating_cost,
            total_cost,
            target_margin: self.target_margin,
            channels,
            computed_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;

    use super::*;
    use crate::catalog::IngredientCatalog;
    use crate::types::{
        ChannelId, CostLine, DeliveryCosts, Ingredient, MonthlyFixedCosts, PackagingCosts, Unit,
    };

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    fn catalog() -> IngredientCatalog {
        [Ingredient::new("cheese", "Mozzarella", Unit::Kg, 20.0)]
            .into_iter()
            .collect()
    }

    fn medium_composition() -> RecipeSizeComposition {
        RecipeSizeComposition::new(vec![CompositionEntry::new("cheese", 0.2)])
    }

    fn operating_costs() -> OperatingCosts {
        OperatingCosts {
            fixed: MonthlyFixedCosts {
                rent: 600.0,
                electricity: 250.0,
                other: vec![CostLine::new("accountant", 150.0)],
                ..MonthlyFixedCosts::default()
            },
            packaging: PackagingCosts {
                box_by_size: BTreeMap::from([(PizzaSize::Medium, 0.5), (PizzaSize::Large, 0.7)]),
                bag: 0.3,
                napkin: 0.1,
                paper: 0.0,
                condiments: vec![CostLine::new("ketchup", 0.12), CostLine::new("oregano", 0.08)],
            },
            delivery: DeliveryCosts {
                fuel: 2.0,
                maintenance: 0.5,
                courier: 3.0,
                insurance: 0.5,
                other: Vec::new(),
            },
            monthly_sales_volume: 1000.0,
        }
    }

    fn marketplace() -> SalesChannel {
        SalesChannel::new("marketplace", "Marketplace", 0.15, false)
    }

    #[test]
    fn test_ingredient_cost_empty_composition_is_zero() {
        assert!(compute_ingredient_cost(&[], &catalog()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingredient_cost_skips_unresolved_ids() {
        let entries = [CompositionEntry::new("missing", 5.0)];
        assert!(compute_ingredient_cost(&entries, &catalog()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingredient_cost_sums_resolved_entries() {
        let entries = [
            CompositionEntry::new("cheese", 0.2),
            CompositionEntry::new("missing", 5.0),
            CompositionEntry::new("cheese", 0.05),
        ];
        assert_close(compute_ingredient_cost(&entries, &catalog()), 5.0);
    }

    #[test]
    fn test_operating_cost_per_order() {
        let costs = operating_costs();
        assert_close(compute_fixed_costs_per_order(&costs), 1.0);
        assert_close(compute_operating_cost_per_order(&costs, PizzaSize::Medium), 2.1);
        assert_close(compute_operating_cost_per_order(&costs, PizzaSize::Large), 2.3);
        // No box configured for P.
        assert_close(compute_operating_cost_per_order(&costs, PizzaSize::Small), 1.6);
    }

    #[test]
    fn test_operating_cost_zero_volume_is_not_guarded() {
        let costs = OperatingCosts {
            monthly_sales_volume: 0.0,
            ..operating_costs()
        };
        assert!(compute_operating_cost_per_order(&costs, PizzaSize::Medium).is_infinite());
    }

    #[test]
    fn test_delivery_cost_sums_everything() {
        assert_close(compute_delivery_cost(&operating_costs()), 6.0);
    }

    #[test]
    fn test_suggested_price() {
        assert_close(compute_suggested_price(6.1, 0.65, 0.15), 30.5);
        assert_close(compute_suggested_price(10.0, 0.5, 0.0), 20.0);
    }

    #[test]
    fn test_suggested_price_fallback_guard() {
        assert_close(compute_suggested_price(100.0, 0.5, 0.6), 200.0);
        // A denominator of exactly zero also falls back.
        assert_close(compute_suggested_price(100.0, 0.5, 0.5), 200.0);
    }

    #[test]
    fn test_realized_margin_zero_when_no_net_revenue() {
        assert!(compute_realized_margin(0.0, 5.0, 0.1).abs() < f64::EPSILON);
        assert!(compute_realized_margin(10.0, 5.0, 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_margin_round_trip_without_commission() {
        for cost in [0.5, 6.1, 42.0, 1234.5] {
            for margin in [0.01, 0.25, 0.5, 0.65, 0.99] {
                let price = compute_suggested_price(cost, margin, 0.0);
                let realized = compute_realized_margin(price, cost, 0.0);
                assert!(
                    (realized - margin).abs() < 1e-9,
                    "cost {cost} margin {margin} realized {realized}"
                );
            }
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let channels = [marketplace()];
        let result = compute_channel_pricing(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &medium_composition(),
            &catalog(),
            &operating_costs(),
            &channels,
            0.65,
        );

        assert_close(result.ingredient_cost, 4.0);
        assert_close(result.operating_cost, 2.1);
        assert_close(result.total_cost, 6.1);

        let pricing = &result.channels[&ChannelId::new("marketplace")];
        assert_close(pricing.delivery_cost, 0.0);
        assert_close(pricing.total_channel_cost, 6.1);
        assert_close(pricing.suggested_price, 30.5);
        assert_close(pricing.net_revenue, 25.925);
        assert!((pricing.realized_margin - 0.7648).abs() < 1e-4);
        assert_close(pricing.net_profit, 25.925 - 6.1);
        assert!(!pricing.price_fallback);
    }

    #[test]
    fn test_repeated_channel_id_keeps_last_entry() {
        let channels = [
            SalesChannel::new("app", "App pickup", 0.1, false),
            SalesChannel::new("app", "App delivery", 0.25, true),
        ];
        let result = compute_channel_pricing(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &medium_composition(),
            &catalog(),
            &operating_costs(),
            &channels,
            0.5,
        );

        assert_eq!(result.channels.len(), 1);
        let app = &result.channels[&ChannelId::new("app")];
        assert_close(app.commission_rate, 0.25);
        assert_close(app.delivery_cost, 6.0);
    }

    #[test]
    fn test_delivery_only_applies_to_delivery_channels() {
        let channels = [
            SalesChannel::new("counter", "Counter", 0.0, false),
            SalesChannel::new("own_delivery", "Own delivery", 0.0, true),
            marketplace(),
        ];
        let result = compute_channel_pricing(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &medium_composition(),
            &catalog(),
            &operating_costs(),
            &channels,
            0.5,
        );

        for channel in &channels {
            let pricing = &result.channels[&channel.id];
            if channel.has_delivery {
                assert_close(pricing.delivery_cost, 6.0);
                assert_close(pricing.total_channel_cost, result.total_cost + 6.0);
            } else {
                assert_close(pricing.delivery_cost, 0.0);
                assert_close(pricing.total_channel_cost, result.total_cost);
            }
        }

        let own = &result.channels[&ChannelId::new("own_delivery")];
        assert_close(own.suggested_price, (6.1 + 6.0) / 0.5);
    }

    #[test]
    fn test_degenerate_channel_is_flagged() {
        let channels = [SalesChannel::new("greedy", "Greedy app", 0.4, false)];
        let result = compute_channel_pricing(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &medium_composition(),
            &catalog(),
            &operating_costs(),
            &channels,
            0.7,
        );

        let pricing = &result.channels[&ChannelId::new("greedy")];
        assert!(pricing.price_fallback);
        assert_close(pricing.suggested_price, 12.2);
    }

    #[test]
    fn test_identical_inputs_give_identical_figures() {
        let channels = SalesChannel::reference_table();
        let run = |at| {
            compute_channel_pricing_at(
                &RecipeId::new("margherita"),
                PizzaSize::Medium,
                &medium_composition(),
                &catalog(),
                &operating_costs(),
                &channels,
                0.6,
                at,
            )
        };

        let first = run(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let second = run(Utc.with_ymd_and_hms(2025, 6, 30, 8, 30, 0).unwrap());

        assert_ne!(first.computed_at, second.computed_at);
        assert!(first.same_figures(&second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_changed_price_is_a_different_result() {
        let channels = SalesChannel::reference_table();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut snapshot = catalog();
        let before = compute_channel_pricing_at(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &medium_composition(),
            &snapshot,
            &operating_costs(),
            &channels,
            0.6,
            at,
        );

        snapshot.insert(Ingredient::new("cheese", "Mozzarella", Unit::Kg, 25.0));
        let after = compute_channel_pricing_at(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &medium_composition(),
            &snapshot,
            &operating_costs(),
            &channels,
            0.6,
            at,
        );

        assert!(!before.same_figures(&after));
    }

    #[test]
    fn test_nan_propagates_without_panicking() {
        let nan_catalog = [Ingredient::new("cheese", "Mozzarella", Unit::Kg, f64::NAN)];
        let cost = compute_ingredient_cost(&medium_composition().entries, nan_catalog.as_slice());
        assert!(cost.is_nan());

        // NaN is not > 0, so the price guard falls back and the margin guard yields 0.
        assert_close(compute_suggested_price(10.0, f64::NAN, 0.0), 20.0);
        assert!(compute_realized_margin(f64::NAN, 1.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_recipe_covers_every_size_in_order() {
        let recipe = Recipe::new("margherita", "Margherita")
            .with_size(PizzaSize::Large, vec![CompositionEntry::new("cheese", 0.3)])
            .with_size(PizzaSize::Medium, vec![CompositionEntry::new("cheese", 0.2)]);

        let results = price_recipe(
            &recipe,
            &catalog(),
            &operating_costs(),
            &SalesChannel::reference_table(),
            0.6,
        );

        let sizes: Vec<_> = results.iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![PizzaSize::Medium, PizzaSize::Large]);
        assert!(results.iter().all(|r| r.computed_at == results[0].computed_at));
        assert_close(results[1].ingredient_cost, 6.0);
        assert_eq!(results[0].channels.len(), 4);
    }

    #[test]
    fn test_best_channel_prefers_highest_profit() {
        let channels = SalesChannel::reference_table();
        let result = compute_channel_pricing(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &medium_composition(),
            &catalog(),
            &operating_costs(),
            &channels,
            0.6,
        );

        let (best_id, best) = result.best_channel().unwrap();
        for pricing in result.channels.values() {
            assert!(best.net_profit >= pricing.net_profit);
        }
        // Delivery and commission both raise the price, and with it the absolute profit.
        assert!(result.channels[best_id].delivery_cost > 0.0);
    }
}
