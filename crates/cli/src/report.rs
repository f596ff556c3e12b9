//! Plain-text report rendering.
//!
//! Figures are rounded for display only; the engine's results are never
//! modified. Money uses 2 decimal places, half away from zero, percentages
//! 1 decimal place. Non-finite values print as `n/a`.

use std::io::{self, Write};

use pizzeria_pricing_core::{PricingResult, SalesChannel};
use rust_decimal::prelude::*;

/// Decimal places for money amounts.
const MONEY_PLACES: u32 = 2;
/// Decimal places for percentages.
const PERCENT_PLACES: u32 = 1;

/// Round an amount for display. `None` for NaN and infinities.
#[must_use]
pub fn round_money(value: f64) -> Option<Decimal> {
    round(value, MONEY_PLACES)
}

fn round(value: f64, places: u32) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
}

/// `12.5` -> `"12.50"`.
#[must_use]
pub fn format_money(value: f64) -> String {
    round_money(value).map_or_else(|| "n/a".to_owned(), |d| format!("{d:.2}"))
}

/// `0.7648` -> `"76.5%"`.
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    round(fraction * 100.0, PERCENT_PLACES)
        .map_or_else(|| "n/a".to_owned(), |d| format!("{d:.1}%"))
}

/// Write one pricing result as a channel table.
///
/// `channels` supplies display names and row order; channels missing from
/// the result are skipped.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_pricing(
    out: &mut impl Write,
    recipe_name: &str,
    result: &PricingResult,
    channels: &[SalesChannel],
) -> io::Result<()> {
    writeln!(
        out,
        "{recipe_name} ({}) - target margin {}",
        result.size,
        format_percent(result.target_margin)
    )?;
    writeln!(
        out,
        "  ingredients {}  operating {}  total cost {}",
        format_money(result.ingredient_cost),
        format_money(result.operating_cost),
        format_money(result.total_cost)
    )?;
    writeln!(
        out,
        "  {:<28} {:>8} {:>9} {:>10} {:>10} {:>10} {:>8}",
        "channel", "fee", "delivery", "cost", "price", "profit", "margin"
    )?;

    for channel in channels {
        let Some(pricing) = result.channels.get(&channel.id) else {
            continue;
        };
        let marker = if pricing.price_fallback { " *" } else { "" };
        writeln!(
            out,
            "  {:<28} {:>8} {:>9} {:>10} {:>10} {:>10} {:>8}{marker}",
            channel.name,
            format_percent(pricing.commission_rate),
            format_money(pricing.delivery_cost),
            format_money(pricing.total_channel_cost),
            format_money(pricing.suggested_price),
            format_money(pricing.net_profit),
            format_percent(pricing.realized_margin),
        )?;
    }

    if result.channels.values().any(|p| p.price_fallback) {
        writeln!(
            out,
            "  * margin plus fee reaches 100%: price is twice the cost, target margin not met"
        )?;
    }

    if let Some((id, best)) = result.best_channel() {
        writeln!(
            out,
            "  best channel: {id} ({} profit per order)",
            format_money(best.net_profit)
        )?;
    }
    writeln!(out)
}

/// Write the channel table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_channels(out: &mut impl Write, channels: &[SalesChannel]) -> io::Result<()> {
    writeln!(out, "{:<20} {:<28} {:>8} {:>9}", "id", "name", "fee", "delivery")?;
    for channel in channels {
        writeln!(
            out,
            "{:<20} {:<28} {:>8} {:>9}",
            channel.id.as_str(),
            channel.name,
            format_percent(channel.commission_rate),
            if channel.has_delivery { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pizzeria_pricing_core::{
        CompositionEntry, Ingredient, IngredientCatalog, OperatingCosts, PizzaSize, RecipeId,
        RecipeSizeComposition, Unit, compute_channel_pricing,
    };

    use super::*;

    #[test]
    fn test_format_money_rounds_half_away_from_zero() {
        assert_eq!(format_money(30.5), "30.50");
        assert_eq!(format_money(25.925), "25.93");
        assert_eq!(format_money(-1.125), "-1.13");
        assert_eq!(format_money(f64::NAN), "n/a");
        assert_eq!(format_money(f64::INFINITY), "n/a");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.764_705_88), "76.5%");
        assert_eq!(format_percent(0.15), "15.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_write_pricing_marks_fallback_channels() {
        let catalog: IngredientCatalog = [Ingredient::new("cheese", "Mozzarella", Unit::Kg, 20.0)]
            .into_iter()
            .collect();
        let costs = OperatingCosts {
            monthly_sales_volume: 100.0,
            ..OperatingCosts::default()
        };
        let channels = vec![
            SalesChannel::new("counter", "Counter", 0.0, false),
            SalesChannel::new("greedy", "Greedy app", 0.5, false),
        ];
        let result = compute_channel_pricing(
            &RecipeId::new("margherita"),
            PizzaSize::Medium,
            &RecipeSizeComposition::new(vec![CompositionEntry::new("cheese", 0.2)]),
            &catalog,
            &costs,
            &channels,
            0.6,
        );

        let mut out = Vec::new();
        write_pricing(&mut out, "Margherita", &result, &channels).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Margherita (M) - target margin 60.0%"));
        assert!(text.contains("total cost 4.00"));
        // Counter: 4.00 / 0.4
        assert!(text.contains("10.00"));
        // Greedy app falls back to twice the cost.
        assert!(text.lines().any(|l| l.contains("Greedy app") && l.ends_with(" *")));
        assert!(text.contains("target margin not met"));
    }

    #[test]
    fn test_write_channels_lists_reference_table() {
        let mut out = Vec::new();
        write_channels(&mut out, &SalesChannel::reference_table()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("marketplace_full"));
        assert!(text.contains("23.0%"));
    }
}
