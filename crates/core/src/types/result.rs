//! Pricing computation results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ChannelId, RecipeId};
use super::recipe::PizzaSize;

/// Pricing figures for one sales channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPricing {
    pub commission_rate: f64,
    /// Per-order delivery cost, zero for channels without delivery.
    pub delivery_cost: f64,
    /// `total_cost + delivery_cost`.
    pub total_channel_cost: f64,
    pub suggested_price: f64,
    pub realized_margin: f64,
    /// `suggested_price × (1 − commission_rate)`.
    pub net_revenue: f64,
    /// `net_revenue − total_channel_cost`.
    pub net_profit: f64,
    /// The requested margin plus commission left no room for a price, so the
    /// suggested price is `total_channel_cost × 2` instead.
    #[serde(default)]
    pub price_fallback: bool,
}

/// Output of one pricing computation for a recipe size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub recipe_id: RecipeId,
    pub size: PizzaSize,
    pub ingredient_cost: f64,
    pub operating_cost: f64,
    pub total_cost: f64,
    pub target_margin: f64,
    pub channels: BTreeMap<ChannelId, ChannelPricing>,
    /// Metadata only. No numeric field depends on it.
    pub computed_at: DateTime<Utc>,
}

impl PricingResult {
    /// Compare every field except `computed_at`.
    ///
    /// Callers keeping the latest result per recipe and size use this to tell
    /// a real change from a recomputation of the same snapshot.
    #[must_use]
    pub fn same_figures(&self, other: &Self) -> bool {
        self.recipe_id == other.recipe_id
            && self.size == other.size
            && self.ingredient_cost.to_bits() == other.ingredient_cost.to_bits()
            && self.operating_cost.to_bits() == other.operating_cost.to_bits()
            && self.total_cost.to_bits() == other.total_cost.to_bits()
            && self.target_margin.to_bits() == other.target_margin.to_bits()
            && self.channels.len() == other.channels.len()
            && self
                .channels
                .iter()
                .zip(&other.channels)
                .all(|((a_id, a), (b_id, b))| a_id == b_id && a.same_figures(b))
    }

    /// Channel with the highest net profit per order.
    ///
    /// Channels whose profit is NaN never win. Ties keep the first channel in
    /// id order.
    #[must_use]
    pub fn best_channel(&self) -> Option<(&ChannelId, &ChannelPricing)> {
        self.channels
            .iter()
            .filter(|(_, pricing)| !pricing.net_profit.is_nan())
            .fold(None, |best, candidate| match best {
                Some((_, current)) if candidate.1.net_profit <= current.net_profit => best,
                _ => Some(candidate),
            })
    }
}

impl ChannelPricing {
    /// Bitwise comparison of every figure, so NaN results compare equal to
    /// themselves.
    #[must_use]
    pub fn same_figures(&self, other: &Self) -> bool {
        let figures = |p: &Self| {
            [
                p.commission_rate,
                p.delivery_cost,
                p.total_channel_cost,
                p.suggested_price,
                p.realized_margin,
                p.net_revenue,
                p.net_profit,
            ]
            .map(f64::to_bits)
        };
        figures(self) == figures(other) && self.price_fallback == other.price_fallback
    }
}
