//! Sales channels and the reference channel table.

use serde::{Deserialize, Serialize};

use super::id::ChannelId;

/// A channel the pizzeria sells through.
///
/// `commission_rate` is a fraction of the sale price kept by the channel
/// (`0.12` for 12%). Delivery costs are only charged to channels where the
/// pizzeria itself delivers (`has_delivery`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesChannel {
    pub id: ChannelId,
    pub name: String,
    #[serde(default)]
    pub commission_rate: f64,
    #[serde(default)]
    pub has_delivery: bool,
}

impl SalesChannel {
    #[must_use]
    pub fn new(
        id: impl Into<ChannelId>,
        name: impl Into<String>,
        commission_rate: f64,
        has_delivery: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            commission_rate,
            has_delivery,
        }
    }

    /// The fixed reference channel set.
    ///
    /// | id                   | commission | delivery |
    /// |----------------------|------------|----------|
    /// | `counter`            | 0%         | no       |
    /// | `own_delivery`       | 0%         | yes      |
    /// | `marketplace_basic`  | 12%        | yes      |
    /// | `marketplace_full`   | 23%        | no       |
    ///
    /// The basic marketplace plan leaves the delivery to the restaurant, the
    /// full plan includes the app's courier.
    #[must_use]
    pub fn reference_table() -> Vec<Self> {
        vec![
            Self::new("counter", "Counter / pickup", 0.0, false),
            Self::new("own_delivery", "Own delivery", 0.0, true),
            Self::new("marketplace_basic", "Marketplace (own courier)", 0.12, true),
            Self::new("marketplace_full", "Marketplace (app courier)", 0.23, false),
        ]
    }
}
