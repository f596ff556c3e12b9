//! Operating cost configuration.
//!
//! Costs come in three groups:
//! - [`MonthlyFixedCosts`] - rationed over `monthly_sales_volume` orders
//! - [`PackagingCosts`] - paid once per order (box by size, bag, napkins, sachets)
//! - [`DeliveryCosts`] - paid once per delivered order
//!
//! Every field defaults to zero when absent, so a partially filled
//! configuration still deserializes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::recipe::PizzaSize;

/// A named free-form cost item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub name: String,
    pub amount: f64,
}

impl CostLine {
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

fn sum_lines(lines: &[CostLine]) -> f64 {
    lines.iter().map(|line| line.amount).sum()
}

/// Fixed costs paid every month regardless of volume.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyFixedCosts {
    pub rent: f64,
    pub electricity: f64,
    pub water: f64,
    pub gas: f64,
    pub internet: f64,
    pub payroll: f64,
    pub payroll_taxes: f64,
    pub accounting: f64,
    pub marketing: f64,
    pub software: f64,
    pub other: Vec<CostLine>,
}

impl MonthlyFixedCosts {
    /// Sum of every fixed line item.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.rent
            + self.electricity
            + self.water
            + self.gas
            + self.internet
            + self.payroll
            + self.payroll_taxes
            + self.accounting
            + self.marketing
            + self.software
            + sum_lines(&self.other)
    }
}

/// Per-order packaging and condiment costs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingCosts {
    /// Pizza box cost keyed by size. Missing sizes cost nothing.
    pub box_by_size: BTreeMap<PizzaSize, f64>,
    pub bag: f64,
    pub napkin: f64,
    pub paper: f64,
    /// Sachets and condiments sent with every order.
    pub condiments: Vec<CostLine>,
}

impl PackagingCosts {
    /// Box cost for `size`, zero when not configured.
    #[must_use]
    pub fn box_cost(&self, size: PizzaSize) -> f64 {
        self.box_by_size.get(&size).copied().unwrap_or_default()
    }

    /// Packaging items paid once per order whatever the size.
    #[must_use]
    pub fn flat_total(&self) -> f64 {
        self.bag + self.napkin + self.paper
    }

    #[must_use]
    pub fn condiments_total(&self) -> f64 {
        sum_lines(&self.condiments)
    }
}

/// Costs paid for every delivered order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryCosts {
    pub fuel: f64,
    pub maintenance: f64,
    pub courier: f64,
    pub insurance: f64,
    pub other: Vec<CostLine>,
}

impl DeliveryCosts {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.fuel + self.maintenance + self.courier + self.insurance + sum_lines(&self.other)
    }
}

/// Complete operating cost configuration of the pizzeria.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingCosts {
    pub fixed: MonthlyFixedCosts,
    pub packaging: PackagingCosts,
    pub delivery: DeliveryCosts,
    /// Orders sold per month. Fixed costs are divided by this number, so it
    /// must be positive before the engine is invoked.
    pub monthly_sales_volume: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_total_includes_other_lines() {
        let fixed = MonthlyFixedCosts {
            rent: 3000.0,
            payroll: 6000.0,
            other: vec![CostLine::new("pest control", 150.0)],
            ..MonthlyFixedCosts::default()
        };
        assert!((fixed.total() - 9150.0).abs() < 1e-9);
    }

    #[test]
    fn test_box_cost_defaults_to_zero() {
        let packaging = PackagingCosts {
            box_by_size: BTreeMap::from([(PizzaSize::Medium, 0.5)]),
            ..PackagingCosts::default()
        };
        assert!((packaging.box_cost(PizzaSize::Medium) - 0.5).abs() < f64::EPSILON);
        assert!(packaging.box_cost(PizzaSize::ExtraLarge).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_config_deserializes() {
        let json = r#"{
            "fixed": {"rent": 1000},
            "packaging": {"box_by_size": {"M": 0.5, "GG": 1.2}, "bag": 0.3},
            "monthly_sales_volume": 1000
        }"#;
        let costs: OperatingCosts = serde_json::from_str(json).unwrap();

        assert!((costs.fixed.total() - 1000.0).abs() < f64::EPSILON);
        assert!((costs.packaging.box_cost(PizzaSize::ExtraLarge) - 1.2).abs() < f64::EPSILON);
        assert!(costs.delivery.total().abs() < f64::EPSILON);
    }
}
