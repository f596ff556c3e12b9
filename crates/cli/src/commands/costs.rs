//! Cost breakdown of every recipe.
//!
//! # Usage
//!
//! ```bash
//! pp-cli costs -s pizzeria.yaml
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use pizzeria_pricing_core::validation::validate_operating_costs;
use pizzeria_pricing_core::{
    IngredientCatalog, OperatingCosts, PizzaSize, Recipe, RecipeId, compute_delivery_cost,
    compute_fixed_costs_per_order, compute_operating_cost_per_order,
};
use serde::Serialize;
use tracing::error;

use super::{CommandError, load_snapshot};
use crate::config::{CliConfig, OutputFormat};
use crate::report::format_money;

/// Cost of one recipe size.
#[derive(Debug, Clone, Serialize)]
pub struct CostRow {
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub size: PizzaSize,
    pub ingredient_cost: f64,
    pub operating_cost: f64,
    pub total_cost: f64,
}

/// Full cost report.
#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    pub fixed_costs_per_order: f64,
    pub delivery_cost_per_order: f64,
    pub rows: Vec<CostRow>,
}

/// Build the cost report for every recipe size, in snapshot order.
#[must_use]
pub fn build_report(
    recipes: &[Recipe],
    catalog: &IngredientCatalog,
    costs: &OperatingCosts,
) -> CostReport {
    let rows = recipes
        .iter()
        .flat_map(|recipe| {
            let mut recipe = recipe.clone();
            recipe.refresh_costs(catalog);
            recipe
                .sizes
                .iter()
                .map(|(&size, composition)| {
                    let operating_cost = compute_operating_cost_per_order(costs, size);
                    CostRow {
                        recipe_id: recipe.id.clone(),
                        recipe_name: recipe.name.clone(),
                        size,
                        ingredient_cost: composition.cost_total,
                        operating_cost,
                        total_cost: composition.cost_total + operating_cost,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    CostReport {
        fixed_costs_per_order: compute_fixed_costs_per_order(costs),
        delivery_cost_per_order: compute_delivery_cost(costs),
        rows,
    }
}

/// Print the cost report.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the operating costs are
/// invalid, or the report cannot be written.
pub fn run(
    snapshot: Option<&PathBuf>,
    output: Option<OutputFormat>,
    config: &CliConfig,
) -> Result<(), CommandError> {
    let snapshot = load_snapshot(snapshot, config)?;

    let blocking: Vec<_> = validate_operating_costs(&snapshot.operating_costs)
        .into_iter()
        .filter(|finding| finding.is_blocking())
        .collect();
    if !blocking.is_empty() {
        for finding in &blocking {
            error!("{finding}");
        }
        return Err(CommandError::Validation(blocking.len()));
    }

    let report = build_report(
        &snapshot.recipes,
        &snapshot.catalog(),
        &snapshot.operating_costs,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match output.unwrap_or(config.output) {
        OutputFormat::Table => write_table(&mut out, &report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_table(out: &mut impl Write, report: &CostReport) -> io::Result<()> {
    writeln!(
        out,
        "fixed costs per order {}  delivery cost per order {}",
        format_money(report.fixed_costs_per_order),
        format_money(report.delivery_cost_per_order)
    )?;
    writeln!(
        out,
        "{:<28} {:>4} {:>11} {:>10} {:>10}",
        "recipe", "size", "ingredients", "operating", "total"
    )?;
    for row in &report.rows {
        writeln!(
            out,
            "{:<28} {:>4} {:>11} {:>10} {:>10}",
            row.recipe_name,
            row.size.label(),
            format_money(row.ingredient_cost),
            format_money(row.operating_cost),
            format_money(row.total_cost)
        )?;
    }
    Ok(())
}
