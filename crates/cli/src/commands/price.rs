//! Channel pricing for a recipe.
//!
//! # Usage
//!
//! ```bash
//! # Price every size of a recipe at the configured margin
//! pp-cli price -s pizzeria.yaml -r margherita
//!
//! # One size, explicit margin, JSON output
//! pp-cli price -s pizzeria.yaml -r margherita --size GG -m 60% -f json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use pizzeria_pricing_core::validation::validate_ingredients;
use pizzeria_pricing_core::{
    PizzaSize, PricingInputError, PricingResult, compute_channel_pricing, price_recipe,
    validate_pricing_inputs,
};
use tracing::{error, info, warn};

use super::{CommandError, load_snapshot};
use crate::config::{CliConfig, OutputFormat};
use crate::report;

/// Options of the `price` command.
#[derive(Debug, Clone)]
pub struct PriceOptions {
    pub snapshot: Option<PathBuf>,
    pub recipe: String,
    pub size: Option<PizzaSize>,
    pub margin: Option<f64>,
    pub output: Option<OutputFormat>,
    /// Price degenerate channels with the ×2 fallback instead of refusing.
    pub allow_fallback: bool,
}

/// Price a recipe across every channel and print the report.
///
/// The margin comes from the command line, then the snapshot, then the
/// environment.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the recipe or size does
/// not exist, validation finds blocking problems, or the report cannot be
/// written.
pub fn run(options: &PriceOptions, config: &CliConfig) -> Result<(), CommandError> {
    let snapshot = load_snapshot(options.snapshot.as_ref(), config)?;
    let recipe = snapshot.recipe(&options.recipe)?;
    let catalog = snapshot.catalog();
    let channels = snapshot.channels();
    let costs = &snapshot.operating_costs;
    let margin = options
        .margin
        .or(snapshot.target_margin)
        .unwrap_or(config.target_margin);

    let mut findings = validate_ingredients(&snapshot.ingredients);
    findings.extend(validate_pricing_inputs(recipe, &catalog, costs, &channels, margin));
    let blocking = report_findings(&findings, options.allow_fallback);
    if blocking > 0 {
        return Err(CommandError::Validation(blocking));
    }

    let results = match options.size {
        Some(size) => {
            let composition = recipe
                .composition(size)
                .ok_or_else(|| CommandError::SizeNotOffered {
                    recipe: recipe.id.to_string(),
                    size: size.to_string(),
                })?;
            vec![compute_channel_pricing(
                &recipe.id,
                size,
                composition,
                &catalog,
                costs,
                &channels,
                margin,
            )]
        }
        None => price_recipe(recipe, &catalog, costs, &channels, margin),
    };

    info!(recipe = %recipe.id, sizes = results.len(), margin, "Priced recipe");
    warn_fallbacks(&results);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.output.unwrap_or(config.output) {
        OutputFormat::Table => {
            for result in &results {
                report::write_pricing(&mut out, &recipe.name, result, &channels)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &results)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Log findings and count those that must stop pricing.
fn report_findings(findings: &[PricingInputError], allow_fallback: bool) -> usize {
    let mut blocking = 0;
    for finding in findings {
        let downgraded =
            allow_fallback && matches!(finding, PricingInputError::DegenerateChannel { .. });
        if finding.is_blocking() && !downgraded {
            error!("{finding}");
            blocking += 1;
        } else {
            warn!("{finding}");
        }
    }
    blocking
}

fn warn_fallbacks(results: &[PricingResult]) {
    for result in results {
        for (channel, pricing) in &result.channels {
            if pricing.price_fallback {
                warn!(
                    size = %result.size,
                    channel = %channel,
                    price = pricing.suggested_price,
                    "Target margin unreachable, price falls back to twice the cost"
                );
            }
        }
    }
}
