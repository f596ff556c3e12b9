//! Snapshot validation.
//!
//! # Usage
//!
//! ```bash
//! pp-cli check -s pizzeria.yaml
//! pp-cli check -s pizzeria.yaml -m 70%
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use pizzeria_pricing_core::PricingInputError;
use pizzeria_pricing_core::validation::{
    validate_channels, validate_ingredients, validate_operating_costs, validate_recipe,
    validate_target_margin,
};
use tracing::info;

use super::{CommandError, load_snapshot};
use crate::config::CliConfig;
use crate::snapshot::Snapshot;

/// Every finding for a snapshot, configuration first, then recipes in order.
#[must_use]
pub fn collect_findings(snapshot: &Snapshot, target_margin: f64) -> Vec<PricingInputError> {
    let catalog = snapshot.catalog();
    let mut findings = Vec::new();
    if let Err(e) = validate_target_margin(target_margin) {
        findings.push(e);
    }
    findings.extend(validate_ingredients(&snapshot.ingredients));
    findings.extend(validate_operating_costs(&snapshot.operating_costs));
    findings.extend(validate_channels(&snapshot.channels(), target_margin));
    for recipe in &snapshot.recipes {
        findings.extend(validate_recipe(recipe, &catalog));
    }
    findings
}

/// Validate a snapshot and print every finding.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or blocking findings exist.
pub fn run(
    snapshot: Option<&PathBuf>,
    margin: Option<f64>,
    config: &CliConfig,
) -> Result<(), CommandError> {
    let snapshot = load_snapshot(snapshot, config)?;
    let margin = margin
        .or(snapshot.target_margin)
        .unwrap_or(config.target_margin);

    let findings = collect_findings(&snapshot, margin);
    let blocking = findings.iter().filter(|f| f.is_blocking()).count();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for finding in &findings {
        let level = if finding.is_blocking() { "error" } else { "warning" };
        writeln!(out, "{level}: {finding}")?;
    }

    info!(
        findings = findings.len(),
        blocking,
        recipes = snapshot.recipes.len(),
        "Validation complete"
    );

    if blocking > 0 {
        return Err(CommandError::Validation(blocking));
    }
    writeln!(out, "ok: snapshot can be priced")?;
    Ok(())
}
