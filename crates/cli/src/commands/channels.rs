//! Channel table listing.
//!
//! # Usage
//!
//! ```bash
//! # Reference table
//! pp-cli channels
//!
//! # Channels of a snapshot
//! pp-cli channels -s pizzeria.yaml
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use pizzeria_pricing_core::SalesChannel;

use super::{CommandError, load_snapshot};
use crate::config::{CliConfig, OutputFormat};
use crate::report;

/// Print the channel table of a snapshot, or the reference table.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the table cannot be
/// written.
pub fn run(
    snapshot: Option<&PathBuf>,
    output: Option<OutputFormat>,
    config: &CliConfig,
) -> Result<(), CommandError> {
    let channels = match snapshot {
        Some(path) => load_snapshot(Some(path), config)?.channels(),
        None => SalesChannel::reference_table(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match output.unwrap_or(config.output) {
        OutputFormat::Table => report::write_channels(&mut out, &channels)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &channels)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
