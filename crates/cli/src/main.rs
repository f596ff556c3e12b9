//! Pizzeria Pricing CLI - cost breakdowns and channel prices from data snapshots.
//!
//! # Usage
//!
//! ```bash
//! # Suggested prices per channel for every size of a recipe
//! pp-cli price -s pizzeria.yaml -r margherita
//!
//! # A single size at a 60% target margin, as JSON
//! pp-cli price -s pizzeria.yaml -r margherita --size M -m 60% -f json
//!
//! # Ingredient and operating cost per recipe size
//! pp-cli costs -s pizzeria.yaml
//!
//! # Validate a snapshot before pricing
//! pp-cli check -s pizzeria.yaml
//!
//! # Show the reference channel table
//! pp-cli channels
//! ```
//!
//! # Commands
//!
//! - `price` - Suggested price, profit and realized margin per channel
//! - `costs` - Cost breakdown of every recipe size
//! - `check` - Validate a snapshot
//! - `channels` - List sales channels

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pizzeria_pricing_core::PizzaSize;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod report;
mod snapshot;

use config::{CliConfig, LogFormat, OutputFormat, parse_margin};

#[derive(Parser)]
#[command(name = "pp-cli")]
#[command(author, version, about = "Pizzeria pricing CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a recipe across every sales channel
    Price {
        /// Snapshot file (.yaml, .yml or .json)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Recipe id
        #[arg(short, long)]
        recipe: String,

        /// Only this size (P, M, G, GG)
        #[arg(long)]
        size: Option<PizzaSize>,

        /// Target margin, fraction (0.65) or percentage (65%)
        #[arg(short, long, value_parser = parse_margin)]
        margin: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Price channels whose fee plus margin reaches 100% at twice the cost
        #[arg(long)]
        allow_fallback: bool,
    },
    /// Show the cost breakdown of every recipe size
    Costs {
        /// Snapshot file (.yaml, .yml or .json)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Validate a snapshot
    Check {
        /// Snapshot file (.yaml, .yml or .json)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Target margin, fraction (0.65) or percentage (65%)
        #[arg(short, long, value_parser = parse_margin)]
        margin: Option<f64>,
    },
    /// List sales channels
    Channels {
        /// Snapshot file; the reference table is shown when omitted
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = CliConfig::from_env();

    // Initialize tracing
    init_tracing(config.as_ref().map_or(LogFormat::Text, |c| c.log_format));

    let result: Result<(), Box<dyn std::error::Error>> = config
        .map_err(Into::into)
        .and_then(|config| run(cli, &config));

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: Cli, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Price {
            snapshot,
            recipe,
            size,
            margin,
            format,
            allow_fallback,
        } => {
            let options = commands::price::PriceOptions {
                snapshot,
                recipe,
                size,
                margin,
                output: format,
                allow_fallback,
            };
            commands::price::run(&options, config)?;
        }
        Commands::Costs { snapshot, format } => {
            commands::costs::run(snapshot.as_ref(), format, config)?;
        }
        Commands::Check { snapshot, margin } => {
            commands::check::run(snapshot.as_ref(), margin, config)?;
        }
        Commands::Channels { snapshot, format } => {
            commands::channels::run(snapshot.as_ref(), format, config)?;
        }
    }
    Ok(())
}
