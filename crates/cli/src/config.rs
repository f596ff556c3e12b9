//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PRICING_SNAPSHOT` - Snapshot file used when `--snapshot` is not given
//! - `PRICING_TARGET_MARGIN` - Default target margin, fraction or percentage (default: 0.65)
//! - `PRICING_OUTPUT` - Report format, `table` or `json` (default: table)
//! - `PRICING_LOG_FORMAT` - Log format, `text` or `json` (default: text)
//! - `RUST_LOG` - Log filter (default: info)

use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use thiserror::Error;

const DEFAULT_TARGET_MARGIN: &str = "0.65";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Errors that can occur when parsing a margin argument.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarginParseError {
    /// The input string is empty.
    #[error("margin cannot be empty")]
    Empty,
    /// The input is not a number.
    #[error("margin must be a fraction (0.65) or a percentage (65%), got {0:?}")]
    Invalid(String),
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Snapshot used when the command line names none
    pub snapshot_path: Option<PathBuf>,
    /// Target margin used when the command line and snapshot name none
    pub target_margin: f64,
    /// Report format
    pub output: OutputFormat,
    /// Log format
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key-value source.
    fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = get("PRICING_SNAPSHOT")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let margin = get_or_default(&get, "PRICING_TARGET_MARGIN", DEFAULT_TARGET_MARGIN);
        let target_margin = parse_margin(&margin).map_err(|e| {
            ConfigError::InvalidEnvVar("PRICING_TARGET_MARGIN".to_string(), e.to_string())
        })?;

        let output = get_or_default(&get, "PRICING_OUTPUT", "table")
            .parse::<OutputFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRICING_OUTPUT".to_string(), e))?;

        let log_format = get_or_default(&get, "PRICING_LOG_FORMAT", "text")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRICING_LOG_FORMAT".to_string(), e))?;

        Ok(Self {
            snapshot_path,
            target_margin,
            output,
            log_format,
        })
    }
}

/// Parse a margin given as a fraction (`0.65`) or a percentage (`65%`).
///
/// Range checks are left to validation so the message names the context.
///
/// # Errors
///
/// Returns an error if the input is empty or not a number.
pub fn parse_margin(input: &str) -> Result<f64, MarginParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MarginParseError::Empty);
    }

    let (number, scale) = trimmed
        .strip_suffix('%')
        .map_or((trimmed, 1.0), |n| (n.trim_end(), 100.0));

    number
        .parse::<f64>()
        .map(|value| value / scale)
        .map_err(|_| MarginParseError::Invalid(input.to_owned()))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(get: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get(key).unwrap_or_else(|| default.to_string())
}
