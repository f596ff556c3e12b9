//! Subcommand implementations.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::CliConfig;
use crate::snapshot::{Snapshot, SnapshotError};

pub mod channels;
pub mod check;
pub mod costs;
pub mod price;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Neither `--snapshot` nor `PRICING_SNAPSHOT` names a file.
    #[error("No snapshot given. Pass --snapshot or set PRICING_SNAPSHOT")]
    MissingSnapshot,

    /// The snapshot could not be loaded.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The recipe does not offer the requested size.
    #[error("Recipe {recipe} has no size {size}")]
    SizeNotOffered { recipe: String, size: String },

    /// Blocking validation findings.
    #[error("{0} blocking validation error(s) found")]
    Validation(usize),

    /// Writing the report failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding of the report failed.
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolve the snapshot path from the command line, then the environment.
fn snapshot_path<'a>(
    arg: Option<&'a Path>,
    config: &'a CliConfig,
) -> Result<&'a Path, CommandError> {
    arg.or(config.snapshot_path.as_deref())
        .ok_or(CommandError::MissingSnapshot)
}

/// Load the snapshot named on the command line or in the environment.
fn load_snapshot(arg: Option<&PathBuf>, config: &CliConfig) -> Result<Snapshot, CommandError> {
    let path = snapshot_path(arg.map(PathBuf::as_path), config)?;
    tracing::info!(path = %path.display(), "Loading snapshot");
    let snapshot = Snapshot::load(path)?;
    tracing::info!(
        ingredients = snapshot.ingredients.len(),
        recipes = snapshot.recipes.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::{LogFormat, OutputFormat};

    use super::*;

    fn config(snapshot: Option<&str>) -> CliConfig {
        CliConfig {
            snapshot_path: snapshot.map(PathBuf::from),
            target_margin: 0.65,
            output: OutputFormat::Table,
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn test_argument_wins_over_environment() {
        let config = config(Some("env.yaml"));
        let path = snapshot_path(Some(Path::new("arg.yaml")), &config).unwrap();
        assert_eq!(path, Path::new("arg.yaml"));
    }

    #[test]
    fn test_environment_fallback() {
        let config = config(Some("env.yaml"));
        assert_eq!(snapshot_path(None, &config).unwrap(), Path::new("env.yaml"));
    }

    #[test]
    fn test_missing_snapshot() {
        let err = snapshot_path(None, &config(None)).unwrap_err();
        assert!(matches!(err, CommandError::MissingSnapshot));
    }
}
