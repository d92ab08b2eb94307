//! Error handling for the ssr-reload CLI.
//!
//! Command functions return [`CliError`]; `main` turns it into a miette report
//! (see [`cli_error_to_miette`]).

mod miette;

pub use self::miette::cli_error_to_miette;

use ssr_reload::{ConfigError, ReloadError};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or invalid reload options
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration sources could not be read or merged
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// Errors from the reload core (binding the ready-server)
    #[error(transparent)]
    Reload(ReloadError),

    /// Config file given with --config does not exist
    #[error("Config file not found: {}\n\nHint: Create ssr-reload.toml or pass an existing file to --config", .0.display())]
    ConfigNotFound(PathBuf),

    /// Asset directory for the client command does not exist
    #[error("Asset directory not found: {}", .0.display())]
    AssetsNotFound(PathBuf),

    /// Walking the asset directory failed
    #[error("Failed to read assets: {0}")]
    Walk(#[from] walkdir::Error),

    /// The blocking directory walk panicked or was cancelled
    #[error("Asset walk did not complete: {0}")]
    WalkTask(#[from] tokio::task::JoinError),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReloadError> for CliError {
    fn from(err: ReloadError) -> Self {
        match err {
            ReloadError::Config(e) => CliError::Config(e),
            other => CliError::Reload(other),
        }
    }
}

/// Result type alias using [`CliError`] as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_config_error_is_unwrapped() {
        let err: CliError = ReloadError::Config(ConfigError::MissingField {
            field: "host".to_string(),
            hint: "Set --host".to_string(),
        })
        .into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("Missing required option: host"));
    }

    #[test]
    fn test_reload_error_is_transparent() {
        let err: CliError = ReloadError::Transport("refused".to_string()).into();
        assert_eq!(err.to_string(), "Ready-ping transport error: refused");
    }

    #[test]
    fn test_config_not_found_has_hint() {
        let err = CliError::ConfigNotFound(PathBuf::from("missing.toml"));
        let msg = err.to_string();
        assert!(msg.contains("missing.toml"));
        assert!(msg.contains("Hint:"));
    }
}
