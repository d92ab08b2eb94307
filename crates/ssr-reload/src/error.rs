//! Error types for reload coordination.
//!
//! Only construction can fail loudly. Everything that happens while builds are
//! running (pinging, pushing reload events, writing artifacts) is best-effort:
//! those paths build a [`ReloadError`] purely so it can be logged with context,
//! and never hand it back to the build tool.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the reload core.
#[derive(Debug, Error)]
pub enum ReloadError {
    /// Plugin options were missing or invalid at construction time
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The ready-server could not bind its listener
    #[error("Failed to bind reload server to {addr}: {source}")]
    Bind {
        /// Address the listener tried to bind
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The outbound ready-ping never got a response
    #[error("Ready-ping transport error: {0}")]
    Transport(String),

    /// The ready-server answered the ping with something other than 200
    #[error("Reloading server responded with status {status}")]
    ProtocolMismatch {
        /// HTTP status returned by the ready-server
        status: u16,
    },

    /// Writing an artifact (or creating its directory) failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Target path of the failed operation
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ready-server task stopped unexpectedly
    #[error("Reload server stopped: {0}")]
    Server(String),

    /// I/O errors not tied to a specific artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plugin option validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory option was absent, empty, or zero
    #[error("Missing required option: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing option (as spelled in config files)
        field: String,
        /// Helpful hint for providing the option
        hint: String,
    },

    /// An option was present but unusable
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the option
        field: String,
        /// The rejected value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

impl ConfigError {
    pub(crate) fn missing(field: &str, hint: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
            hint: hint.to_string(),
        }
    }
}

impl ReloadError {
    pub(crate) fn bind(host: &str, port: u16, source: std::io::Error) -> Self {
        Self::Bind {
            addr: format!("{host}:{port}"),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`ReloadError`] as the default error type.
pub type Result<T, E = ReloadError> = std::result::Result<T, E>;
