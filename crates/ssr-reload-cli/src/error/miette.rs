//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use ::miette::{miette, Report};
use ssr_reload::{ConfigError, ReloadError};

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Reload(ReloadError::Bind { addr, source }) => miette!(
            "Failed to bind reload server to {}: {}\n\nHint: Another process may be using the port; pick a different one with --port",
            addr,
            source
        ),
        _ => miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::MissingField { field, hint } => miette!(
            "Missing required option: {}\n\nHint: {}\nSet it in ssr-reload.toml, via SSR_RELOAD_{}, or with a command-line flag",
            field,
            hint,
            env_suffix(&field)
        ),
        other => miette!("Configuration error: {}", other),
    }
}

/// `reloadDelayMs` -> `RELOAD_DELAY_MS`
fn env_suffix(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}
