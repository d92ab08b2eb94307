//! Check command implementation.
//!
//! Validates configuration without binding or pinging anything.

use crate::cli::CheckArgs;
use crate::config::ReloadFileConfig;
use crate::error::Result;
use crate::ui;
use ssr_reload::{ClientConfig, ServerConfig};
use std::path::Path;

/// Execute the check command.
///
/// # Errors
///
/// Returns the first missing or invalid option of the checked side(s).
pub async fn execute(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    ui::info("Checking configuration...");

    let cwd = std::env::current_dir()?;
    let config = ReloadFileConfig::load(&cwd, config_path, &args.overrides)?;

    if !args.server_only {
        let client = ClientConfig::try_from(config.client_options())?;
        ui::success(&format!(
            "Client: ready-server at {}, pushing to {}",
            client.address.url(),
            client.app_origin
        ));
        ui::info(&format!(
            "  template matcher \"{}\", reload delay {}ms",
            client.template_matcher,
            client.reload_delay_ms()
        ));
    }

    if !args.client_only {
        let server = ServerConfig::try_from(config.server_options())?;
        ui::success(&format!("Server: pings {}", server.address.ping_url()));
    }

    ui::success("Configuration is valid!");
    Ok(())
}
