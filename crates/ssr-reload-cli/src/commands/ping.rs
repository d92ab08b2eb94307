//! Ping command implementation.
//!
//! Reports a finished server build to the ready-server. The ping is
//! best-effort, so only configuration problems make this command fail.

use crate::cli::PingArgs;
use crate::config::ReloadFileConfig;
use crate::error::Result;
use crate::ui;
use ssr_reload::{PingOutcome, ServerPlugin};
use std::path::Path;

/// Execute the ping command.
pub async fn execute(args: PingArgs, config_path: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = ReloadFileConfig::load(&cwd, config_path, &args.overrides)?;
    let plugin = ServerPlugin::new(config.server_options())?;
    let url = plugin.config().address.url();

    match plugin.ping().await {
        PingOutcome::Acknowledged => {
            ui::success(&format!("Ready-server at {} acknowledged the server build", url));
        }
        PingOutcome::UnexpectedStatus(status) => {
            ui::warning(&format!(
                "Ready-server at {} responded with status {}",
                url, status
            ));
        }
        PingOutcome::Failed(reason) => {
            ui::warning(&format!("Ready-server at {} is unreachable: {}", url, reason));
        }
    }

    Ok(())
}
