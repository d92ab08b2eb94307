//! Client command implementation.
//!
//! Hosts the client side of the reload protocol: keeps the ready-server up,
//! re-emits the asset directory on demand, and reports each cycle as a
//! finished client build.

use crate::cli::ClientArgs;
use crate::commands::assets::AssetSnapshot;
use crate::config::ReloadFileConfig;
use crate::error::{CliError, Result};
use crate::ui;
use ssr_reload::{BuildHooks, ClientPlugin, NativeFileSystem, OutputFileSystem};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

/// Execute the client command.
///
/// # Errors
///
/// Fails on invalid configuration, when the ready-server cannot bind, or when
/// the first emit cycle cannot read the asset directory. Later cycles only
/// report their errors.
pub async fn execute(args: ClientArgs, config_path: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = ReloadFileConfig::load(&cwd, config_path, &args.overrides)?;

    if !args.assets.is_dir() {
        return Err(CliError::AssetsNotFound(args.assets));
    }

    let plugin = Arc::new(ClientPlugin::new(config.client_options()).await?);
    ui::success(&format!(
        "Reload server ready at {}",
        plugin.config().address.url()
    ));

    let mut hooks = BuildHooks::new();
    hooks.register(plugin.clone());

    let fs = NativeFileSystem::new();
    let mut cycle = EmitCycle {
        hooks: &hooks,
        plugin: plugin.as_ref(),
        fs: &fs,
        snapshot: AssetSnapshot::default(),
        assets_dir: &args.assets,
        out_dir: &args.out_dir,
    };

    cycle.run().await?;
    if args.once {
        return Ok(());
    }

    ui::info("Press Enter after each client rebuild to re-emit. Ctrl+C stops the server.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(_)) => {
                        if let Err(e) = cycle.run().await {
                            ui::error(&e.to_string());
                        }
                    }
                    Ok(None) => {
                        tracing::debug!("stdin closed; serving until interrupted");
                        stdin_open = false;
                    }
                    Err(e) => {
                        ui::warning(&format!("Failed to read stdin: {}", e));
                        stdin_open = false;
                    }
                }
            }

            _ = signal::ctrl_c() => {
                ui::info("Shutting down reload server...");
                break;
            }
        }
    }

    Ok(())
}

struct EmitCycle<'a> {
    hooks: &'a BuildHooks,
    plugin: &'a ClientPlugin,
    fs: &'a dyn OutputFileSystem,
    snapshot: AssetSnapshot,
    assets_dir: &'a Path,
    out_dir: &'a Path,
}

impl EmitCycle<'_> {
    /// Collect, emit, then report the client build as done.
    async fn run(&mut self) -> Result<()> {
        let mut compilation = self
            .snapshot
            .collect(self.assets_dir, self.out_dir)
            .await?;

        self.hooks.run_emit(&mut compilation, self.fs).await;
        self.snapshot.record(&compilation);

        let summary = self.plugin.last_emit_summary().unwrap_or_default();
        if summary.aborted {
            ui::error(&format!(
                "Could not create output directory {}",
                self.out_dir.display()
            ));
        } else {
            ui::success(&format!(
                "Wrote {} assets to {} ({} unchanged)",
                summary.written,
                self.out_dir.display(),
                summary.skipped
            ));
        }
        if summary.failed > 0 {
            ui::warning(&format!("{} assets failed to write", summary.failed));
        }

        self.hooks.run_done().await;
        Ok(())
    }
}
