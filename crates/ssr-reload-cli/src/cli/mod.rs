//! Command-line interface definition for ssr-reload.
//!
//! # Command Structure
//!
//! - `ssr-reload client` - Run the ready-server and rewrite client build output
//! - `ssr-reload ping` - Signal that the server bundle finished
//! - `ssr-reload check` - Validate configuration

mod commands;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{CheckArgs, ClientArgs, Command, OverrideArgs, PingArgs};
pub use validation::parse_protocol;

/// ssr-reload - reload the browser once both bundles are built
#[derive(Parser, Debug)]
#[command(
    name = "ssr-reload",
    version,
    about = "Reload the browser once both server and client bundles are built",
    long_about = "ssr-reload coordinates two independent builds of a server-rendered app.\n\
                  The client side runs a small ready-server and injects a listening script\n\
                  into the HTML template; the server side pings it when its bundle is done.\n\
                  The browser reloads once both have reported."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a configuration file (TOML or JSON)
    ///
    /// Defaults to ssr-reload.toml or ssr-reload.json in the current directory.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
