use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::validation::parse_protocol;

/// Available ssr-reload subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Act as the client build host
    ///
    /// Binds the ready-server, copies every file under --assets into
    /// --out-dir (injecting the reload script into the HTML template), then
    /// reports the client bundle as ready. Each line on stdin repeats the
    /// cycle, so an external watcher can signal finished rebuilds.
    Client(ClientArgs),

    /// Act as the server build host
    ///
    /// Sends one ready-ping to the ready-server. Always exits successfully;
    /// an unreachable server is reported, not fatal.
    Ping(PingArgs),

    /// Validate configuration
    ///
    /// Resolves client and server options from config file, environment, and
    /// flags, and reports the first missing or invalid option.
    Check(CheckArgs),
}

/// Option overrides shared by every command
///
/// Flags take priority over SSR_RELOAD_* environment variables, which take
/// priority over the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Host the ready-server listens on
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port the ready-server listens on
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Protocol of the ready-server address (http or https)
    #[arg(long, value_name = "PROTOCOL", value_parser = parse_protocol)]
    pub protocol: Option<String>,

    /// Origin of the page that subscribes for reloads
    #[arg(long, value_name = "ORIGIN")]
    pub app_origin: Option<String>,

    /// Marker contained in the HTML template's asset name
    #[arg(long = "template", value_name = "MARKER")]
    pub template_matcher: Option<String>,

    /// Delay before the page reloads, in milliseconds
    #[arg(long, value_name = "MS")]
    pub reload_delay_ms: Option<u64>,
}

/// Arguments for the client command
#[derive(Args, Debug)]
pub struct ClientArgs {
    /// Directory holding the client build's emitted assets
    #[arg(long, value_name = "DIR")]
    pub assets: PathBuf,

    /// Directory the rewritten assets are written to
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Run one emit cycle and exit instead of serving
    #[arg(long)]
    pub once: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the ping command
#[derive(Args, Debug)]
pub struct PingArgs {
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Only validate the server-side options
    #[arg(long, conflicts_with = "client_only")]
    pub server_only: bool,

    /// Only validate the client-side options
    #[arg(long)]
    pub client_only: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}
