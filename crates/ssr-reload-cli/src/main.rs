//! ssr-reload CLI entry point.

use clap::Parser;
use miette::Result;
use ssr_reload_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let config_path = args.config.as_deref();
    let result = match args.command {
        cli::Command::Client(client_args) => commands::client_execute(client_args, config_path).await,
        cli::Command::Ping(ping_args) => commands::ping_execute(ping_args, config_path).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args, config_path).await,
    };

    result.map_err(error::cli_error_to_miette)
}
