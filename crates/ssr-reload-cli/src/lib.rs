//! ssr-reload CLI - a standalone host for the `ssr-reload` core.
//!
//! Build tools that cannot load the plugins directly can drive the protocol
//! from the outside: run `ssr-reload client` next to the client build and
//! `ssr-reload ping` after every server build.
//!
//! - [`cli`] - Argument parsing
//! - [`commands`] - `client`, `ping`, and `check`
//! - [`config`] - Layered configuration (file, `SSR_RELOAD_*`, flags)
//! - [`error`] - CLI errors and their miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - Terminal status lines

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
