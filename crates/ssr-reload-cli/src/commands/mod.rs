//! Command implementations for the ssr-reload CLI.
//!
//! - [`client`] - Client build host (ready-server + HTML rewriting)
//! - [`ping`] - Server build host (ready-ping)
//! - [`check`] - Configuration validation

pub mod assets;
pub mod check;
pub mod client;
pub mod ping;

pub use check::execute as check_execute;
pub use client::execute as client_execute;
pub use ping::execute as ping_execute;
