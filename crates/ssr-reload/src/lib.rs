//! ssr-reload - browser reload coordination for split server/client builds.
//!
//! A server-rendered app is usually built twice: once for the server bundle
//! and once for the client bundle. The page should only reload once both
//! builds have finished. This crate coordinates that.
//!
//! # Architecture
//!
//! - [`plugin::ClientPlugin`] lives in the client build. It binds a small
//!   ready-server ([`server`]), injects a listening script into the emitted
//!   HTML template ([`rewriter`]), and marks the client side ready when the
//!   build is done ([`notifier`]).
//! - [`plugin::ServerPlugin`] lives in the server build and pings the
//!   ready-server when the server bundle is done ([`pinger`]).
//! - [`readiness::BuildReadinessTracker`] fires one `reload` event over the
//!   browser's Server-Sent Events subscription ([`channel`]) when the second
//!   of the two signals arrives.
//!
//! Reload notification is best-effort: after construction nothing here
//! returns an error to the build, it only logs.
//!
//! # Example
//!
//! ```rust,no_run
//! use ssr_reload::{BuildHooks, ClientPlugin, ClientPluginOptions, Compilation, NativeFileSystem};
//! use std::sync::Arc;
//!
//! # async fn run() -> ssr_reload::Result<()> {
//! let client = ClientPlugin::new(ClientPluginOptions {
//!     app_origin: Some("http://localhost:3000".into()),
//!     host: Some("localhost".into()),
//!     port: Some(9901),
//!     protocol: Some("http".into()),
//!     template_matcher: Some("index.html".into()),
//!     reload_delay_ms: Some(500),
//! })
//! .await?;
//!
//! let mut hooks = BuildHooks::new();
//! hooks.register(Arc::new(client));
//!
//! let mut compilation = Compilation::new("dist");
//! hooks.run_emit(&mut compilation, &NativeFileSystem::new()).await;
//! hooks.run_done().await;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod config;
mod cors;
pub mod error;
pub mod fs;
pub mod hooks;
pub mod notifier;
pub mod pinger;
pub mod plugin;
pub mod readiness;
pub mod rewriter;
pub mod server;

pub use channel::{NotificationChannel, RELOAD_MESSAGE};
pub use config::{ClientConfig, ClientPluginOptions, ServerAddress, ServerConfig, ServerPluginOptions};
pub use error::{ConfigError, ReloadError, Result};
pub use fs::{NativeFileSystem, OutputFileSystem};
pub use hooks::{BuildHooks, BuildPlugin};
pub use notifier::ReadinessNotifier;
pub use pinger::{PingOutcome, ReadinessPinger};
pub use plugin::{ClientPlugin, ServerPlugin};
pub use readiness::{BuildReadinessTracker, ReadinessOutcome, ReadinessState};
pub use rewriter::{ArtifactRewriter, Asset, AssetSource, Compilation, EmitSummary};
pub use server::ReadinessServer;
