//! Build-tool facing plugins.
//!
//! [`ClientPlugin`] goes into the client build: it owns the ready-server,
//! rewrites emitted HTML, and reports client completion. [`ServerPlugin`] goes
//! into the server build and pings the ready-server on completion.

use crate::channel::NotificationChannel;
use crate::config::{ClientConfig, ClientPluginOptions, ServerConfig, ServerPluginOptions};
use crate::error::Result;
use crate::fs::OutputFileSystem;
use crate::hooks::BuildPlugin;
use crate::notifier::ReadinessNotifier;
use crate::pinger::{PingOutcome, ReadinessPinger};
use crate::readiness::BuildReadinessTracker;
use crate::rewriter::{ArtifactRewriter, Compilation, EmitSummary};
use crate::server::ReadinessServer;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;

/// Client-build side of the reload protocol.
///
/// Construction validates the options and binds the ready-server; the server
/// keeps running for as long as the plugin is alive.
#[derive(Debug)]
pub struct ClientPlugin {
    config: ClientConfig,
    tracker: Arc<BuildReadinessTracker>,
    server: ReadinessServer,
    rewriter: ArtifactRewriter,
    notifier: ReadinessNotifier,
    last_emit: Mutex<Option<EmitSummary>>,
}

impl ClientPlugin {
    /// Validate `options` and start the ready-server.
    ///
    /// # Errors
    ///
    /// Fails with [`ReloadError::Config`](crate::ReloadError::Config) naming the
    /// first missing option, or [`ReloadError::Bind`](crate::ReloadError::Bind)
    /// if the listener cannot be bound.
    pub async fn new(options: ClientPluginOptions) -> Result<Self> {
        let config = ClientConfig::try_from(options)?;

        let channel = Arc::new(NotificationChannel::new(config.address.url()));
        let tracker = Arc::new(BuildReadinessTracker::new(channel));
        let server = ReadinessServer::bind(&config, Arc::clone(&tracker)).await?;

        Ok(Self {
            rewriter: ArtifactRewriter::new(&config),
            notifier: ReadinessNotifier::new(Arc::clone(&tracker)),
            config,
            tracker,
            server,
            last_emit: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tracker(&self) -> &Arc<BuildReadinessTracker> {
        &self.tracker
    }

    pub fn rewriter(&self) -> &ArtifactRewriter {
        &self.rewriter
    }

    /// Address the ready-server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Rewrite and write the compilation's assets.
    pub async fn emit_assets(
        &self,
        compilation: &mut Compilation,
        fs: &dyn OutputFileSystem,
    ) -> EmitSummary {
        let summary = self.rewriter.emit_assets(compilation, fs).await;
        *self.last_emit.lock() = Some(summary);
        summary
    }

    /// Tally of the most recent emit, if any has run.
    pub fn last_emit_summary(&self) -> Option<EmitSummary> {
        *self.last_emit.lock()
    }
}

#[async_trait]
impl BuildPlugin for ClientPlugin {
    fn name(&self) -> &'static str {
        "ssr-reload-client"
    }

    async fn after_emit(&self, compilation: &mut Compilation, fs: &dyn OutputFileSystem) {
        self.emit_assets(compilation, fs).await;
    }

    async fn done(&self) {
        self.notifier.notify();
    }
}

/// Server-build side of the reload protocol.
#[derive(Debug, Clone)]
pub struct ServerPlugin {
    config: ServerConfig,
    pinger: ReadinessPinger,
}

impl ServerPlugin {
    /// # Errors
    ///
    /// Fails with [`ReloadError::Config`](crate::ReloadError::Config) naming the
    /// first missing option.
    pub fn new(options: ServerPluginOptions) -> Result<Self> {
        let config = ServerConfig::try_from(options)?;
        Ok(Self {
            pinger: ReadinessPinger::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Ping the ready-server now.
    pub async fn ping(&self) -> PingOutcome {
        self.pinger.ping().await
    }
}

#[async_trait]
impl BuildPlugin for ServerPlugin {
    fn name(&self) -> &'static str {
        "ssr-reload-server"
    }

    async fn done(&self) {
        tracing::info!("Server bundle compiled");
        self.ping().await;
    }
}
