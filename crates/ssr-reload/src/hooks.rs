//! Build lifecycle hooks
//!
//! The host build tool drives plugins through three points: `emit` and
//! `after_emit` for each emission of a [`Compilation`], and `done` once a full
//! build has finished. [`BuildHooks`] is the registry a host fires them through.

use crate::error::Result;
use crate::fs::OutputFileSystem;
use crate::rewriter::Compilation;
use async_trait::async_trait;
use std::sync::Arc;

/// A participant in the build lifecycle.
///
/// Every hook defaults to a no-op so plugins only implement what they use.
///
/// # Example
///
/// ```rust,ignore
/// struct Announce;
///
/// #[async_trait]
/// impl BuildPlugin for Announce {
///     fn name(&self) -> &'static str {
///         "announce"
///     }
///
///     async fn done(&self) {
///         tracing::info!("build finished");
///     }
/// }
/// ```
#[async_trait]
pub trait BuildPlugin: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &'static str;

    /// Assets are about to be written.
    async fn emit(&self, _compilation: &mut Compilation, _fs: &dyn OutputFileSystem) -> Result<()> {
        Ok(())
    }

    /// Assets have been handed over for writing.
    async fn after_emit(&self, _compilation: &mut Compilation, _fs: &dyn OutputFileSystem) {}

    /// The full build finished.
    async fn done(&self) {}
}

/// Ordered set of plugins fired by the host.
#[derive(Default, Clone)]
pub struct BuildHooks {
    plugins: Vec<Arc<dyn BuildPlugin>>,
}

impl std::fmt::Debug for BuildHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

impl BuildHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn BuildPlugin>) -> &mut Self {
        tracing::debug!("Registered build plugin {}", plugin.name());
        self.plugins.push(plugin);
        self
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run one emission: every `emit` hook, then every `after_emit` hook.
    ///
    /// A failing `emit` hook is logged and does not stop the cycle.
    pub async fn run_emit(&self, compilation: &mut Compilation, fs: &dyn OutputFileSystem) {
        for plugin in &self.plugins {
            if let Err(e) = plugin.emit(compilation, fs).await {
                tracing::error!("{} emit hook failed: {}", plugin.name(), e);
            }
        }
        for plugin in &self.plugins {
            plugin.after_emit(compilation, fs).await;
        }
    }

    /// Fire every `done` hook in registration order.
    pub async fn run_done(&self) {
        for plugin in &self.plugins {
            plugin.done().await;
        }
    }
}
