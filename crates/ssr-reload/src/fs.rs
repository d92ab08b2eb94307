//! Output file-system abstraction.
//!
//! The build tool owns the output file system (it may be in-memory); the
//! rewriter only needs recursive directory creation, file writes, and path
//! joining from it.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Capabilities the artifact rewriter needs from the build's output file system.
#[async_trait]
pub trait OutputFileSystem: Send + Sync + std::fmt::Debug {
    /// Create `path` and all missing parents.
    async fn mkdirp(&self, path: &Path) -> io::Result<()>;

    /// Write `content` to `path`, replacing any existing file.
    async fn write_file(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Resolve an asset name against the output directory.
    fn join(&self, base: &Path, name: &str) -> PathBuf {
        base.join(name)
    }
}

/// Writes straight to the local disk through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputFileSystem for NativeFileSystem {
    async fn mkdirp(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, content).await
    }
}
