//! Artifact rewriting on emit.
//!
//! Writes every emitted asset of a compilation to the output file system.
//! Assets whose name contains the template marker get the reload-listening
//! script injected before the first `</body>`. An asset already written to
//! its resolved target path is skipped. A failure on one asset is logged and
//! does not stop the others.

use crate::config::ClientConfig;
use crate::error::{ReloadError, Result};
use crate::fs::OutputFileSystem;
use futures::future::join_all;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Closing tag the reload script is inserted in front of.
pub const BODY_CLOSE: &str = "</body>";

const RELOAD_SCRIPT_TEMPLATE: &str = include_str!("../assets/reload-client.js");

/// Asset content as handed over by the build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Text(String),
    Binary(Vec<u8>),
}

impl AssetSource {
    /// Content as bytes, text or not.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AssetSource::Text(text) => text.as_bytes(),
            AssetSource::Binary(bytes) => bytes,
        }
    }

    /// Content as text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AssetSource::Text(text) => Some(text),
            AssetSource::Binary(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }
}

impl From<String> for AssetSource {
    fn from(text: String) -> Self {
        AssetSource::Text(text)
    }
}

impl From<&str> for AssetSource {
    fn from(text: &str) -> Self {
        AssetSource::Text(text.to_string())
    }
}

impl From<Vec<u8>> for AssetSource {
    fn from(bytes: Vec<u8>) -> Self {
        AssetSource::Binary(bytes)
    }
}

/// One emitted build artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Output-relative name, possibly containing directories
    pub name: String,
    pub source: AssetSource,
    /// Path this asset was last written to
    pub exists_at: Option<PathBuf>,
    /// Whether the last emit cycle wrote this asset
    pub emitted: bool,
}

impl Asset {
    pub fn new(name: impl Into<String>, source: impl Into<AssetSource>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            exists_at: None,
            emitted: false,
        }
    }
}

/// The set of assets produced by one build, plus where they go.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub output_path: PathBuf,
    pub assets: Vec<Asset>,
}

impl Compilation {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            assets: Vec::new(),
        }
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }
}

/// What happened to a single asset during an emit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    Written { injected: bool },
    /// Already present at its target path
    Skipped,
    /// Directory creation or write failed (already logged)
    Failed,
}

/// Tally of one emit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub written: usize,
    pub injected: usize,
    pub skipped: usize,
    pub failed: usize,
    /// The output directory itself could not be created
    pub aborted: bool,
}

impl EmitSummary {
    fn record(&mut self, outcome: EmitOutcome) {
        match outcome {
            EmitOutcome::Written { injected } => {
                self.written += 1;
                if injected {
                    self.injected += 1;
                }
            }
            EmitOutcome::Skipped => self.skipped += 1,
            EmitOutcome::Failed => self.failed += 1,
        }
    }
}

/// Writes emitted assets and injects the reload script into the HTML template.
#[derive(Debug, Clone)]
pub struct ArtifactRewriter {
    template_matcher: String,
    script: String,
}

impl ArtifactRewriter {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            template_matcher: config.template_matcher.clone(),
            script: reload_script(&config.address.url(), config.reload_delay_ms()),
        }
    }

    /// The script block inserted before `</body>`.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Whether the asset called `name` is the HTML template.
    pub fn matches_template(&self, name: &str) -> bool {
        name.contains(&self.template_matcher)
    }

    /// Insert the script before the first `</body>`.
    ///
    /// Content without a closing body tag is returned unchanged.
    pub fn inject<'a>(&self, html: &'a str) -> Cow<'a, str> {
        match html.find(BODY_CLOSE) {
            Some(pos) => {
                let mut out = String::with_capacity(html.len() + self.script.len());
                out.push_str(&html[..pos]);
                out.push_str(&self.script);
                out.push_str(&html[pos..]);
                Cow::Owned(out)
            }
            None => Cow::Borrowed(html),
        }
    }

    /// Write every asset of `compilation` to `fs`.
    ///
    /// Assets are processed concurrently. Errors never propagate: they are
    /// logged and counted in the returned summary.
    pub async fn emit_assets(
        &self,
        compilation: &mut Compilation,
        fs: &dyn OutputFileSystem,
    ) -> EmitSummary {
        let output_path = compilation.output_path.clone();
        if let Err(e) = fs.mkdirp(&output_path).await {
            tracing::error!("{}", ReloadError::write(&output_path, e));
            return EmitSummary {
                aborted: true,
                ..EmitSummary::default()
            };
        }

        let outcomes = join_all(
            compilation
                .assets
                .iter_mut()
                .map(|asset| self.emit_asset(asset, &output_path, fs)),
        )
        .await;

        let mut summary = EmitSummary::default();
        for outcome in outcomes {
            summary.record(outcome);
        }

        tracing::info!(
            "Emitted {} assets to {} ({} skipped, {} failed)",
            summary.written,
            output_path.display(),
            summary.skipped,
            summary.failed
        );
        summary
    }

    async fn emit_asset(
        &self,
        asset: &mut Asset,
        output_path: &Path,
        fs: &dyn OutputFileSystem,
    ) -> EmitOutcome {
        match self.try_emit_asset(asset, output_path, fs).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Failed to emit {}: {}", asset.name, e);
                EmitOutcome::Failed
            }
        }
    }

    async fn try_emit_asset(
        &self,
        asset: &mut Asset,
        output_path: &Path,
        fs: &dyn OutputFileSystem,
    ) -> Result<EmitOutcome> {
        if asset.name.contains(['/', '\\']) {
            if let Some(dir) = Path::new(&asset.name)
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
            {
                let dir_path = fs.join(output_path, &dir.to_string_lossy());
                fs.mkdirp(&dir_path)
                    .await
                    .map_err(|e| ReloadError::write(&dir_path, e))?;
            }
        }

        let target = fs.join(output_path, &asset.name);
        if asset.exists_at.as_deref() == Some(target.as_path()) {
            tracing::debug!("{} unchanged at {}", asset.name, target.display());
            asset.emitted = false;
            return Ok(EmitOutcome::Skipped);
        }

        let (content, injected) = self.render(asset);
        fs.write_file(&target, &content)
            .await
            .map_err(|e| ReloadError::write(&target, e))?;

        asset.exists_at = Some(target);
        asset.emitted = true;
        Ok(EmitOutcome::Written { injected })
    }

    /// Final bytes for `asset`, and whether the script went in.
    fn render(&self, asset: &Asset) -> (Vec<u8>, bool) {
        if !self.matches_template(&asset.name) {
            return (asset.source.as_bytes().to_vec(), false);
        }

        let Some(html) = asset.source.as_text() else {
            tracing::warn!(
                "{} matches the template but is not UTF-8; writing it unmodified",
                asset.name
            );
            return (asset.source.as_bytes().to_vec(), false);
        };

        match self.inject(html) {
            Cow::Owned(rewritten) => (rewritten.into_bytes(), true),
            Cow::Borrowed(unchanged) => {
                tracing::warn!("{} has no {} tag; reload script not injected", asset.name, BODY_CLOSE);
                (unchanged.as_bytes().to_vec(), false)
            }
        }
    }
}

/// Render the browser-side script for a ready-server at `server_url`.
pub fn reload_script(server_url: &str, reload_delay_ms: u64) -> String {
    // A JSON string literal is a valid JS string literal
    let address = serde_json::Value::from(server_url).to_string();
    RELOAD_SCRIPT_TEMPLATE
        .replace("__RELOAD_SERVER_ADDRESS__", &address)
        .replace("__RELOAD_DELAY_MS__", &reload_delay_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientPluginOptions;
    use crate::fs::NativeFileSystem;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::io;
    use tempfile::TempDir;

    fn rewriter() -> ArtifactRewriter {
        let config = ClientConfig::try_from(ClientPluginOptions {
            app_origin: Some("http://app.test".to_string()),
            host: Some("localhost".to_string()),
            port: Some(9901),
            protocol: Some("http".to_string()),
            template_matcher: Some("index.html".to_string()),
            reload_delay_ms: Some(500),
        })
        .unwrap();
        ArtifactRewriter::new(&config)
    }

    /// Records writes and fails on demand.
    #[derive(Debug, Default)]
    struct RecordingFs {
        writes: Mutex<Vec<PathBuf>>,
        dirs: Mutex<Vec<PathBuf>>,
        fail_on: Option<&'static str>,
        fail_mkdirp: bool,
    }

    #[async_trait]
    impl OutputFileSystem for RecordingFs {
        async fn mkdirp(&self, path: &Path) -> io::Result<()> {
            if self.fail_mkdirp {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.dirs.lock().push(path.to_path_buf());
            Ok(())
        }

        async fn write_file(&self, path: &Path, _content: &[u8]) -> io::Result<()> {
            if self.fail_on.is_some_and(|name| path.ends_with(name)) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.writes.lock().push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_script_contents() {
        let script = rewriter().script().to_string();
        assert!(script.starts_with("<script>"));
        assert!(script.trim_end().ends_with("</script>"));
        assert!(script.contains(
            r#"new EventSource("http://localhost:9901", { withCredentials: true })"#
        ));
        assert!(script.contains("}, 500);"));
        assert!(script.contains("event.data === 'reload'"));
        assert!(script.contains("console.log(event.data)"));
    }

    #[test]
    fn test_inject_round_trip() {
        let rewriter = rewriter();
        let html = "<html><head></head><body><h1>Hi</h1></body></html>";
        let out = rewriter.inject(html);

        assert_eq!(out.matches(BODY_CLOSE).count(), 1);
        assert_eq!(out.matches("<script>").count(), 1);

        let expected = format!(
            "<html><head></head><body><h1>Hi</h1>{}</body></html>",
            rewriter.script()
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_inject_only_first_body_close() {
        let rewriter = rewriter();
        let html = "<body>a</body><!-- </body> -->";
        let out = rewriter.inject(html);

        assert_eq!(out.matches("<script>").count(), 1);
        assert!(out.ends_with("</body><!-- </body> -->"));
    }

    #[test]
    fn test_inject_without_body_is_unchanged() {
        let rewriter = rewriter();
        assert!(matches!(rewriter.inject("<div></div>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_matches_template_by_substring() {
        let rewriter = rewriter();
        assert!(rewriter.matches_template("index.html"));
        assert!(rewriter.matches_template("pages/index.html"));
        assert!(!rewriter.matches_template("other.js"));
    }

    #[tokio::test]
    async fn test_emit_writes_and_injects() {
        let temp = TempDir::new().unwrap();
        let out_dir = temp.path().join("dist");
        let rewriter = rewriter();

        let mut compilation = Compilation::new(&out_dir)
            .with_asset(Asset::new("index.html", "<body></body>"))
            .with_asset(Asset::new("other.js", "console.log(1);"))
            .with_asset(Asset::new("img/logo.png", vec![0x89, b'P', b'N', b'G', 0xff]));

        let summary = rewriter
            .emit_assets(&mut compilation, &NativeFileSystem::new())
            .await;

        assert_eq!(summary.written, 3);
        assert_eq!(summary.injected, 1);
        assert_eq!(summary.failed, 0);

        let html = std::fs::read_to_string(out_dir.join("index.html")).unwrap();
        assert_eq!(html, format!("<body>{}</body>", rewriter.script()));

        let js = std::fs::read_to_string(out_dir.join("other.js")).unwrap();
        assert_eq!(js, "console.log(1);");

        let png = std::fs::read(out_dir.join("img/logo.png")).unwrap();
        assert_eq!(png, vec![0x89, b'P', b'N', b'G', 0xff]);

        for asset in &compilation.assets {
            assert!(asset.emitted);
            assert_eq!(asset.exists_at, Some(out_dir.join(&asset.name)));
        }
    }

    #[tokio::test]
    async fn test_second_emit_is_skipped() {
        let fs = RecordingFs::default();
        let rewriter = rewriter();
        let mut compilation =
            Compilation::new("/out").with_asset(Asset::new("index.html", "<body></body>"));

        let first = rewriter.emit_assets(&mut compilation, &fs).await;
        let second = rewriter.emit_assets(&mut compilation, &fs).await;

        assert_eq!(first.written, 1);
        assert_eq!(second.written, 0);
        assert_eq!(second.skipped, 1);
        assert!(!compilation.assets[0].emitted);
        assert_eq!(fs.writes.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_nested_asset_creates_directory() {
        let fs = RecordingFs::default();
        let mut compilation =
            Compilation::new("/out").with_asset(Asset::new("static/js/app.js", "x"));

        rewriter().emit_assets(&mut compilation, &fs).await;

        let dirs = fs.dirs.lock();
        assert_eq!(dirs[0], PathBuf::from("/out"));
        assert!(dirs.contains(&PathBuf::from("/out/static/js")));
    }

    #[tokio::test]
    async fn test_failed_write_does_not_abort_batch() {
        let fs = RecordingFs {
            fail_on: Some("broken.js"),
            ..RecordingFs::default()
        };
        let mut compilation = Compilation::new("/out")
            .with_asset(Asset::new("broken.js", "x"))
            .with_asset(Asset::new("fine.js", "y"));

        let summary = rewriter().emit_assets(&mut compilation, &fs).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, 1);
        assert!(!compilation.assets[0].emitted);
        assert_eq!(compilation.assets[0].exists_at, None);
        assert!(compilation.assets[1].emitted);
    }

    #[tokio::test]
    async fn test_non_utf8_template_written_unmodified() {
        let fs = RecordingFs::default();
        let mut compilation =
            Compilation::new("/out").with_asset(Asset::new("index.html", vec![0xffu8, 0xfe]));

        let summary = rewriter().emit_assets(&mut compilation, &fs).await;

        assert_eq!(summary.written, 1);
        assert_eq!(summary.injected, 0);
    }

    #[tokio::test]
    async fn test_output_dir_failure_abandons_cycle() {
        let fs = RecordingFs {
            fail_mkdirp: true,
            ..RecordingFs::default()
        };
        let mut compilation = Compilation::new("/out")
            .with_asset(Asset::new("index.html", "<body></body>"))
            .with_asset(Asset::new("static/app.js", "run();"));

        let summary = rewriter().emit_assets(&mut compilation, &fs).await;

        assert!(summary.aborted);
        assert_eq!(summary.written, 0);
        assert_eq!(summary.failed, 0);
        assert!(fs.writes.lock().is_empty());
        assert!(fs.dirs.lock().is_empty());
        for asset in &compilation.assets {
            assert_eq!(asset.exists_at, None);
            assert!(!asset.emitted);
        }
    }
}
