//! Turns an asset directory into a [`Compilation`].
//!
//! Between cycles the content hash of every asset is remembered. An asset
//! whose hash is unchanged keeps the path it was last written to, so the
//! rewriter skips it.

use crate::error::Result;
use ssr_reload::{Asset, AssetSource, Compilation};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct Written {
    hash: blake3::Hash,
    exists_at: PathBuf,
}

/// Content hashes of the assets written in earlier cycles.
#[derive(Debug, Default)]
pub struct AssetSnapshot {
    written: HashMap<String, Written>,
}

impl AssetSnapshot {
    /// Read every file under `assets_dir` into a compilation targeting `out_dir`.
    ///
    /// `out_dir` itself is skipped when it lives inside `assets_dir`, however
    /// either path is spelled.
    pub async fn collect(&self, assets_dir: &Path, out_dir: &Path) -> Result<Compilation> {
        let mut compilation = Compilation::new(out_dir);

        let root = fs::canonicalize(assets_dir).await?;
        // An output directory that does not exist yet cannot be inside the walk.
        let skip = fs::canonicalize(out_dir).await.ok();

        for path in list_files(root.clone(), skip).await? {
            let Ok(relative) = path.strip_prefix(&root) else {
                continue;
            };
            let name = asset_name(relative);
            let bytes = fs::read(&path).await?;

            let mut asset = Asset::new(name, source_from_bytes(bytes));
            if let Some(prev) = self.written.get(&asset.name) {
                if prev.hash == blake3::hash(asset.source.as_bytes()) {
                    asset.exists_at = Some(prev.exists_at.clone());
                }
            }
            compilation.assets.push(asset);
        }

        tracing::debug!(
            "Collected {} assets from {}",
            compilation.assets.len(),
            root.display()
        );
        Ok(compilation)
    }

    /// Remember what the last emit cycle wrote.
    pub fn record(&mut self, compilation: &Compilation) {
        for asset in &compilation.assets {
            match &asset.exists_at {
                Some(exists_at) => {
                    self.written.insert(
                        asset.name.clone(),
                        Written {
                            hash: blake3::hash(asset.source.as_bytes()),
                            exists_at: exists_at.clone(),
                        },
                    );
                }
                None => {
                    self.written.remove(&asset.name);
                }
            }
        }
    }
}

/// Regular files under `root` in file-name order, leaving out `skip`.
async fn list_files(root: PathBuf, skip: Option<PathBuf>) -> Result<Vec<PathBuf>> {
    let files = tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| Some(entry.path()) != skip.as_deref());

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok::<_, walkdir::Error>(files)
    })
    .await??;

    Ok(files)
}

/// Output-relative name with `/` separators on every platform.
fn asset_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn source_from_bytes(bytes: Vec<u8>) -> AssetSource {
    match String::from_utf8(bytes) {
        Ok(text) => AssetSource::Text(text),
        Err(e) => AssetSource::Binary(e.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let assets = temp.path().join("build");
        fs::create_dir_all(assets.join("static")).unwrap();
        fs::write(assets.join("index.html"), "<body></body>").unwrap();
        fs::write(assets.join("static/app.js"), "run();").unwrap();
        fs::write(assets.join("static/logo.bin"), [0xffu8, 0x00]).unwrap();
        let out = temp.path().join("public");
        (temp, assets, out)
    }

    fn names(compilation: &Compilation) -> Vec<&str> {
        compilation.assets.iter().map(|a| a.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_collect_names_and_sources() {
        let (_temp, assets, out) = setup();
        let compilation = AssetSnapshot::default().collect(&assets, &out).await.unwrap();

        assert_eq!(
            names(&compilation),
            vec!["index.html", "static/app.js", "static/logo.bin"]
        );
        assert_eq!(compilation.output_path, out);
        assert!(matches!(compilation.assets[0].source, AssetSource::Text(_)));
        assert!(matches!(compilation.assets[2].source, AssetSource::Binary(_)));
        assert!(compilation.assets.iter().all(|a| a.exists_at.is_none()));
    }

    #[tokio::test]
    async fn test_unchanged_assets_keep_previous_location() {
        let (_temp, assets, out) = setup();
        let mut snapshot = AssetSnapshot::default();

        let mut first = snapshot.collect(&assets, &out).await.unwrap();
        for asset in &mut first.assets {
            asset.exists_at = Some(out.join(&asset.name));
        }
        snapshot.record(&first);

        fs::write(assets.join("static/app.js"), "run(2);").unwrap();
        let second = snapshot.collect(&assets, &out).await.unwrap();

        assert_eq!(second.assets[0].exists_at, Some(out.join("index.html")));
        assert_eq!(second.assets[1].exists_at, None);
    }

    #[tokio::test]
    async fn test_out_dir_inside_assets_is_skipped() {
        let (_temp, assets, _) = setup();
        let out = assets.join("dist");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("index.html"), "old").unwrap();

        let compilation = AssetSnapshot::default().collect(&assets, &out).await.unwrap();
        assert!(compilation.assets.iter().all(|a| !a.name.starts_with("dist/")));
    }

    #[tokio::test]
    async fn test_out_dir_skipped_when_spelled_differently() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("index.html"), "<body></body>").unwrap();
        fs::write(temp.path().join("dist/index.html"), "<body><script></script></body>").unwrap();

        let snapshot = AssetSnapshot::default();

        let dotted = snapshot
            .collect(&temp.path().join("."), &temp.path().join("dist"))
            .await
            .unwrap();
        assert_eq!(names(&dotted), vec!["index.html"]);

        let detour = temp.path().join("dist").join("..");
        let compilation = snapshot
            .collect(&detour, &temp.path().join("./dist"))
            .await
            .unwrap();
        assert_eq!(names(&compilation), vec!["index.html"]);
    }

    #[tokio::test]
    async fn test_missing_out_dir_skips_nothing() {
        let (_temp, assets, out) = setup();
        assert!(!out.exists());

        let compilation = AssetSnapshot::default().collect(&assets, &out).await.unwrap();
        assert_eq!(compilation.assets.len(), 3);
    }
}
