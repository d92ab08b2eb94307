use crate::cli::OverrideArgs;
use crate::config::ReloadFileConfig;
use crate::error::{CliError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

/// Files looked up in the working directory when no --config is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["ssr-reload.toml", "ssr-reload.json"];

/// Prefix of environment variables that set options (`SSR_RELOAD_PORT`, ...).
pub const ENV_PREFIX: &str = "SSR_RELOAD_";

impl ReloadFileConfig {
    /// Load configuration from every source.
    /// Priority: CLI flags > environment variables > config file
    ///
    /// Nothing is validated here; missing options surface when the plugins
    /// are built from the result.
    pub fn load(cwd: &Path, config_path: Option<&Path>, overrides: &OverrideArgs) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = Self::find_config_file(cwd, config_path)? {
            tracing::debug!("Loading configuration from {}", path.display());
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        // SSR_RELOAD_APP_ORIGIN -> appOrigin
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| env_key_to_field(key.as_str()).into()),
        );

        figment = figment.merge(Serialized::defaults(Self::from(overrides)));

        Ok(figment.extract()?)
    }

    fn find_config_file(cwd: &Path, config_path: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = config_path {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            if !path.is_file() {
                return Err(CliError::ConfigNotFound(path));
            }
            return Ok(Some(path));
        }

        Ok(DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| cwd.join(name))
            .find(|path| path.is_file()))
    }
}

fn env_key_to_field(key: &str) -> String {
    let mut field = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !field.is_empty();
        } else if upper_next {
            field.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            field.push(c.to_ascii_lowercase());
        }
    }
    field
}
