//! Configuration for the ssr-reload CLI.
//!
//! One flat set of options serves both sides: the client command reads every
//! key, the ping command only the address keys. Sources are layered by
//! [`ReloadFileConfig::load`].

mod loading;

pub use loading::{DEFAULT_CONFIG_FILES, ENV_PREFIX};

use crate::cli::OverrideArgs;
use serde::{Deserialize, Serialize};
use ssr_reload::{ClientPluginOptions, ServerPluginOptions};

/// Merged configuration as read from file, environment, and flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadFileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_matcher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_delay_ms: Option<u64>,
}

impl ReloadFileConfig {
    /// Options for the client-side plugin.
    pub fn client_options(&self) -> ClientPluginOptions {
        ClientPluginOptions {
            app_origin: self.app_origin.clone(),
            host: self.host.clone(),
            port: self.port,
            protocol: self.protocol.clone(),
            template_matcher: self.template_matcher.clone(),
            reload_delay_ms: self.reload_delay_ms,
        }
    }

    /// Options for the server-side plugin.
    pub fn server_options(&self) -> ServerPluginOptions {
        ServerPluginOptions {
            host: self.host.clone(),
            port: self.port,
            protocol: self.protocol.clone(),
        }
    }
}

impl From<&OverrideArgs> for ReloadFileConfig {
    fn from(args: &OverrideArgs) -> Self {
        Self {
            app_origin: args.app_origin.clone(),
            host: args.host.clone(),
            port: args.port,
            protocol: args.protocol.clone(),
            template_matcher: args.template_matcher.clone(),
            reload_delay_ms: args.reload_delay_ms,
        }
    }
}
