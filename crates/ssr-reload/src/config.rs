//! Plugin options and their validated forms.
//!
//! Options arrive from build-tool configuration with every field optional.
//! They are validated once, when a plugin is constructed; an absent, empty, or
//! zero value fails construction with the name of the offending option.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw options for the client-side plugin (ready-server + artifact rewriter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPluginOptions {
    /// Origin of the application page that subscribes for reloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_origin: Option<String>,

    /// Host the ready-server binds to (and the browser connects to)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port the ready-server binds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Protocol used in the advertised server address ("http" or "https")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Marker identifying the HTML artifact that receives the reload script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_matcher: Option<String>,

    /// Delay between receiving a reload event and reloading the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_delay_ms: Option<u64>,
}

/// Raw options for the server-side plugin (ready-pinger).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPluginOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// Where the ready-server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
    pub protocol: String,
}

impl ServerAddress {
    /// Base URL of the ready-server, e.g. `http://localhost:9901`.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// URL the server-side build pings when it finishes.
    pub fn ping_url(&self) -> String {
        format!("{}/?{}", self.url(), crate::server::READY_PING_QUERY)
    }

    fn validate(
        host: Option<&String>,
        port: Option<u16>,
        protocol: Option<&String>,
    ) -> Result<Self, ConfigError> {
        let host = required_str(host, "host", "Set the host the reload server listens on")?;
        let port = port.filter(|port| *port != 0).ok_or_else(|| {
            ConfigError::missing("port", "Set a non-zero port for the reload server")
        })?;
        let protocol = required_str(protocol, "protocol", "Use \"http\" or \"https\"")?;

        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::InvalidValue {
                field: "protocol".to_string(),
                value: protocol,
                hint: "Use \"http\" or \"https\"".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            protocol,
        })
    }
}

/// Validated client plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub app_origin: String,
    pub address: ServerAddress,
    pub template_matcher: String,
    pub reload_delay: Duration,
}

impl ClientConfig {
    pub fn reload_delay_ms(&self) -> u64 {
        self.reload_delay.as_millis() as u64
    }
}

impl TryFrom<ClientPluginOptions> for ClientConfig {
    type Error = ConfigError;

    fn try_from(options: ClientPluginOptions) -> Result<Self, Self::Error> {
        let app_origin = required_str(
            options.app_origin.as_ref(),
            "appOrigin",
            "Set the origin of the page that should reload, e.g. http://localhost:3000",
        )?;

        // The origin ends up verbatim in a response header
        if app_origin.bytes().any(|b| b.is_ascii_control()) || !app_origin.is_ascii() {
            return Err(ConfigError::InvalidValue {
                field: "appOrigin".to_string(),
                value: app_origin,
                hint: "The origin must be plain ASCII without control characters".to_string(),
            });
        }

        let address = ServerAddress::validate(
            options.host.as_ref(),
            options.port,
            options.protocol.as_ref(),
        )?;

        let template_matcher = required_str(
            options.template_matcher.as_ref(),
            "templateMatcher",
            "Set a marker contained in the HTML template's asset name, e.g. index.html",
        )?;

        let reload_delay_ms = options.reload_delay_ms.filter(|ms| *ms != 0).ok_or_else(|| {
            ConfigError::missing(
                "reloadDelayMs",
                "Set how long the page waits before reloading, in milliseconds",
            )
        })?;

        Ok(Self {
            app_origin,
            address,
            template_matcher,
            reload_delay: Duration::from_millis(reload_delay_ms),
        })
    }
}

/// Validated server plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: ServerAddress,
}

impl TryFrom<ServerPluginOptions> for ServerConfig {
    type Error = ConfigError;

    fn try_from(options: ServerPluginOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            address: ServerAddress::validate(
                options.host.as_ref(),
                options.port,
                options.protocol.as_ref(),
            )?,
        })
    }
}

fn required_str(value: Option<&String>, field: &str, hint: &str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::missing(field, hint))
}
