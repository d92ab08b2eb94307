//! Server-side completion signal.
//!
//! Sends a single best-effort GET to the ready-server when the server bundle
//! finishes. No retries and no timeout; failures are logged and swallowed so
//! the build never waits on or fails because of the reload channel.

use crate::config::ServerConfig;
use crate::error::ReloadError;
use ureq::Agent;

/// How a ready-ping went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// The ready-server answered 200
    Acknowledged,
    /// The ready-server answered, but not with 200
    UnexpectedStatus(u16),
    /// No response (refused, reset, DNS failure)
    Failed(String),
}

/// Pings the ready-server on server-bundle completion.
#[derive(Debug, Clone)]
pub struct ReadinessPinger {
    agent: Agent,
    url: String,
}

impl ReadinessPinger {
    pub fn new(config: &ServerConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: config.address.ping_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the ready-ping and log the outcome.
    pub async fn ping(&self) -> PingOutcome {
        let agent = self.agent.clone();
        let url = self.url.clone();

        let outcome = tokio::task::spawn_blocking(move || match agent.get(&url).call() {
            Ok(response) => match response.status().as_u16() {
                200 => PingOutcome::Acknowledged,
                status => PingOutcome::UnexpectedStatus(status),
            },
            Err(e) => PingOutcome::Failed(e.to_string()),
        })
        .await
        .unwrap_or_else(|e| PingOutcome::Failed(e.to_string()));

        match &outcome {
            PingOutcome::Acknowledged => {
                tracing::info!("Reloading server responded on server bundle compilation");
            }
            PingOutcome::UnexpectedStatus(status) => {
                tracing::info!("{}", ReloadError::ProtocolMismatch { status: *status });
            }
            PingOutcome::Failed(reason) => {
                tracing::warn!("{}", ReloadError::Transport(reason.clone()));
            }
        }
        outcome
    }
}
