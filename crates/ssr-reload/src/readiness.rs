//! Two-party build readiness state machine.
//!
//! The server bundle and the client bundle finish independently. A reload
//! fires only at the moment the second of the two signals arrives while a
//! browser is subscribed; firing resets both flags. A subscriber that connects
//! after both flags are already set does not trigger a reload on its own.

use crate::channel::NotificationChannel;
use parking_lot::Mutex;
use std::sync::Arc;

/// Which bundle finished compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSide {
    Server,
    Client,
}

impl BuildSide {
    fn label(self) -> &'static str {
        match self {
            BuildSide::Server => "server",
            BuildSide::Client => "client",
        }
    }
}

/// Readiness flags for the two bundles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessState {
    pub server_ready: bool,
    pub client_ready: bool,
}

impl ReadinessState {
    pub fn both_ready(&self) -> bool {
        self.server_ready && self.client_ready
    }
}

/// Result of feeding one readiness signal into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// The other bundle has not reported yet
    Waiting,
    /// Both bundles are ready but no browser is subscribed; flags stay set
    NoSubscriber,
    /// A reload was pushed and both flags were reset
    Reloaded,
}

/// Owns the readiness flags and fires reloads through the notification channel.
///
/// The flag update and the both-ready check happen under one lock, so
/// concurrent server and client signals can never both observe "other side
/// pending" or both fire.
#[derive(Debug)]
pub struct BuildReadinessTracker {
    state: Mutex<ReadinessState>,
    channel: Arc<NotificationChannel>,
}

impl BuildReadinessTracker {
    pub fn new(channel: Arc<NotificationChannel>) -> Self {
        Self {
            state: Mutex::new(ReadinessState::default()),
            channel,
        }
    }

    /// Record that the server bundle finished compiling.
    pub fn mark_server_ready(&self) -> ReadinessOutcome {
        self.mark_ready(BuildSide::Server)
    }

    /// Record that the client bundle finished compiling.
    pub fn mark_client_ready(&self) -> ReadinessOutcome {
        self.mark_ready(BuildSide::Client)
    }

    /// Current flags.
    pub fn state(&self) -> ReadinessState {
        *self.state.lock()
    }

    pub fn channel(&self) -> &Arc<NotificationChannel> {
        &self.channel
    }

    fn mark_ready(&self, side: BuildSide) -> ReadinessOutcome {
        let mut state = self.state.lock();
        match side {
            BuildSide::Server => state.server_ready = true,
            BuildSide::Client => state.client_ready = true,
        }

        if !state.both_ready() {
            return ReadinessOutcome::Waiting;
        }

        // Flags reset only once the event has actually been handed over.
        if !self.channel.notify_reload() {
            tracing::debug!(
                "Both bundles ready after {} bundle compilation, but no browser is subscribed",
                side.label()
            );
            return ReadinessOutcome::NoSubscriber;
        }

        tracing::info!(
            "Sending reload message to browser after {} bundle compilation",
            side.label()
        );
        *state = ReadinessState::default();
        ReadinessOutcome::Reloaded
    }
}
