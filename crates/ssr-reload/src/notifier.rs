//! Client-side completion signal.

use crate::readiness::{BuildReadinessTracker, ReadinessOutcome};
use std::sync::Arc;

/// Marks the client bundle ready when the client build's `done` hook fires.
#[derive(Debug, Clone)]
pub struct ReadinessNotifier {
    tracker: Arc<BuildReadinessTracker>,
}

impl ReadinessNotifier {
    pub fn new(tracker: Arc<BuildReadinessTracker>) -> Self {
        Self { tracker }
    }

    pub fn notify(&self) -> ReadinessOutcome {
        tracing::info!("Client bundle compiled");
        self.tracker.mark_client_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::NotificationChannel;

    #[test]
    fn test_notify_marks_client_ready() {
        let tracker = Arc::new(BuildReadinessTracker::new(Arc::new(
            NotificationChannel::new("http://localhost:9901"),
        )));
        let notifier = ReadinessNotifier::new(Arc::clone(&tracker));

        assert_eq!(notifier.notify(), ReadinessOutcome::Waiting);
        let state = tracker.state();
        assert!(state.client_ready);
        assert!(!state.server_ready);
    }
}
