//! Single-subscriber push channel to the browser.
//!
//! At most one browser session listens at a time. A new subscription takes the
//! slot and drops the previous sender, which ends the previous event stream.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Payload pushed to the subscriber when both bundles are ready.
pub const RELOAD_MESSAGE: &str = "reload";

/// Stream of event payloads for one subscriber.
pub type Subscription = UnboundedReceiverStream<String>;

/// Holds the sending half of the current subscriber's event stream.
#[derive(Debug)]
pub struct NotificationChannel {
    subscriber: Mutex<Option<mpsc::UnboundedSender<String>>>,
    server_url: String,
}

impl NotificationChannel {
    /// Create a channel that advertises itself as reachable at `server_url`.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            subscriber: Mutex::new(None),
            server_url: server_url.into(),
        }
    }

    /// Register a new subscriber, displacing any previous one.
    ///
    /// The returned stream yields the "connected" line first, followed by a
    /// [`RELOAD_MESSAGE`] for every reload fired while this subscriber holds
    /// the slot.
    pub fn connect(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        // Receiver is alive, so this cannot fail
        let _ = tx.send(self.connected_message());

        if self.subscriber.lock().replace(tx).is_some() {
            tracing::debug!("New subscriber displaced the previous browser session");
        }

        UnboundedReceiverStream::new(rx)
    }

    /// Whether a subscriber is registered and its stream is still open.
    pub fn has_subscriber(&self) -> bool {
        self.subscriber
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Push a reload event to the current subscriber.
    ///
    /// Returns `false` without error when nobody is listening.
    pub fn notify_reload(&self) -> bool {
        let mut slot = self.subscriber.lock();
        let Some(tx) = slot.as_ref() else {
            return false;
        };

        if tx.send(RELOAD_MESSAGE.to_string()).is_ok() {
            true
        } else {
            // Browser went away; forget the dead handle
            *slot = None;
            false
        }
    }

    /// Informational line sent to every new subscriber.
    pub fn connected_message(&self) -> String {
        format!("Connected to reload server at {}", self.server_url)
    }
}
