//! Connector lifecycle events.
//!
//! The host framework observes a connector through three events:
//! `message { type: connecting }`, `change { account?, chain? }` and
//! `disconnect`. They fan out over a broadcast channel; every subscriber
//! receives every event emitted after it subscribed.

use tokio::sync::broadcast;
use tracing::trace;

/// Default capacity of the event channel.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Chain state reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStatus {
    /// Chain id.
    pub id: u64,
    /// Whether the chain is missing from the configured chain list.
    pub unsupported: bool,
}

/// Informational message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorMessage {
    /// A connect sequence has started.
    Connecting,
}

/// Event emitted by a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorEvent {
    /// Informational message.
    Message(ConnectorMessage),
    /// Account or chain changed.
    Change {
        /// New checksummed account, if it changed.
        account: Option<String>,
        /// New chain, if it changed.
        chain: Option<ChainStatus>,
    },
    /// The wallet disconnected.
    Disconnect,
}

impl ConnectorEvent {
    /// Account change event.
    #[must_use]
    pub const fn account_changed(account: String) -> Self {
        Self::Change {
            account: Some(account),
            chain: None,
        }
    }

    /// Chain change event.
    #[must_use]
    pub const fn chain_changed(chain: ChainStatus) -> Self {
        Self::Change {
            account: None,
            chain: Some(chain),
        }
    }
}

/// Broadcasts [`ConnectorEvent`]s to subscribers.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<ConnectorEvent>,
}

impl EventEmitter {
    /// Create an emitter with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create an emitter with a specific capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event. Emitting with no subscribers is not an error.
    pub fn emit(&self, event: ConnectorEvent) {
        trace!(?event, "emitting connector event");
        if self.tx.send(event).is_err() {
            trace!("no connector event subscribers");
        }
    }

    /// Subscribe to future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}
