use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 64;

/// Change notifications published by the stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Someone logged in (`Some(email)`) or out (`None`)
    SessionChanged { email: Option<String> },
    /// The listing collection was written
    ListingsChanged { count: usize },
    /// A write only fit after dropping the oldest listings
    ListingsEvicted { kept: usize, dropped: usize },
}

/// Best-effort fan-out of [`StoreEvent`]s to any number of subscribers.
///
/// Cloning shares the same channel. Slow subscribers lose old events
/// rather than blocking the stores.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: StoreEvent) {
        // No subscribers is not an error
        if self.sender.send(event.clone()).is_err() {
            trace!("No subscribers for {:?}", event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
