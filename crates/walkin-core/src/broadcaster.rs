//! Fan-out of committed queue transitions to dashboard subscribers.
//!
//! Publishing never blocks and never fails the caller: a subscriber that
//! falls more than `capacity` events behind is told how many it missed and
//! is expected to re-read state.

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;
use walkin_types::QueueEvent;

/// Outcome of waiting on a [`Subscription`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Event(QueueEvent),
    /// The subscriber was too slow; this many events were dropped for it.
    Lagged(u64),
    /// The broadcaster shut down.
    Closed,
}

pub struct EventBroadcaster {
    sender: RwLock<Option<broadcast::Sender<QueueEvent>>>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { sender: RwLock::new(Some(tx)) }
    }

    /// Register a new subscriber. `None` once the broadcaster is closed.
    pub fn subscribe(&self) -> Option<Subscription> {
        self.sender.read().as_ref().map(|tx| Subscription { rx: tx.subscribe() })
    }

    /// Deliver `event` to every current subscriber. Returns how many received it.
    pub fn publish(&self, event: QueueEvent) -> usize {
        let guard = self.sender.read();
        let Some(tx) = guard.as_ref() else {
            debug!(topic = event.topic(), "broadcaster closed, event dropped");
            return 0;
        };

        let topic = event.topic();
        match tx.send(event) {
            Ok(receivers) => {
                debug!(topic, receivers, "event published");
                receivers
            },
            // No subscribers is normal between dashboard sessions.
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.read().as_ref().map_or(0, broadcast::Sender::receiver_count)
    }

    /// Drop the sender. Pending subscribers drain what is buffered, then see
    /// [`Delivery::Closed`].
    pub fn close(&self) {
        if self.sender.write().take().is_some() {
            debug!("event broadcaster closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }
}

/// A single subscriber's view of the event stream.
pub struct Subscription {
    rx: broadcast::Receiver<QueueEvent>,
}

impl Subscription {
    pub async fn next(&mut self) -> Delivery {
        match self.rx.recv().await {
            Ok(event) => Delivery::Event(event),
            Err(broadcast::error::RecvError::Lagged(missed)) => Delivery::Lagged(missed),
            Err(broadcast::error::RecvError::Closed) => Delivery::Closed,
        }
    }
}
