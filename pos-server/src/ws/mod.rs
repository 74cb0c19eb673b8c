//! Event fan-out
//!
//! A process-scoped subscriber registry: every connected station display
//! registers a bounded queue, and each committed order mutation is pushed
//! to all of them as a serialized `{type, data}` frame.
//!
//! Delivery is best-effort by design. `try_send` never blocks the engine;
//! a subscriber whose queue is full simply misses that frame and
//! reconciles with a full refetch, and a closed queue is cleaned up when
//! its connection task exits. No event is persisted or replayed.

pub mod handler;

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;
use shared::message::{
    OrderDeletedPayload, OrderEventKind, PushEnvelope, StationClearPayload, clear_event_type,
};
use shared::models::Station;
use tokio::sync::mpsc;

/// Frames buffered per subscriber before drops start
const SUBSCRIBER_QUEUE_CAPACITY: usize = 32;

/// Push-channel subscriber registry
///
/// Constructed once at startup and shared via `ServerState`; everything
/// that publishes receives it by reference rather than reaching for a
/// global.
pub struct Broadcaster {
    subscribers: DashMap<u64, mpsc::Sender<String>>,
    next_id: AtomicU64,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a subscriber; returns its id and the frame queue
    pub fn subscribe(&self) -> (u64, mpsc::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);
        self.subscribers.insert(id, tx);
        (id, rx)
    }

    /// Remove a subscriber (connection closed)
    pub fn unsubscribe(&self, id: u64) {
        self.subscribers.remove(&id);
    }

    /// Currently connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Announce an order lifecycle event with the hydrated order
    pub fn broadcast_order<T: Serialize>(&self, kind: OrderEventKind, order: &T) {
        match serde_json::to_value(order) {
            Ok(data) => self.send_envelope(PushEnvelope::new(kind.as_type(), data)),
            Err(e) => tracing::error!(error = %e, "Failed to encode order event payload"),
        }
    }

    /// Announce a hard delete (only the id survives)
    pub fn broadcast_deleted(&self, order_id: &str) {
        let payload = OrderDeletedPayload {
            id: order_id.to_string(),
        };
        match serde_json::to_value(&payload) {
            Ok(data) => self.send_envelope(PushEnvelope::new(OrderEventKind::Delete.as_type(), data)),
            Err(e) => tracing::error!(error = %e, "Failed to encode delete event payload"),
        }
    }

    /// Announce a station clear signal
    pub fn broadcast_clear(&self, station: Station, affected: u64) {
        let payload = StationClearPayload { station, affected };
        match serde_json::to_value(&payload) {
            Ok(data) => self.send_envelope(PushEnvelope::new(clear_event_type(station), data)),
            Err(e) => tracing::error!(error = %e, "Failed to encode clear event payload"),
        }
    }

    /// Serialize once, fan out to every subscriber without blocking
    fn send_envelope(&self, envelope: PushEnvelope) {
        let frame = match serde_json::to_string(&envelope) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode push envelope");
                return;
            }
        };

        for entry in self.subscribers.iter() {
            match entry.value().try_send(frame.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        subscriber = entry.key(),
                        event = %envelope.event_type,
                        "Subscriber queue full, dropping frame"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // Connection task exited; it removes itself on cleanup
                    tracing::debug!(subscriber = entry.key(), "Subscriber queue closed");
                }
            }
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_envelope() {
        let broadcaster = Broadcaster::new();
        let (_, mut rx) = broadcaster.subscribe();

        broadcaster.broadcast_clear(Station::Kitchen, 3);

        let frame = rx.try_recv().expect("frame should be queued");
        let envelope: PushEnvelope = serde_json::from_str(&frame).unwrap();
        assert_eq!(envelope.event_type, "kitchen:clear");
        assert_eq!(envelope.data["station"], "kitchen");
        assert_eq!(envelope.data["affected"], 3);
    }

    #[test]
    fn test_all_subscribers_receive() {
        let broadcaster = Broadcaster::new();
        let (_, mut rx1) = broadcaster.subscribe();
        let (_, mut rx2) = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        broadcaster.broadcast_deleted("order:gone");

        for rx in [&mut rx1, &mut rx2] {
            let frame = rx.try_recv().unwrap();
            let envelope: PushEnvelope = serde_json::from_str(&frame).unwrap();
            assert_eq!(envelope.event_type, "order:delete");
            assert_eq!(envelope.data["id"], "order:gone");
        }
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let broadcaster = Broadcaster::new();
        let (_, mut rx) = broadcaster.subscribe();

        // Nobody drains rx; overflow past the queue capacity must not
        // block or error
        for _ in 0..(SUBSCRIBER_QUEUE_CAPACITY + 10) {
            broadcaster.broadcast_deleted("order:x");
        }

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, SUBSCRIBER_QUEUE_CAPACITY);
    }

    #[test]
    fn test_unsubscribe_removes() {
        let broadcaster = Broadcaster::new();
        let (id, _rx) = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 1);
        broadcaster.unsubscribe(id);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }
}
