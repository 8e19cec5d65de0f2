//! In-process pub/sub hub for real-time dashboard events.
//!
//! Topic-keyed broadcast channels push committed records to SSE endpoints.
//! Delivery is at-most-once to currently connected observers: no queuing,
//! no replay, no acknowledgment. Publishing with no subscribers is a no-op.
//!
//! Producers (route handlers, after commit):
//!   hub.publish("registrations", "new-registration", payload).await;
//!
//! Consumers (SSE endpoints):
//!   let rx = hub.subscribe("registrations").await;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Topic for committed registration events.
pub const REGISTRATIONS_TOPIC: &str = "registrations";

/// Topic for committed sponsor events.
pub const SPONSORS_TOPIC: &str = "sponsors";

/// A named event carrying a committed record as JSON.
#[derive(Debug, Clone)]
pub struct BroadcastEvent {
    /// Event name as seen by SSE clients (e.g. "new-registration")
    pub event: String,
    pub data: serde_json::Value,
}

/// In-process broadcast hub, keyed by string topics.
///
/// Thread-safe and cloneable; clones share the same channels.
#[derive(Clone)]
pub struct EventHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<BroadcastEvent>>>>,
    capacity: usize,
}

impl EventHub {
    /// Create a hub with default per-topic capacity (256 events).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Publish a named event to a topic. No-op if nobody is subscribed.
    pub async fn publish(&self, topic: &str, event: &str, data: serde_json::Value) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            // Send errors just mean there are no active receivers
            let _ = tx.send(BroadcastEvent {
                event: event.to_string(),
                data,
            });
        }
    }

    /// Subscribe to a topic, creating the channel if it doesn't exist.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<BroadcastEvent> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe_roundtrip() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe(REGISTRATIONS_TOPIC).await;

        let data = serde_json::json!({"teamName": "Alpha"});
        hub.publish(REGISTRATIONS_TOPIC, "new-registration", data.clone())
            .await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, "new-registration");
        assert_eq!(received.data, data);
    }

    #[tokio::test]
    async fn test_publish_no_subscribers_is_noop() {
        let hub = EventHub::new();
        // Should not panic
        hub.publish("nobody:listening", "dropped", serde_json::json!({}))
            .await;
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let hub = EventHub::new();
        let _keepalive = hub.subscribe(REGISTRATIONS_TOPIC).await;

        hub.publish(REGISTRATIONS_TOPIC, "new-registration", serde_json::json!({"n": 1}))
            .await;

        // A subscriber that connects after publish sees nothing
        let mut late = hub.subscribe(REGISTRATIONS_TOPIC).await;
        hub.publish(REGISTRATIONS_TOPIC, "new-registration", serde_json::json!({"n": 2}))
            .await;

        let received = late.recv().await.unwrap();
        assert_eq!(received.data["n"], 2);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let hub = EventHub::new();
        let mut rx1 = hub.subscribe(SPONSORS_TOPIC).await;
        let mut rx2 = hub.subscribe(SPONSORS_TOPIC).await;

        hub.publish(SPONSORS_TOPIC, "new-sponsor", serde_json::json!({"name": "Acme"}))
            .await;

        assert_eq!(rx1.recv().await.unwrap().event, "new-sponsor");
        assert_eq!(rx2.recv().await.unwrap().event, "new-sponsor");
    }
}
