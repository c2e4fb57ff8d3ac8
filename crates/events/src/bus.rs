//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`MarketEvent`]s. It is
//! shared via `Arc<EventBus>` across the application; the HTTP handlers
//! publish, the live feeds subscribe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use reachly_core::types::DbId;

/// Entity kinds referenced by events.
pub mod entities {
    pub const CAMPAIGN: &str = "campaign";
    pub const APPLICATION: &str = "application";
}

// ---------------------------------------------------------------------------
// MarketEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Dot-separated event name, e.g. `"campaign.created"`.
    pub kind: String,

    /// Source entity kind (`"campaign"`, `"application"`).
    pub entity_type: Option<String>,

    /// Source entity database id.
    pub entity_id: Option<DbId>,

    /// Id of the user or brand that triggered the event.
    pub actor_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub occurred_at: DateTime<Utc>,
}

impl MarketEvent {
    /// Create a new event with only the required `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            entity_type: None,
            entity_id: None,
            actor_id: None,
            payload: serde_json::Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    /// Shorthand for a campaign-sourced event.
    pub fn campaign(kind: impl Into<String>, campaign_id: DbId) -> Self {
        Self::new(kind).with_entity(entities::CAMPAIGN, campaign_id)
    }

    /// Shorthand for an application-sourced event.
    pub fn application(kind: impl Into<String>, application_id: DbId) -> Self {
        Self::new(kind).with_entity(entities::APPLICATION, application_id)
    }

    /// Attach a source entity to the event.
    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    /// Attach the acting identity to the event.
    pub fn with_actor(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Returns `true` if the event originates from the given entity kind.
    pub fn is_for(&self, entity_type: &str) -> bool {
        self.entity_type.as_deref() == Some(entity_type)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`MarketEvent`].
pub struct EventBus {
    sender: broadcast::Sender<MarketEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: MarketEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = MarketEvent::campaign("campaign.created", 42)
            .with_actor(7)
            .with_payload(serde_json::json!({"status": "draft"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, "campaign.created");
        assert_eq!(received.entity_type.as_deref(), Some("campaign"));
        assert_eq!(received.entity_id, Some(42));
        assert_eq!(received.actor_id, Some(7));
        assert_eq!(received.payload["status"], "draft");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(MarketEvent::application("application.submitted", 9));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.kind, "application.submitted");
        assert_eq!(e2.kind, "application.submitted");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(MarketEvent::new("orphan.event"));
    }

    #[test]
    fn is_for_matches_entity_kind() {
        let event = MarketEvent::campaign("campaign.updated", 1);
        assert!(event.is_for(entities::CAMPAIGN));
        assert!(!event.is_for(entities::APPLICATION));

        let bare = MarketEvent::new("bare.event");
        assert!(!bare.is_for(entities::CAMPAIGN));
    }
}
