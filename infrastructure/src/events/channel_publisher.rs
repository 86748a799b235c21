//! In-process publisher over a tokio broadcast channel.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use toolgraph_application::{EventPublisher, PublishError};
use tracing::debug;

/// A published event as seen by subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    pub topic: String,
    pub key: String,
    pub payload: Value,
}

/// Fans events out to every current subscriber.
///
/// Publishing with no subscribers is not an error. Slow subscribers that
/// fall more than `capacity` events behind lose the oldest ones.
pub struct ChannelEventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

impl ChannelEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for ChannelEventPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: Value) -> Result<(), PublishError> {
        let event = PublishedEvent {
            topic: topic.to_string(),
            key: key.to_string(),
            payload,
        };
        match self.sender.send(event) {
            Ok(receivers) => debug!(topic, key, receivers, "Event broadcast"),
            Err(_) => debug!(topic, key, "No subscribers for event"),
        }
        Ok(())
    }
}
