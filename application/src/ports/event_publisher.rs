//! Event publisher port
//!
//! Fire-and-forget publication of graph update events. Callers log and
//! swallow failures; nothing on the planning path waits on delivery.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while publishing an event
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event sink unavailable: {0}")]
    Unavailable(String),
}

/// Publishes keyed payloads to a named topic
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: Value) -> Result<(), PublishError>;
}

/// No-op implementation for tests and when events are disabled.
pub struct NoEventPublisher;

#[async_trait]
impl EventPublisher for NoEventPublisher {
    async fn publish(&self, _topic: &str, _key: &str, _payload: Value) -> Result<(), PublishError> {
        Ok(())
    }
}
