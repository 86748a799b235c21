//! Publishes events as `tracing` records.

use async_trait::async_trait;
use serde_json::Value;
use toolgraph_application::{EventPublisher, PublishError};
use tracing::info;

/// Default sink: one `info!` record per event, payload summarised.
pub struct LogEventPublisher;

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: Value) -> Result<(), PublishError> {
        let nodes = payload["nodes"].as_array().map_or(0, |n| n.len());
        let edges = payload["edges"].as_array().map_or(0, |e| e.len());
        info!(topic, key, nodes, edges, "Event published");
        Ok(())
    }
}
