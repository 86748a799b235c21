//! Graph update notifier
//!
//! After a tool mutation: invalidate graph and plan caches, rebuild the full
//! graph and publish a [`GraphUpdateEvent`] keyed by the triggering tool.
//! Publishing is best-effort; a failure is logged and never undoes the
//! mutation, since the next read rebuilds from storage anyway.

use crate::ports::event_publisher::EventPublisher;
use crate::use_cases::dependency_graph::DependencyGraphService;
use crate::use_cases::execution_plan::ExecutionPlanGenerator;
use std::sync::Arc;
use toolgraph_domain::{DomainError, GraphUpdateEvent, ToolId};
use tracing::{info, warn};

pub struct GraphUpdateNotifier {
    graphs: Arc<DependencyGraphService>,
    plans: Arc<ExecutionPlanGenerator>,
    publisher: Arc<dyn EventPublisher>,
    topic: String,
}

impl GraphUpdateNotifier {
    pub fn new(
        graphs: Arc<DependencyGraphService>,
        plans: Arc<ExecutionPlanGenerator>,
        publisher: Arc<dyn EventPublisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            graphs,
            plans,
            publisher,
            topic: topic.into(),
        }
    }

    /// Returns the event that was (or would have been) published.
    ///
    /// Fails only if the graph cannot be rebuilt; caches are invalidated
    /// before that point either way.
    pub async fn publish_graph_update(&self, tool_id: &ToolId) -> Result<GraphUpdateEvent, DomainError> {
        self.graphs.invalidate();
        self.plans.invalidate();

        let snapshot = self.graphs.snapshot()?;
        let event = GraphUpdateEvent::new(tool_id.clone(), snapshot);

        let payload = match serde_json::to_value(&event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(tool = %tool_id, error = %e, "Failed to encode graph update");
                return Ok(event);
            }
        };

        match self.publisher.publish(&self.topic, tool_id.as_str(), payload).await {
            Ok(()) => info!(
                tool = %tool_id,
                topic = %self.topic,
                nodes = event.snapshot.node_count(),
                edges = event.snapshot.edge_count(),
                "Graph update published"
            ),
            Err(e) => warn!(tool = %tool_id, topic = %self.topic, error = %e, "Graph update not delivered"),
        }

        Ok(event)
    }
}
