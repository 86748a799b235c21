//! Graph update events emitted after catalog mutations

use super::entities::ToolId;
use super::value_objects::DependencyType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed dependency edge in a [`GraphSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    /// Dependency tool
    pub from: ToolId,
    /// Dependent tool
    pub to: ToolId,
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
}

/// Structural view of the full (required + optional) dependency graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<ToolId>,
    pub edges: Vec<SnapshotEdge>,
}

impl GraphSnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Payload published on the graph-update topic.
///
/// Wire format: `{toolId, timestamp, nodes, edges: [{from, to, type}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUpdateEvent {
    /// The tool whose mutation triggered the update
    pub tool_id: ToolId,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub snapshot: GraphSnapshot,
}

impl GraphUpdateEvent {
    pub fn new(tool_id: ToolId, snapshot: GraphSnapshot) -> Self {
        Self {
            tool_id,
            timestamp: Utc::now(),
            snapshot,
        }
    }
}
