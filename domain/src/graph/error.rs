//! Graph algorithm errors

use thiserror::Error;

/// Errors raised by [`DirectedGraph`](super::DirectedGraph) algorithms.
///
/// Node identifiers are rendered with `Debug` so the error stays independent
/// of the graph's key type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The graph (or the part being ordered) contains a cycle.
    ///
    /// `nodes` lists the participating nodes in edge order when a concrete
    /// cycle was found, or the nodes left unsorted by Kahn's algorithm.
    #[error("Cycle detected involving: {}", .nodes.join(" -> "))]
    CycleDetected { nodes: Vec<String> },

    /// A traversal or enumeration exceeded its configured bound.
    #[error("{what} exceeded the limit of {limit}")]
    LimitExceeded { what: &'static str, limit: usize },

    /// A weight function returned a negative or NaN weight.
    #[error("Invalid edge weight {weight} on {from} -> {to}")]
    InvalidWeight {
        from: String,
        to: String,
        weight: f64,
    },
}

impl GraphError {
    pub(crate) fn cycle<T: std::fmt::Debug>(nodes: impl IntoIterator<Item = T>) -> Self {
        GraphError::CycleDetected {
            nodes: nodes.into_iter().map(|n| format!("{:?}", n)).collect(),
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, GraphError::CycleDetected { .. })
    }
}
