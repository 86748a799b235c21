//! Dependency analysis queries
//!
//! Read-only questions about the tool graph: what a tool needs, what a
//! change to it would affect, how two tools are connected, and where the
//! cycles are. Queries run on the full graph unless
//! [`with_required_only`](DependencyAnalysisService::with_required_only) is set.

use crate::ports::tool_repository::ToolRepository;
use crate::use_cases::dependency_graph::DependencyGraphService;
use std::sync::Arc;
use toolgraph_domain::{DomainError, GraphError, ToolGraph, ToolId};

pub struct DependencyAnalysisService {
    graphs: Arc<DependencyGraphService>,
    repository: Arc<dyn ToolRepository>,
    max_cycles: usize,
    required_only: bool,
}

impl DependencyAnalysisService {
    pub fn new(
        graphs: Arc<DependencyGraphService>,
        repository: Arc<dyn ToolRepository>,
        max_cycles: usize,
    ) -> Self {
        Self {
            graphs,
            repository,
            max_cycles,
            required_only: false,
        }
    }

    pub fn with_required_only(mut self, required_only: bool) -> Self {
        self.required_only = required_only;
        self
    }

    /// Tools `id` depends on directly
    pub fn direct_dependencies(&self, id: &ToolId) -> Result<Vec<ToolId>, DomainError> {
        let graph = self.graph_containing(id)?;
        Ok(graph.incoming_edges(id).cloned().collect())
    }

    /// Tools that depend on `id` directly
    pub fn direct_dependents(&self, id: &ToolId) -> Result<Vec<ToolId>, DomainError> {
        let graph = self.graph_containing(id)?;
        Ok(graph.outgoing_edges(id).cloned().collect())
    }

    /// Everything `id` transitively depends on
    pub fn all_dependencies(&self, id: &ToolId) -> Result<Vec<ToolId>, DomainError> {
        let graph = self.graph_containing(id)?;
        Ok(graph.reverse_transitive_closure(id).into_iter().collect())
    }

    /// Every tool that transitively depends on `id`, i.e. what a change to
    /// `id` can break
    pub fn impact_of(&self, id: &ToolId) -> Result<Vec<ToolId>, DomainError> {
        let graph = self.graph_containing(id)?;
        Ok(graph.transitive_closure(id).into_iter().collect())
    }

    /// Fewest-hop dependency chain from `from` to `to`; empty when `to`
    /// does not (transitively) depend on `from`.
    pub fn dependency_path(&self, from: &ToolId, to: &ToolId) -> Result<Vec<ToolId>, DomainError> {
        self.graph_containing(to)?;
        let graph = self.graph_containing(from)?;
        Ok(graph.shortest_path(from, to))
    }

    /// All elementary cycles, failing once more than `max_cycles` are found.
    pub fn find_cycles(&self) -> Result<Vec<Vec<ToolId>>, DomainError> {
        let graph = self.graphs.build_dependency_graph(self.required_only)?;
        graph
            .find_cycles_bounded(self.max_cycles)
            .map_err(|e| match e {
                GraphError::LimitExceeded { what, limit } => DomainError::RequestTooLarge {
                    what: what.to_string(),
                    limit,
                },
                other => DomainError::Storage(other.to_string()),
            })
    }

    /// Strongly connected components that contain a cycle
    pub fn strongly_connected_groups(&self) -> Result<Vec<Vec<ToolId>>, DomainError> {
        let graph = self.graphs.build_dependency_graph(self.required_only)?;
        Ok(graph
            .strongly_connected_components()
            .into_iter()
            .filter(|c| c.len() > 1 || c.first().is_some_and(|n| graph.has_edge(n, n)))
            .collect())
    }

    /// The current graph, after checking `id` is a known tool. Inactive
    /// tools are known but absent from the graph; queries on them come
    /// back empty.
    fn graph_containing(&self, id: &ToolId) -> Result<Arc<ToolGraph>, DomainError> {
        let graph = self.graphs.build_dependency_graph(self.required_only)?;
        if !graph.contains_node(id) && !self.repository.tool_exists(id)? {
            return Err(DomainError::ToolNotFound(id.clone()));
        }
        Ok(graph)
    }
}
