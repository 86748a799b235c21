//! Dependency graph builder
//!
//! Turns stored tool records into a [`ToolGraph`] where an edge runs from a
//! dependency tool to the tool that depends on it. Only active tools become
//! nodes, and edges touching an inactive tool are skipped.
//!
//! Built graphs are cached per mode (`required_only` or not) until the next
//! [`invalidate`](DependencyGraphService::invalidate). A generation counter is
//! bumped on every invalidation and each cached graph is tagged with the
//! generation it was loaded under; a cached graph from an older generation
//! is treated as a miss, so a build racing with a mutation is never served.

use crate::config::PlannerConfig;
use crate::ports::cache::{CachePort, GRAPH_NAMESPACE};
use crate::ports::tool_repository::ToolRepository;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use toolgraph_domain::{
    DependencyType, DomainError, GraphSnapshot, SnapshotEdge, Tool, ToolGraph, ToolId,
};
use tracing::{debug, info};

/// Builds and caches dependency graphs from the tool repository.
pub struct DependencyGraphService {
    repository: Arc<dyn ToolRepository>,
    cache: Arc<dyn CachePort<Arc<ToolGraph>>>,
    ttl: Duration,
    generation: AtomicU64,
}

impl DependencyGraphService {
    pub fn new(
        repository: Arc<dyn ToolRepository>,
        cache: Arc<dyn CachePort<Arc<ToolGraph>>>,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            ttl: config.graph_ttl,
            generation: AtomicU64::new(0),
        }
    }

    /// The graph over active tools; optional edges are left out when
    /// `required_only` is set.
    pub fn build_dependency_graph(&self, required_only: bool) -> Result<Arc<ToolGraph>, DomainError> {
        let key = cache_key(required_only);
        let generation = self.generation();

        if let Some(graph) = self.cache.get(GRAPH_NAMESPACE, key) {
            if built_under(&graph) == Some(generation) {
                debug!(required_only, "Dependency graph cache hit");
                return Ok(graph);
            }
            debug!(required_only, generation, "Cached dependency graph is stale");
        }

        let tools = self.repository.load_active_tools()?;
        let mut graph = assemble(&tools, required_only);
        graph.set_metadata(GENERATION_KEY, generation.to_string());
        let graph = Arc::new(graph);

        info!(
            required_only,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Dependency graph rebuilt"
        );

        self.cache
            .put(GRAPH_NAMESPACE, key, Arc::clone(&graph), self.ttl);
        Ok(graph)
    }

    /// Nodes and typed edges of the full (required + optional) graph.
    ///
    /// Graph and edge types come from one repository read.
    pub fn snapshot(&self) -> Result<GraphSnapshot, DomainError> {
        let tools = self.repository.load_active_tools()?;
        let graph = assemble(&tools, false);

        let mut types: HashMap<(&ToolId, &ToolId), DependencyType> = HashMap::new();
        for tool in &tools {
            for dependency in &tool.dependencies {
                let entry = types
                    .entry((&dependency.dependency_tool, &tool.id))
                    .or_insert(dependency.dependency_type);
                if dependency.is_required() {
                    *entry = DependencyType::Required;
                }
            }
        }

        let edges = graph
            .edges()
            .filter_map(|(from, to)| {
                types.get(&(from, to)).map(|&dependency_type| SnapshotEdge {
                    from: from.clone(),
                    to: to.clone(),
                    dependency_type,
                })
            })
            .collect();

        Ok(GraphSnapshot {
            nodes: graph.nodes().cloned().collect(),
            edges,
        })
    }

    /// Drop cached graphs in both modes.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cache.invalidate_all(GRAPH_NAMESPACE);
        debug!(generation, "Dependency graph cache invalidated");
    }

    /// Incremented on every invalidation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

const GENERATION_KEY: &str = "generation";

/// Generation a cached graph was loaded under
fn built_under(graph: &ToolGraph) -> Option<u64> {
    graph.metadata(GENERATION_KEY)?.parse().ok()
}

fn cache_key(required_only: bool) -> &'static str {
    if required_only { "required" } else { "all" }
}

fn assemble(tools: &[Tool], required_only: bool) -> ToolGraph {
    let active: HashSet<&ToolId> = tools.iter().map(|t| &t.id).collect();
    let mut graph = ToolGraph::new();

    for tool in tools {
        graph.add_node(tool.id.clone());
    }

    for tool in tools {
        for dependency in &tool.dependencies {
            if required_only && !dependency.is_required() {
                continue;
            }
            if !active.contains(&dependency.dependency_tool) {
                debug!(
                    tool = %tool.id,
                    dependency = %dependency.dependency_tool,
                    "Skipping edge to inactive or unknown tool"
                );
                continue;
            }
            graph.add_edge(dependency.dependency_tool.clone(), tool.id.clone());
        }
    }

    graph.set_metadata("required_only", required_only.to_string());
    graph
}
