//! Execution plan generator
//!
//! Combines graph order with parameter availability to produce an
//! [`ExecutionPlan`] for a set of requested tools.
//!
//! # Steps
//!
//! 1. **Closure** - requested tools plus everything they transitively depend
//!    on through required edges
//! 2. **Order** - topological sort of the closure's induced subgraph in the
//!    full (required + optional) graph
//! 3. **Missing parameters** - required, not provided, no default, and not
//!    fed by a mapping from an earlier tool in the order
//! 4. **Parameter flows** - mappings on dependency edges inside the closure
//! 5. **Parallel groups** - tools grouped by dependency depth
//!
//! Plans are cached under a hash of the graph generation, the sorted
//! requested ids and the sorted provided parameter names. A cache hit still
//! reports `requested_tools` in the caller's order.

use crate::config::{PlannerConfig, SortStrategy};
use crate::ports::cache::{CachePort, PLAN_NAMESPACE};
use crate::ports::tool_repository::ToolRepository;
use crate::use_cases::dependency_graph::DependencyGraphService;
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use toolgraph_domain::{
    DomainError, ExecutionPlan, ParameterFlow, ParameterRequirement, Tool, ToolGraph, ToolId,
};
use tracing::{debug, info};

/// Parameter values the caller already has, keyed by parameter name
pub type ProvidedParameters = Map<String, Value>;

pub struct ExecutionPlanGenerator {
    graphs: Arc<DependencyGraphService>,
    repository: Arc<dyn ToolRepository>,
    cache: Arc<dyn CachePort<Arc<ExecutionPlan>>>,
    config: PlannerConfig,
}

impl ExecutionPlanGenerator {
    pub fn new(
        graphs: Arc<DependencyGraphService>,
        repository: Arc<dyn ToolRepository>,
        cache: Arc<dyn CachePort<Arc<ExecutionPlan>>>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            graphs,
            repository,
            cache,
            config,
        }
    }

    /// Plan the execution of `requested` given the parameters already known.
    ///
    /// Fails with [`DomainError::ToolNotFound`] for an unknown requested id,
    /// [`DomainError::RequestTooLarge`] when the closure exceeds
    /// `max_closure_size`, and [`DomainError::CyclicDependency`] if stored
    /// dependencies turn out to be cyclic.
    pub fn generate_execution_plan(
        &self,
        requested: &[ToolId],
        provided: &ProvidedParameters,
    ) -> Result<Arc<ExecutionPlan>, DomainError> {
        let requested: IndexSet<ToolId> = requested.iter().cloned().collect();
        let key = plan_cache_key(self.graphs.generation(), &requested, provided);

        if let Some(plan) = self.cache.get(PLAN_NAMESPACE, &key) {
            debug!(tools = requested.len(), "Execution plan cache hit");
            return Ok(with_requested_order(plan, requested));
        }

        let mut tools: HashMap<ToolId, Tool> = HashMap::with_capacity(requested.len());
        for id in &requested {
            let tool = self
                .repository
                .find_tool(id)?
                .ok_or_else(|| DomainError::ToolNotFound(id.clone()))?;
            tools.insert(id.clone(), tool);
        }

        let closure = self.dependency_closure(&requested)?;
        let full = self.graphs.build_dependency_graph(false)?;
        let subgraph = full.subgraph_with_nodes(closure.iter());
        let order = self.sort(&subgraph)?;

        for id in &order {
            if !tools.contains_key(id) {
                let tool = self
                    .repository
                    .find_tool(id)?
                    .ok_or_else(|| DomainError::ToolNotFound(id.clone()))?;
                tools.insert(id.clone(), tool);
            }
        }

        let position: HashMap<&ToolId, usize> = order.iter().enumerate().map(|(i, id)| (id, i)).collect();
        let mut missing_parameters = IndexMap::new();
        let mut parameter_mappings = IndexMap::new();

        for (index, id) in order.iter().enumerate() {
            let Some(tool) = tools.get(id) else { continue };

            let missing = missing_parameters_of(tool, index, &position, provided);
            if !missing.is_empty() {
                missing_parameters.insert(id.clone(), missing);
            }

            let flows = parameter_flows_of(tool, &closure);
            if !flows.is_empty() {
                parameter_mappings.insert(id.clone(), flows);
            }
        }

        let parallel_execution_groups = parallel_groups(&subgraph, &order);
        let plan = Arc::new(ExecutionPlan {
            requested_tools: requested.into_iter().collect(),
            has_missing_required_parameters: !missing_parameters.is_empty(),
            tools_in_order: order,
            missing_parameters,
            parameter_mappings,
            parallel_execution_groups,
        });

        info!(
            tools = plan.tools_in_order.len(),
            groups = plan.parallel_execution_groups.len(),
            missing = plan.total_missing(),
            "Execution plan generated"
        );

        self.cache
            .put(PLAN_NAMESPACE, &key, Arc::clone(&plan), self.config.plan_ttl);
        Ok(plan)
    }

    /// Drop every cached plan.
    pub fn invalidate(&self) {
        self.cache.invalidate_all(PLAN_NAMESPACE);
        debug!("Execution plan cache invalidated");
    }

    /// Requested tools plus their transitive required dependencies.
    ///
    /// An inactive requested tool is absent from the graph; it stays in the
    /// closure on its own.
    fn dependency_closure(&self, requested: &IndexSet<ToolId>) -> Result<IndexSet<ToolId>, DomainError> {
        let required = self.graphs.build_dependency_graph(true)?;
        let mut closure = requested.clone();
        closure.extend(required.reverse_transitive_closure_of(requested.iter()));

        if closure.len() > self.config.max_closure_size {
            return Err(DomainError::RequestTooLarge {
                what: format!("dependency closure of {} tools", closure.len()),
                limit: self.config.max_closure_size,
            });
        }
        Ok(closure)
    }

    fn sort(&self, subgraph: &ToolGraph) -> Result<Vec<ToolId>, DomainError> {
        let sorted = match self.config.sort {
            SortStrategy::Dfs => subgraph.topological_sort(),
            SortStrategy::Kahn => subgraph.topological_sort_kahn(),
        };
        sorted.map_err(|_| DomainError::CyclicDependency {
            tool_ids: subgraph.find_cycle().unwrap_or_default(),
        })
    }
}

/// Share the cached plan when the caller asked in the same order, otherwise
/// copy it with `requested_tools` reordered.
fn with_requested_order(plan: Arc<ExecutionPlan>, requested: IndexSet<ToolId>) -> Arc<ExecutionPlan> {
    if plan.requested_tools.iter().eq(requested.iter()) {
        return plan;
    }
    Arc::new(ExecutionPlan {
        requested_tools: requested.into_iter().collect(),
        ..(*plan).clone()
    })
}

/// Hex SHA-256 over the graph generation, sorted ids and sorted parameter names
fn plan_cache_key(generation: u64, requested: &IndexSet<ToolId>, provided: &ProvidedParameters) -> String {
    let mut ids: Vec<&str> = requested.iter().map(|id| id.as_str()).collect();
    ids.sort_unstable();
    let mut names: Vec<&str> = provided.keys().map(|k| k.as_str()).collect();
    names.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(generation.to_le_bytes());
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update([1u8]);
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
    }

    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn missing_parameters_of(
    tool: &Tool,
    index: usize,
    position: &HashMap<&ToolId, usize>,
    provided: &ProvidedParameters,
) -> Vec<ParameterRequirement> {
    // Targets fed by a tool that runs earlier
    let mapped: HashSet<&str> = tool
        .dependencies
        .iter()
        .filter(|d| position.get(&d.dependency_tool).is_some_and(|&p| p < index))
        .flat_map(|d| d.parameter_mappings.iter())
        .map(|m| m.target_parameter.as_str())
        .collect();

    let mut seen = HashSet::new();
    let mut missing: Vec<ParameterRequirement> = tool
        .required_parameters()
        .filter(|p| !provided.contains_key(&p.name))
        .filter(|p| !p.has_default())
        .filter(|p| !mapped.contains(p.name.as_str()))
        .filter(|p| seen.insert(p.name.as_str()))
        .map(ParameterRequirement::from)
        .collect();
    missing.sort_by_key(|p| p.priority);
    missing
}

fn parameter_flows_of(tool: &Tool, closure: &IndexSet<ToolId>) -> Vec<ParameterFlow> {
    tool.dependencies
        .iter()
        .filter(|d| closure.contains(&d.dependency_tool))
        .flat_map(|d| {
            d.parameter_mappings.iter().map(|m| ParameterFlow {
                source_tool: d.dependency_tool.clone(),
                source_parameter: m.source_parameter.clone(),
                target_parameter: m.target_parameter.clone(),
            })
        })
        .collect()
}

/// Level 0 holds tools with no dependency in the subgraph; every other tool
/// sits one level past its deepest dependency.
fn parallel_groups(subgraph: &ToolGraph, order: &[ToolId]) -> Vec<Vec<ToolId>> {
    let mut level: HashMap<&ToolId, usize> = HashMap::with_capacity(order.len());
    let mut groups: Vec<Vec<ToolId>> = Vec::new();

    for id in order {
        let depth = subgraph
            .incoming_edges(id)
            .filter_map(|dep| level.get(dep))
            .max()
            .map_or(0, |deepest| deepest + 1);
        level.insert(id, depth);
        if groups.len() <= depth {
            groups.resize_with(depth + 1, Vec::new);
        }
        groups[depth].push(id.clone());
    }
    groups
}
