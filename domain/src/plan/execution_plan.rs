//! Execution plan value objects

use crate::tool::{ToolId, ToolParameter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A parameter the caller still has to supply before a tool can run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRequirement {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub priority: u32,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<String>,
}

impl From<&ToolParameter> for ParameterRequirement {
    fn from(parameter: &ToolParameter) -> Self {
        Self {
            name: parameter.name.clone(),
            description: parameter.description.clone(),
            required: parameter.required,
            priority: parameter.priority,
            param_type: parameter.param_type.clone(),
            default_value: parameter.default_value.clone(),
            examples: parameter.examples.clone(),
        }
    }
}

/// A value passed at execution time from an upstream tool's output
/// into a downstream tool's input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterFlow {
    pub source_tool: ToolId,
    pub source_parameter: String,
    pub target_parameter: String,
}

/// The ordered, parameter-annotated, parallelism-aware schedule for a
/// requested tool set. Never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    /// The tools the caller asked for, deduplicated, in request order
    pub requested_tools: Vec<ToolId>,
    /// Dependency closure in topological order (dependencies first)
    pub tools_in_order: Vec<ToolId>,
    /// Only tools with at least one missing parameter appear here
    pub missing_parameters: IndexMap<ToolId, Vec<ParameterRequirement>>,
    /// Keyed by the dependent (receiving) tool
    pub parameter_mappings: IndexMap<ToolId, Vec<ParameterFlow>>,
    pub has_missing_required_parameters: bool,
    /// Dependency-depth levels; tools within a group may run concurrently
    pub parallel_execution_groups: Vec<Vec<ToolId>>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.tools_in_order.is_empty()
    }

    /// No required parameter is missing anywhere in the plan.
    pub fn is_executable(&self) -> bool {
        !self.has_missing_required_parameters
    }

    pub fn missing_for(&self, tool_id: &ToolId) -> &[ParameterRequirement] {
        self.missing_parameters
            .get(tool_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn mappings_for(&self, tool_id: &ToolId) -> &[ParameterFlow] {
        self.parameter_mappings
            .get(tool_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_missing(&self) -> usize {
        self.missing_parameters.values().map(|v| v.len()).sum()
    }

    pub fn position(&self, tool_id: &ToolId) -> Option<usize> {
        self.tools_in_order.iter().position(|t| t == tool_id)
    }

    /// Index of the parallel group containing `tool_id`
    pub fn group_of(&self, tool_id: &ToolId) -> Option<usize> {
        self.parallel_execution_groups
            .iter()
            .position(|group| group.contains(tool_id))
    }
}
