//! Domain error types

use crate::tool::ToolId;
use thiserror::Error;

/// Which side of a parameter mapping failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingSide {
    /// `source_parameter`, looked up on the dependency tool
    Source,
    /// `target_parameter`, looked up on the dependent tool
    Target,
}

impl std::fmt::Display for MappingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingSide::Source => write!(f, "source"),
            MappingSide::Target => write!(f, "target"),
        }
    }
}

/// Broad classification of [`DomainError`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Attempted or discovered cycle
    Structural,
    NotFound,
    Validation,
    /// Closure or enumeration over its bound
    ResourceLimit,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Structural => "structural",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::ResourceLimit => "resource_limit",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Cyclic dependency detected among tools: {}", join_ids(.tool_ids))]
    CyclicDependency { tool_ids: Vec<ToolId> },

    #[error("Tool not found: {0}")]
    ToolNotFound(ToolId),

    #[error("Dependency tool not found: {0}")]
    DependencyToolNotFound(ToolId),

    #[error(
        "Invalid parameter mapping {dependency_tool_id} -> {tool_id}: {side} parameter '{parameter}' does not exist"
    )]
    InvalidParameterMapping {
        tool_id: ToolId,
        dependency_tool_id: ToolId,
        parameter: String,
        side: MappingSide,
    },

    #[error("Duplicate parameter name '{parameter}' on tool {tool_id}")]
    DuplicateParameterName { tool_id: ToolId, parameter: String },

    #[error("Tool name already in use: {0}")]
    DuplicateToolName(String),

    #[error("Tool id already registered: {0}")]
    DuplicateToolId(ToolId),

    #[error("Tool {tool_id} is still required by: {}", join_ids(.dependents))]
    ToolHasDependents {
        tool_id: ToolId,
        dependents: Vec<ToolId>,
    },

    #[error("Request too large: {what} exceeds the limit of {limit}")]
    RequestTooLarge { what: String, limit: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}

fn join_ids(ids: &[ToolId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::CyclicDependency { .. } => ErrorKind::Structural,
            DomainError::ToolNotFound(_) | DomainError::DependencyToolNotFound(_) => {
                ErrorKind::NotFound
            }
            DomainError::InvalidParameterMapping { .. }
            | DomainError::DuplicateParameterName { .. }
            | DomainError::DuplicateToolName(_)
            | DomainError::DuplicateToolId(_)
            | DomainError::ToolHasDependents { .. } => ErrorKind::Validation,
            DomainError::RequestTooLarge { .. } => ErrorKind::ResourceLimit,
            DomainError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// HTTP-equivalent status for REST and event adapters
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Structural | ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::ResourceLimit => 413,
            ErrorKind::Internal => 500,
        }
    }

    /// Tool IDs named by the error, when it names any
    pub fn tool_ids(&self) -> Vec<ToolId> {
        match self {
            DomainError::CyclicDependency { tool_ids } => tool_ids.clone(),
            DomainError::ToolNotFound(id)
            | DomainError::DependencyToolNotFound(id)
            | DomainError::DuplicateToolId(id) => vec![id.clone()],
            DomainError::InvalidParameterMapping {
                tool_id,
                dependency_tool_id,
                ..
            } => vec![dependency_tool_id.clone(), tool_id.clone()],
            DomainError::DuplicateParameterName { tool_id, .. } => vec![tool_id.clone()],
            DomainError::ToolHasDependents {
                tool_id,
                dependents,
            } => std::iter::once(tool_id.clone())
                .chain(dependents.iter().cloned())
                .collect(),
            DomainError::DuplicateToolName(_)
            | DomainError::RequestTooLarge { .. }
            | DomainError::Storage(_) => Vec::new(),
        }
    }
}
