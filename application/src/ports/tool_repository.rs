//! Tool repository port
//!
//! The storage collaborator. Every call is synchronous: the planner treats
//! storage as a blocking dependency and holds no transaction of its own.

use thiserror::Error;
use toolgraph_domain::{DomainError, Tool, ToolDependency, ToolId};

/// Errors raised by repository adapters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Tool not found: {0}")]
    NotFound(ToolId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => DomainError::ToolNotFound(id),
            RepositoryError::Backend(message) => DomainError::Storage(message),
        }
    }
}

/// Read/write access to tool records
///
/// Tools come back with their parameters and dependencies eagerly loaded.
pub trait ToolRepository: Send + Sync {
    /// All tools with `active = true`
    fn load_active_tools(&self) -> Result<Vec<Tool>, RepositoryError>;

    /// A tool by id, active or not
    fn find_tool(&self, id: &ToolId) -> Result<Option<Tool>, RepositoryError>;

    fn find_tool_by_name(&self, name: &str) -> Result<Option<Tool>, RepositoryError>;

    fn tool_exists(&self, id: &ToolId) -> Result<bool, RepositoryError> {
        Ok(self.find_tool(id)?.is_some())
    }

    /// Every dependency edge in the system, including those owned by
    /// inactive tools
    fn load_all_dependency_edges(&self) -> Result<Vec<ToolDependency>, RepositoryError>;

    /// Insert or replace a tool record
    fn save_tool(&self, tool: Tool) -> Result<(), RepositoryError>;

    /// Returns whether a record was removed
    fn delete_tool(&self, id: &ToolId) -> Result<bool, RepositoryError>;
}
