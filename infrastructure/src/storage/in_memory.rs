//! In-memory tool repository
//!
//! Keeps tool records in insertion order behind a read-write lock. Used by
//! the CLI (filled from a TOML catalog) and as the storage collaborator in
//! tests.

use indexmap::IndexMap;
use parking_lot::RwLock;
use toolgraph_application::{RepositoryError, ToolRepository};
use toolgraph_domain::{Tool, ToolDependency, ToolId};

#[derive(Default)]
pub struct InMemoryToolRepository {
    tools: RwLock<IndexMap<ToolId, Tool>>,
}

impl InMemoryToolRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store without any validation
    pub fn with_tools(tools: impl IntoIterator<Item = Tool>) -> Self {
        let tools = tools
            .into_iter()
            .map(|tool| (tool.id.clone(), tool.normalized()))
            .collect();
        Self {
            tools: RwLock::new(tools),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }

    /// Every stored tool, active or not
    pub fn all_tools(&self) -> Vec<Tool> {
        self.tools.read().values().cloned().collect()
    }
}

impl ToolRepository for InMemoryToolRepository {
    fn load_active_tools(&self) -> Result<Vec<Tool>, RepositoryError> {
        Ok(self
            .tools
            .read()
            .values()
            .filter(|tool| tool.active)
            .cloned()
            .collect())
    }

    fn find_tool(&self, id: &ToolId) -> Result<Option<Tool>, RepositoryError> {
        Ok(self.tools.read().get(id).cloned())
    }

    fn find_tool_by_name(&self, name: &str) -> Result<Option<Tool>, RepositoryError> {
        Ok(self
            .tools
            .read()
            .values()
            .find(|tool| tool.name == name)
            .cloned())
    }

    fn tool_exists(&self, id: &ToolId) -> Result<bool, RepositoryError> {
        Ok(self.tools.read().contains_key(id))
    }

    fn load_all_dependency_edges(&self) -> Result<Vec<ToolDependency>, RepositoryError> {
        Ok(self
            .tools
            .read()
            .values()
            .flat_map(|tool| tool.dependencies.iter().cloned())
            .collect())
    }

    fn save_tool(&self, tool: Tool) -> Result<(), RepositoryError> {
        let tool = tool.normalized();
        self.tools.write().insert(tool.id.clone(), tool);
        Ok(())
    }

    fn delete_tool(&self, id: &ToolId) -> Result<bool, RepositoryError> {
        Ok(self.tools.write().shift_remove(id).is_some())
    }
}
