//! Tool catalog commands
//!
//! Create, update, (de)activate and delete tools, and add or remove single
//! dependencies. Every write runs the [`DependencyValidator`] and persists
//! only on success, with writers serialised by an in-process lock so the
//! check and the save cannot interleave with another writer. After a
//! successful write the [`GraphUpdateNotifier`] invalidates caches and
//! publishes a snapshot.

use crate::ports::tool_repository::{RepositoryError, ToolRepository};
use crate::use_cases::dependency_validator::DependencyValidator;
use crate::use_cases::graph_notifier::GraphUpdateNotifier;
use indexmap::{IndexMap, IndexSet};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use toolgraph_domain::{DomainError, Tool, ToolDependency, ToolGraph, ToolId};
use tracing::{info, warn};

pub struct ToolCatalogService {
    repository: Arc<dyn ToolRepository>,
    validator: DependencyValidator,
    notifier: Arc<GraphUpdateNotifier>,
    write_lock: Mutex<()>,
}

impl ToolCatalogService {
    pub fn new(repository: Arc<dyn ToolRepository>, notifier: Arc<GraphUpdateNotifier>) -> Self {
        Self {
            validator: DependencyValidator::new(repository.clone()),
            repository,
            notifier,
            write_lock: Mutex::new(()),
        }
    }

    /// Register a new tool. Fails on a taken id or name.
    pub async fn create_tool(&self, tool: Tool) -> Result<Tool, DomainError> {
        let tool = self.insert(tool)?;
        info!(tool = %tool.id, name = %tool.name, "Tool created");
        self.after_write(&tool.id).await;
        Ok(tool)
    }

    /// Replace a tool's definition; the stored version is bumped.
    pub async fn update_tool(&self, tool: Tool) -> Result<Tool, DomainError> {
        let mut tool = tool.normalized();
        {
            let _guard = self.write_lock.lock();
            let existing = self.require(&tool.id)?;
            if tool.name != existing.name
                && let Some(other) = self.repository.find_tool_by_name(&tool.name)?
                && other.id != tool.id
            {
                return Err(DomainError::DuplicateToolName(tool.name));
            }
            self.validator.validate_tool(&tool)?;
            tool.version = existing.version + 1;
            self.repository.save_tool(tool.clone())?;
        }
        info!(tool = %tool.id, version = tool.version, "Tool updated");
        self.after_write(&tool.id).await;
        Ok(tool)
    }

    /// Activate or deactivate a tool. A no-op when already in that state.
    pub async fn set_active(&self, id: &ToolId, active: bool) -> Result<Tool, DomainError> {
        let tool = {
            let _guard = self.write_lock.lock();
            let mut tool = self.require(id)?;
            if tool.active == active {
                return Ok(tool);
            }
            tool.active = active;
            tool.version += 1;
            self.repository.save_tool(tool.clone())?;
            tool
        };
        info!(tool = %id, active, "Tool activation changed");
        self.after_write(id).await;
        Ok(tool)
    }

    /// Remove a tool no other tool depends on.
    pub async fn delete_tool(&self, id: &ToolId) -> Result<(), DomainError> {
        {
            let _guard = self.write_lock.lock();
            self.require(id)?;

            let dependents: IndexSet<ToolId> = self
                .repository
                .load_all_dependency_edges()?
                .into_iter()
                .filter(|edge| &edge.dependency_tool == id && &edge.tool != id)
                .map(|edge| edge.tool)
                .collect();
            if !dependents.is_empty() {
                return Err(DomainError::ToolHasDependents {
                    tool_id: id.clone(),
                    dependents: dependents.into_iter().collect(),
                });
            }

            self.repository.delete_tool(id)?;
        }
        info!(tool = %id, "Tool deleted");
        self.after_write(id).await;
        Ok(())
    }

    /// Add `dependency` to its owning tool, replacing any existing edge to
    /// the same dependency tool.
    pub async fn add_dependency(&self, dependency: ToolDependency) -> Result<Tool, DomainError> {
        let owner = dependency.tool.clone();
        let tool = {
            let _guard = self.write_lock.lock();
            let mut tool = self.require(&owner)?;
            tool.dependencies
                .retain(|d| d.dependency_tool != dependency.dependency_tool);
            tool.dependencies.push(dependency);
            self.validator.validate_tool(&tool)?;
            tool.version += 1;
            self.repository.save_tool(tool.clone())?;
            tool
        };
        info!(tool = %owner, dependencies = tool.dependencies.len(), "Dependency added");
        self.after_write(&owner).await;
        Ok(tool)
    }

    /// Drop the edge `dependency_tool -> tool_id`. Unchanged if absent.
    pub async fn remove_dependency(&self, tool_id: &ToolId, dependency_tool: &ToolId) -> Result<Tool, DomainError> {
        let tool = {
            let _guard = self.write_lock.lock();
            let mut tool = self.require(tool_id)?;
            let before = tool.dependencies.len();
            tool.dependencies
                .retain(|d| &d.dependency_tool != dependency_tool);
            if tool.dependencies.len() == before {
                return Ok(tool);
            }
            tool.version += 1;
            self.repository.save_tool(tool.clone())?;
            tool
        };
        info!(tool = %tool_id, dependency = %dependency_tool, "Dependency removed");
        self.after_write(tool_id).await;
        Ok(tool)
    }

    /// Create a batch of tools in dependency order.
    ///
    /// Tools may reference each other in any order within the batch. The
    /// whole batch is validated against the stored catalog plus the tools
    /// staged before it; nothing is persisted unless every tool passes.
    /// Publishes a single graph update at the end.
    pub async fn import_tools(&self, tools: Vec<Tool>) -> Result<Vec<ToolId>, DomainError> {
        let mut batch: HashMap<ToolId, Tool> = HashMap::with_capacity(tools.len());
        let mut graph = ToolGraph::new();

        for tool in tools {
            graph.add_node(tool.id.clone());
            for dependency in &tool.dependencies {
                graph.add_edge(dependency.dependency_tool.clone(), tool.id.clone());
            }
            let id = tool.id.clone();
            if batch.insert(id.clone(), tool).is_some() {
                return Err(DomainError::DuplicateToolId(id));
            }
        }

        let order = graph.topological_sort().map_err(|_| DomainError::CyclicDependency {
            tool_ids: graph.find_cycle().unwrap_or_default(),
        })?;

        let created = {
            let _guard = self.write_lock.lock();
            let staged = self.stage_batch(order, batch)?;
            self.persist_batch(staged)?
        };

        info!(tools = created.len(), "Tool catalog imported");
        if let Some(last) = created.last() {
            self.after_write(last).await;
        }
        Ok(created)
    }

    /// Validate each tool as if the ones before it were already stored.
    fn stage_batch(&self, order: Vec<ToolId>, mut batch: HashMap<ToolId, Tool>) -> Result<Vec<Tool>, DomainError> {
        let overlay = Arc::new(BatchOverlay::new(self.repository.clone()));
        let validator = DependencyValidator::new(overlay.clone());

        let mut staged = Vec::with_capacity(batch.len());
        for id in order {
            let Some(tool) = batch.remove(&id) else { continue };
            let tool = tool.normalized();
            if overlay.tool_exists(&tool.id)? {
                return Err(DomainError::DuplicateToolId(tool.id));
            }
            if overlay.find_tool_by_name(&tool.name)?.is_some() {
                return Err(DomainError::DuplicateToolName(tool.name));
            }
            validator.validate_tool(&tool)?;
            overlay.save_tool(tool.clone())?;
            staged.push(tool);
        }
        Ok(staged)
    }

    /// Save staged tools; on a storage failure the ones already saved are
    /// deleted again.
    fn persist_batch(&self, staged: Vec<Tool>) -> Result<Vec<ToolId>, DomainError> {
        let mut created: Vec<ToolId> = Vec::with_capacity(staged.len());
        for tool in staged {
            let id = tool.id.clone();
            if let Err(e) = self.repository.save_tool(tool) {
                warn!(tool = %id, saved = created.len(), error = %e, "Import failed, rolling back");
                for saved in created.iter().rev() {
                    if let Err(undo) = self.repository.delete_tool(saved) {
                        warn!(tool = %saved, error = %undo, "Rollback of imported tool failed");
                    }
                }
                return Err(e.into());
            }
            created.push(id);
        }
        Ok(created)
    }

    fn insert(&self, tool: Tool) -> Result<Tool, DomainError> {
        let tool = tool.normalized();
        let _guard = self.write_lock.lock();

        if self.repository.tool_exists(&tool.id)? {
            return Err(DomainError::DuplicateToolId(tool.id));
        }
        if self.repository.find_tool_by_name(&tool.name)?.is_some() {
            return Err(DomainError::DuplicateToolName(tool.name));
        }
        self.validator.validate_tool(&tool)?;
        self.repository.save_tool(tool.clone())?;
        Ok(tool)
    }

    fn require(&self, id: &ToolId) -> Result<Tool, DomainError> {
        self.repository
            .find_tool(id)?
            .ok_or_else(|| DomainError::ToolNotFound(id.clone()))
    }

    async fn after_write(&self, id: &ToolId) {
        if let Err(e) = self.notifier.publish_graph_update(id).await {
            warn!(tool = %id, error = %e, "Graph rebuild after write failed");
        }
    }
}

/// Staged batch layered over the stored catalog
///
/// Writes land in the overlay only, so a batch can be validated tool by tool
/// without touching storage.
struct BatchOverlay {
    base: Arc<dyn ToolRepository>,
    staged: RwLock<IndexMap<ToolId, Tool>>,
}

impl BatchOverlay {
    fn new(base: Arc<dyn ToolRepository>) -> Self {
        Self {
            base,
            staged: RwLock::new(IndexMap::new()),
        }
    }
}

impl ToolRepository for BatchOverlay {
    fn load_active_tools(&self) -> Result<Vec<Tool>, RepositoryError> {
        let staged = self.staged.read();
        let mut tools: Vec<Tool> = self
            .base
            .load_active_tools()?
            .into_iter()
            .filter(|t| !staged.contains_key(&t.id))
            .collect();
        tools.extend(staged.values().filter(|t| t.active).cloned());
        Ok(tools)
    }

    fn find_tool(&self, id: &ToolId) -> Result<Option<Tool>, RepositoryError> {
        if let Some(tool) = self.staged.read().get(id) {
            return Ok(Some(tool.clone()));
        }
        self.base.find_tool(id)
    }

    fn find_tool_by_name(&self, name: &str) -> Result<Option<Tool>, RepositoryError> {
        if let Some(tool) = self.staged.read().values().find(|t| t.name == name) {
            return Ok(Some(tool.clone()));
        }
        self.base.find_tool_by_name(name)
    }

    fn load_all_dependency_edges(&self) -> Result<Vec<ToolDependency>, RepositoryError> {
        let staged = self.staged.read();
        let mut edges: Vec<ToolDependency> = self
            .base
            .load_all_dependency_edges()?
            .into_iter()
            .filter(|edge| !staged.contains_key(&edge.tool))
            .collect();
        edges.extend(staged.values().flat_map(|t| t.dependencies.iter().cloned()));
        Ok(edges)
    }

    fn save_tool(&self, tool: Tool) -> Result<(), RepositoryError> {
        self.staged.write().insert(tool.id.clone(), tool);
        Ok(())
    }

    fn delete_tool(&self, id: &ToolId) -> Result<bool, RepositoryError> {
        Ok(self.staged.write().shift_remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::use_cases::dependency_graph::DependencyGraphService;
    use crate::use_cases::execution_plan::ExecutionPlanGenerator;
    use crate::use_cases::test_support::{FakeRepository, MemoryCache, RecordingPublisher, chain, ids};
    use serde_json::Map;
    use toolgraph_domain::{MappingSide, ToolParameter};

    struct Fixture {
        catalog: ToolCatalogService,
        plans: Arc<ExecutionPlanGenerator>,
        repository: Arc<FakeRepository>,
        publisher: Arc<RecordingPublisher>,
    }

    fn fixture(tools: Vec<Tool>) -> Fixture {
        let config = PlannerConfig::default();
        let repository = Arc::new(FakeRepository::with_tools(tools));
        let publisher = Arc::new(RecordingPublisher::default());
        let graphs = Arc::new(DependencyGraphService::new(
            repository.clone(),
            Arc::new(MemoryCache::default()),
            &config,
        ));
        let plans = Arc::new(ExecutionPlanGenerator::new(
            graphs.clone(),
            repository.clone(),
            Arc::new(MemoryCache::default()),
            config.clone(),
        ));
        let notifier = Arc::new(GraphUpdateNotifier::new(
            graphs,
            plans.clone(),
            publisher.clone(),
            config.graph_topic,
        ));
        Fixture {
            catalog: ToolCatalogService::new(repository.clone(), notifier),
            plans,
            repository,
            publisher,
        }
    }

    fn published(fixture: &Fixture) -> usize {
        fixture.publisher.events.lock().len()
    }

    #[tokio::test]
    async fn test_create_tool_validates_and_publishes() {
        let fixture = fixture(chain());
        let tool = Tool::new("d", "D").with_dependency(ToolDependency::required("c"));

        let created = fixture.catalog.create_tool(tool).await.unwrap();
        assert_eq!(created.dependencies[0].tool, ToolId::from("d"));
        assert_eq!(published(&fixture), 1);

        let plan = fixture
            .plans
            .generate_execution_plan(&ids(&["d"]), &Map::new())
            .unwrap();
        assert_eq!(plan.tools_in_order, ids(&["a", "b", "c", "d"]));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let fixture = fixture(chain());
        assert_eq!(
            fixture.catalog.create_tool(Tool::new("a", "Other")).await.unwrap_err(),
            DomainError::DuplicateToolId("a".into())
        );
        assert_eq!(
            fixture.catalog.create_tool(Tool::new("z", "A")).await.unwrap_err(),
            DomainError::DuplicateToolName("A".into())
        );
        assert_eq!(published(&fixture), 0);
    }

    #[tokio::test]
    async fn test_cycle_rejected_before_persistence() {
        let fixture = fixture(vec![
            Tool::new("a", "A"),
            Tool::new("b", "B").with_dependency(ToolDependency::required("a")),
        ]);

        let dependency = ToolDependency::new("a", "b", Default::default());
        let err = fixture.catalog.add_dependency(dependency).await.unwrap_err();
        assert!(matches!(err, DomainError::CyclicDependency { .. }));

        let stored = fixture.repository.find_tool(&"a".into()).unwrap().unwrap();
        assert!(stored.dependencies.is_empty());
        assert_eq!(stored.version, 1);
        assert_eq!(published(&fixture), 0);
    }

    #[tokio::test]
    async fn test_invalid_mapping_aborts_update() {
        let fixture = fixture(vec![
            Tool::new("z", "Z").with_parameter(ToolParameter::optional("out1")),
            Tool::new("y", "Y").with_parameter(ToolParameter::required("p1")),
        ]);

        let updated = Tool::new("y", "Y")
            .with_parameter(ToolParameter::required("p1"))
            .with_dependency(ToolDependency::required("z").with_mapping("missing", "p1"));
        let err = fixture.catalog.update_tool(updated).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidParameterMapping { side: MappingSide::Source, .. }
        ));

        let stored = fixture.repository.find_tool(&"y".into()).unwrap().unwrap();
        assert!(stored.dependencies.is_empty());
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let fixture = fixture(chain());
        let updated = Tool::new("c", "C").with_description("now standalone");

        let saved = fixture.catalog.update_tool(updated).await.unwrap();
        assert_eq!(saved.version, 2);
        assert!(saved.dependencies.is_empty());

        let err = fixture
            .catalog
            .update_tool(Tool::new("c", "B"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateToolName("B".into()));
        assert!(matches!(
            fixture.catalog.update_tool(Tool::new("ghost", "G")).await,
            Err(DomainError::ToolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_dependents() {
        let fixture = fixture(chain());

        let err = fixture.catalog.delete_tool(&"a".into()).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::ToolHasDependents {
                tool_id: "a".into(),
                dependents: ids(&["b"]),
            }
        );

        fixture.catalog.delete_tool(&"c".into()).await.unwrap();
        assert!(fixture.repository.find_tool(&"c".into()).unwrap().is_none());
        assert_eq!(published(&fixture), 1);
    }

    #[tokio::test]
    async fn test_set_active_and_remove_dependency() {
        let fixture = fixture(chain());

        let tool = fixture.catalog.set_active(&"b".into(), false).await.unwrap();
        assert!(!tool.active);
        assert_eq!(tool.version, 2);
        // Already inactive: nothing written or published
        fixture.catalog.set_active(&"b".into(), false).await.unwrap();
        assert_eq!(published(&fixture), 1);

        let tool = fixture
            .catalog
            .remove_dependency(&"c".into(), &"b".into())
            .await
            .unwrap();
        assert!(tool.dependencies.is_empty());
        assert_eq!(published(&fixture), 2);
    }

    #[tokio::test]
    async fn test_writes_invalidate_cached_plans() {
        let fixture = fixture(chain());
        let before = fixture
            .plans
            .generate_execution_plan(&ids(&["c"]), &Map::new())
            .unwrap();
        assert_eq!(before.tools_in_order.len(), 3);

        fixture
            .catalog
            .remove_dependency(&"c".into(), &"b".into())
            .await
            .unwrap();

        let after = fixture
            .plans
            .generate_execution_plan(&ids(&["c"]), &Map::new())
            .unwrap();
        assert_eq!(after.tools_in_order, ids(&["c"]));
    }

    #[tokio::test]
    async fn test_import_in_dependency_order() {
        let fixture = fixture(Vec::new());
        let tools = vec![
            Tool::new("c", "C").with_dependency(ToolDependency::required("b")),
            Tool::new("b", "B").with_dependency(ToolDependency::required("a")),
            Tool::new("a", "A"),
        ];

        let created = fixture.catalog.import_tools(tools).await.unwrap();
        assert_eq!(created, ids(&["a", "b", "c"]));
        assert_eq!(published(&fixture), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_cycles_and_dangling_references() {
        let fixture = fixture(Vec::new());
        let cyclic = vec![
            Tool::new("a", "A").with_dependency(ToolDependency::required("b")),
            Tool::new("b", "B").with_dependency(ToolDependency::required("a")),
        ];
        assert!(matches!(
            fixture.catalog.import_tools(cyclic).await,
            Err(DomainError::CyclicDependency { .. })
        ));

        let dangling = vec![Tool::new("x", "X").with_dependency(ToolDependency::required("nowhere"))];
        assert_eq!(
            fixture.catalog.import_tools(dangling).await.unwrap_err(),
            DomainError::DependencyToolNotFound("nowhere".into())
        );
        assert_eq!(published(&fixture), 0);
    }

    #[tokio::test]
    async fn test_failed_import_persists_nothing() {
        let fixture = fixture(vec![Tool::new("a", "A")]);
        let warm = fixture
            .plans
            .generate_execution_plan(&ids(&["a"]), &Map::new())
            .unwrap();
        assert_eq!(warm.tools_in_order, ids(&["a"]));

        let batch = vec![
            Tool::new("b", "B").with_dependency(ToolDependency::required("a")),
            Tool::new("x", "X").with_dependency(ToolDependency::required("nowhere")),
        ];
        assert_eq!(
            fixture.catalog.import_tools(batch).await.unwrap_err(),
            DomainError::DependencyToolNotFound("nowhere".into())
        );
        assert!(fixture.repository.find_tool(&"b".into()).unwrap().is_none());
        assert_eq!(published(&fixture), 0);

        // Caches were never stale: a later create plans normally
        fixture
            .catalog
            .create_tool(Tool::new("b", "B").with_dependency(ToolDependency::required("a")))
            .await
            .unwrap();
        let plan = fixture
            .plans
            .generate_execution_plan(&ids(&["b"]), &Map::new())
            .unwrap();
        assert_eq!(plan.tools_in_order, ids(&["a", "b"]));
    }

    #[tokio::test]
    async fn test_import_rejects_names_taken_inside_batch() {
        let fixture = fixture(vec![Tool::new("a", "A")]);
        let batch = vec![Tool::new("b", "Same"), Tool::new("c", "Same")];

        assert_eq!(
            fixture.catalog.import_tools(batch).await.unwrap_err(),
            DomainError::DuplicateToolName("Same".into())
        );
        assert!(fixture.repository.find_tool(&"b".into()).unwrap().is_none());
        assert!(fixture.repository.find_tool(&"c".into()).unwrap().is_none());

        let clash = vec![Tool::new("a", "Again")];
        assert_eq!(
            fixture.catalog.import_tools(clash).await.unwrap_err(),
            DomainError::DuplicateToolId("a".into())
        );
        assert_eq!(published(&fixture), 0);
    }

    #[test]
    fn test_batch_overlay_shadows_stored_tools() {
        let base = Arc::new(FakeRepository::with_tools(chain()));
        let overlay = BatchOverlay::new(base.clone());

        overlay
            .save_tool(Tool::new("d", "D").with_dependency(ToolDependency::required("c")))
            .unwrap();
        assert!(overlay.tool_exists(&"d".into()).unwrap());
        assert!(overlay.find_tool_by_name("D").unwrap().is_some());
        assert_eq!(overlay.load_active_tools().unwrap().len(), 4);
        assert_eq!(overlay.load_all_dependency_edges().unwrap().len(), 3);
        assert!(base.find_tool(&"d".into()).unwrap().is_none());

        assert!(overlay.delete_tool(&"d".into()).unwrap());
        assert_eq!(overlay.load_active_tools().unwrap().len(), 3);
    }
}
