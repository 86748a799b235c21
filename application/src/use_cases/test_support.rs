//! In-memory fakes of the ports for use case tests

use crate::ports::cache::CachePort;
use crate::ports::event_publisher::{EventPublisher, PublishError};
use crate::ports::tool_repository::{RepositoryError, ToolRepository};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use toolgraph_domain::{Tool, ToolDependency, ToolId};

#[derive(Default)]
pub struct FakeRepository {
    tools: RwLock<IndexMap<ToolId, Tool>>,
    pub active_loads: AtomicUsize,
}

impl FakeRepository {
    pub fn with_tools(tools: impl IntoIterator<Item = Tool>) -> Self {
        let repository = Self::default();
        for tool in tools {
            repository.tools.write().insert(tool.id.clone(), tool);
        }
        repository
    }

    pub fn loads(&self) -> usize {
        self.active_loads.load(Ordering::SeqCst)
    }
}

impl ToolRepository for FakeRepository {
    fn load_active_tools(&self) -> Result<Vec<Tool>, RepositoryError> {
        self.active_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.tools.read().values().filter(|t| t.active).cloned().collect())
    }

    fn find_tool(&self, id: &ToolId) -> Result<Option<Tool>, RepositoryError> {
        Ok(self.tools.read().get(id).cloned())
    }

    fn find_tool_by_name(&self, name: &str) -> Result<Option<Tool>, RepositoryError> {
        Ok(self.tools.read().values().find(|t| t.name == name).cloned())
    }

    fn load_all_dependency_edges(&self) -> Result<Vec<ToolDependency>, RepositoryError> {
        Ok(self
            .tools
            .read()
            .values()
            .flat_map(|t| t.dependencies.iter().cloned())
            .collect())
    }

    fn save_tool(&self, tool: Tool) -> Result<(), RepositoryError> {
        self.tools.write().insert(tool.id.clone(), tool);
        Ok(())
    }

    fn delete_tool(&self, id: &ToolId) -> Result<bool, RepositoryError> {
        Ok(self.tools.write().shift_remove(id).is_some())
    }
}

/// Ignores TTLs
pub struct MemoryCache<V> {
    entries: Mutex<HashMap<(String, String), V>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> MemoryCache<V> {
    pub fn len(&self, namespace: &str) -> usize {
        self.entries
            .lock()
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .count()
    }
}

impl<V: Clone + Send + Sync> CachePort<V> for MemoryCache<V> {
    fn get(&self, namespace: &str, key: &str) -> Option<V> {
        self.entries
            .lock()
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    fn put(&self, namespace: &str, key: &str, value: V, _ttl: Duration) {
        self.entries
            .lock()
            .insert((namespace.to_string(), key.to_string()), value);
    }

    fn invalidate_all(&self, namespace: &str) {
        self.entries.lock().retain(|(ns, _), _| ns != namespace);
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<(String, String, Value)>>,
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: Value) -> Result<(), PublishError> {
        self.events
            .lock()
            .push((topic.to_string(), key.to_string(), payload));
        Ok(())
    }
}

pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _topic: &str, _key: &str, _payload: Value) -> Result<(), PublishError> {
        Err(PublishError::Unavailable("broker down".to_string()))
    }
}

/// `a <- b <- c`, all required
pub fn chain() -> Vec<Tool> {
    vec![
        Tool::new("a", "A"),
        Tool::new("b", "B").with_dependency(ToolDependency::required("a")),
        Tool::new("c", "C").with_dependency(ToolDependency::required("b")),
    ]
}

pub fn ids(names: &[&str]) -> Vec<ToolId> {
    names.iter().map(|n| ToolId::from(*n)).collect()
}
