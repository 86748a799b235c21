//! `[planner]` section

use serde::{Deserialize, Serialize};
use toolgraph_application::SortStrategy;

/// Planner limits and sort choice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    /// Largest dependency closure a single plan may cover
    pub max_closure_size: usize,
    /// Most cycles the `cycles` query will enumerate
    pub max_cycles: usize,
    /// Topological sort used for plans ("dfs" or "kahn")
    pub default_sort: SortStrategy,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        Self {
            max_closure_size: 10_000,
            max_cycles: 1_000,
            default_sort: SortStrategy::Dfs,
        }
    }
}
