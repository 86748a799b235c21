//! Planner configuration
//!
//! [`PlannerConfig`] is the typed projection of the `[planner]`, `[cache]`
//! and `[events]` file sections that the use cases consume.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which topological sort the plan generator runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Depth-first over incoming edges
    #[default]
    Dfs,
    /// In-degree counting
    Kahn,
}

impl SortStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            SortStrategy::Dfs => "dfs",
            SortStrategy::Kahn => "kahn",
        }
    }
}

impl std::str::FromStr for SortStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dfs" => Ok(SortStrategy::Dfs),
            "kahn" => Ok(SortStrategy::Kahn),
            other => Err(format!("unknown sort strategy '{}' (expected dfs or kahn)", other)),
        }
    }
}

/// Limits and cache lifetimes for graph building and planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Largest dependency closure a single plan may cover
    pub max_closure_size: usize,
    /// Most cycles a single enumeration may report
    pub max_cycles: usize,
    pub sort: SortStrategy,
    pub graph_ttl: Duration,
    pub plan_ttl: Duration,
    /// Topic for graph update events
    pub graph_topic: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_closure_size: 10_000,
            max_cycles: 1_000,
            sort: SortStrategy::Dfs,
            graph_ttl: Duration::from_secs(300),
            plan_ttl: Duration::from_secs(60),
            graph_topic: "tool-graph-updates".to_string(),
        }
    }
}

impl PlannerConfig {
    // ==================== Builder Methods ====================

    pub fn with_max_closure_size(mut self, max: usize) -> Self {
        self.max_closure_size = max;
        self
    }

    pub fn with_max_cycles(mut self, max: usize) -> Self {
        self.max_cycles = max;
        self
    }

    pub fn with_sort(mut self, sort: SortStrategy) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_graph_ttl(mut self, ttl: Duration) -> Self {
        self.graph_ttl = ttl;
        self
    }

    pub fn with_plan_ttl(mut self, ttl: Duration) -> Self {
        self.plan_ttl = ttl;
        self
    }

    pub fn with_graph_topic(mut self, topic: impl Into<String>) -> Self {
        self.graph_topic = topic.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.sort, SortStrategy::Dfs);
        assert_eq!(config.max_closure_size, 10_000);
        assert_eq!(config.graph_topic, "tool-graph-updates");
    }

    #[test]
    fn test_builder_chain() {
        let config = PlannerConfig::default()
            .with_max_closure_size(5)
            .with_sort(SortStrategy::Kahn)
            .with_plan_ttl(Duration::from_secs(1));
        assert_eq!(config.max_closure_size, 5);
        assert_eq!(config.sort, SortStrategy::Kahn);
        assert_eq!(config.plan_ttl, Duration::from_secs(1));
    }

    #[test]
    fn test_sort_strategy_parse() {
        assert_eq!("KAHN".parse::<SortStrategy>().unwrap(), SortStrategy::Kahn);
        assert_eq!("dfs".parse::<SortStrategy>().unwrap(), SortStrategy::Dfs);
        assert!("bfs".parse::<SortStrategy>().is_err());
    }
}
