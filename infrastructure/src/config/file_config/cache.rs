//! `[cache]` section

use serde::{Deserialize, Serialize};

/// Cache lifetimes and capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    pub graph_ttl_seconds: u64,
    pub plan_ttl_seconds: u64,
    /// Per-namespace entry cap
    pub max_plan_entries: usize,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            graph_ttl_seconds: 300,
            plan_ttl_seconds: 60,
            max_plan_entries: 1_024,
        }
    }
}
