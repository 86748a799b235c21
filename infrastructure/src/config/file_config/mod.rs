//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use application types where appropriate.

mod cache;
mod events;
mod planner;
mod sources;

pub use cache::FileCacheConfig;
pub use events::{EventSinkKind, FileEventsConfig};
pub use planner::FilePlannerConfig;
pub use sources::{FileCatalogConfig, FileLoggingConfig};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use toolgraph_application::PlannerConfig;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroLimit(&'static str),

    #[error("{0} cannot be 0")]
    ZeroTtl(&'static str),

    #[error("events.sink = \"jsonl\" requires events.jsonl_path")]
    MissingJsonlPath,

    #[error("events.graph_topic cannot be empty")]
    EmptyTopic,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Planner limits
    pub planner: FilePlannerConfig,
    /// Graph and plan cache settings
    pub cache: FileCacheConfig,
    /// Graph update event sink
    pub events: FileEventsConfig,
    /// Tool catalog source
    pub catalog: FileCatalogConfig,
    /// Log file
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Reject settings that would make the planner unusable.
    ///
    /// Zero limits would fail every plan; zero TTLs would disable caching
    /// in a way that is almost certainly a typo.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.planner.max_closure_size == 0 {
            return Err(ConfigValidationError::ZeroLimit("planner.max_closure_size"));
        }
        if self.planner.max_cycles == 0 {
            return Err(ConfigValidationError::ZeroLimit("planner.max_cycles"));
        }
        if self.cache.max_plan_entries == 0 {
            return Err(ConfigValidationError::ZeroLimit("cache.max_plan_entries"));
        }
        if self.cache.graph_ttl_seconds == 0 {
            return Err(ConfigValidationError::ZeroTtl("cache.graph_ttl_seconds"));
        }
        if self.cache.plan_ttl_seconds == 0 {
            return Err(ConfigValidationError::ZeroTtl("cache.plan_ttl_seconds"));
        }
        if self.events.sink == EventSinkKind::Jsonl && self.events.jsonl_path.is_none() {
            return Err(ConfigValidationError::MissingJsonlPath);
        }
        if self.events.graph_topic.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTopic);
        }
        Ok(())
    }

    /// The typed projection consumed by the use cases
    pub fn to_planner_config(&self) -> PlannerConfig {
        PlannerConfig::default()
            .with_max_closure_size(self.planner.max_closure_size)
            .with_max_cycles(self.planner.max_cycles)
            .with_sort(self.planner.default_sort)
            .with_graph_ttl(Duration::from_secs(self.cache.graph_ttl_seconds))
            .with_plan_ttl(Duration::from_secs(self.cache.plan_ttl_seconds))
            .with_graph_topic(self.events.graph_topic.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgraph_application::SortStrategy;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[planner]
max_closure_size = 200
max_cycles = 10
default_sort = "kahn"

[cache]
graph_ttl_seconds = 30
plan_ttl_seconds = 5

[events]
sink = "none"
graph_topic = "graphs"

[catalog]
path = "tools.toml"

[logging]
file = "/tmp/toolgraph.log"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.planner.max_closure_size, 200);
        assert_eq!(config.planner.default_sort, SortStrategy::Kahn);
        assert_eq!(config.cache.plan_ttl_seconds, 5);
        assert_eq!(config.cache.max_plan_entries, 1_024);
        assert_eq!(config.events.sink, EventSinkKind::None);
        assert_eq!(config.catalog.path.as_deref(), Some("tools.toml"));
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/toolgraph.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[planner]\nmax_cycles = 3\n").unwrap();
        assert_eq!(config.planner.max_cycles, 3);
        // Defaults should apply
        assert_eq!(config.planner.max_closure_size, 10_000);
        assert_eq!(config.events.sink, EventSinkKind::Log);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = FileConfig::default();
        config.planner.max_closure_size = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroLimit("planner.max_closure_size"))
        );

        let mut config = FileConfig::default();
        config.cache.plan_ttl_seconds = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroTtl("cache.plan_ttl_seconds"))
        );
    }

    #[test]
    fn test_validate_jsonl_needs_path() {
        let mut config = FileConfig::default();
        config.events.sink = EventSinkKind::Jsonl;
        assert_eq!(config.validate(), Err(ConfigValidationError::MissingJsonlPath));

        config.events.jsonl_path = Some("events.jsonl".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_planner_config() {
        let mut config = FileConfig::default();
        config.planner.default_sort = SortStrategy::Kahn;
        config.cache.graph_ttl_seconds = 7;

        let planner = config.to_planner_config();
        assert_eq!(planner.sort, SortStrategy::Kahn);
        assert_eq!(planner.graph_ttl, Duration::from_secs(7));
        assert_eq!(planner.graph_topic, "tool-graph-updates");
    }
}
