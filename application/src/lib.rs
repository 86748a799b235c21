//! Application layer for toolgraph
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PlannerConfig, SortStrategy};
pub use ports::{
    cache::{CachePort, GRAPH_NAMESPACE, NoCache, PLAN_NAMESPACE},
    event_publisher::{EventPublisher, NoEventPublisher, PublishError},
    tool_repository::{RepositoryError, ToolRepository},
};
pub use use_cases::dependency_analysis::DependencyAnalysisService;
pub use use_cases::dependency_graph::DependencyGraphService;
pub use use_cases::dependency_validator::DependencyValidator;
pub use use_cases::execution_plan::{ExecutionPlanGenerator, ProvidedParameters};
pub use use_cases::graph_notifier::GraphUpdateNotifier;
pub use use_cases::plan_request::{PlanFailure, PlanRequest, PlanRequestHandler, PlanResponse};
pub use use_cases::tool_catalog::ToolCatalogService;
