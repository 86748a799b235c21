//! Use cases (application services)

pub mod dependency_analysis;
pub mod dependency_graph;
pub mod dependency_validator;
pub mod execution_plan;
pub mod graph_notifier;
pub mod plan_request;
pub mod tool_catalog;

#[cfg(test)]
pub(crate) mod test_support;
