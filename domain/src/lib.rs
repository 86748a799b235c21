//! Domain layer for toolgraph
//!
//! This crate contains the dependency graph algorithms, tool entities and
//! execution-plan value objects. It has no dependencies on infrastructure
//! or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Dependency graph
//!
//! Tools and their declared dependencies form a [`ToolGraph`]: an edge runs
//! from a dependency tool to the tool that depends on it. The generic
//! [`DirectedGraph`] supplies ordering, closure, component and cycle queries.
//!
//! ## Execution plan
//!
//! For a requested set of tools the planner computes the dependency closure,
//! a topological execution order, still-missing parameters, parameter flows
//! between tools and parallel execution groups ([`ExecutionPlan`]).

pub mod core;
pub mod graph;
pub mod plan;
pub mod tool;

/// The dependency graph instantiated over tool identifiers
pub type ToolGraph = graph::DirectedGraph<tool::ToolId>;

// Re-export commonly used types
pub use core::error::{DomainError, ErrorKind, MappingSide};
pub use graph::{DirectedGraph, GraphError, ShortestPaths, WeightedEdge};
pub use plan::{ExecutionPlan, ParameterFlow, ParameterRequirement};
pub use tool::{
    DependencyType, GraphSnapshot, GraphUpdateEvent, ParameterMapping, ParameterSource,
    SnapshotEdge, Tool, ToolDependency, ToolId, ToolParameter,
};
