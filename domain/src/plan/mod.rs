//! Execution plans
//!
//! An [`ExecutionPlan`] is what the planner returns for a set of requested
//! tools: the dependency closure in safe order, what the caller still has to
//! provide ([`ParameterRequirement`]), how values flow between tools at
//! execution time ([`ParameterFlow`]), and which tools may run side by side.

pub mod execution_plan;

pub use execution_plan::{ExecutionPlan, ParameterFlow, ParameterRequirement};
