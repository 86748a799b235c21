//! Application configuration

pub mod planner_config;

pub use planner_config::{PlannerConfig, SortStrategy};
