//! Tool domain module
//!
//! A **tool** is a registered, independently invocable capability with named
//! parameters. Tools declare **dependencies** on other tools; each dependency
//! is `REQUIRED` or `OPTIONAL` and may carry **parameter mappings** that feed
//! an output of the dependency tool into an input of the dependent tool.
//!
//! ```text
//! ┌──────────────┐  REQUIRED, lat→latitude   ┌──────────────┐
//! │ geocode      │──────────────────────────▶│ forecast     │
//! │ out: lat,lon │                           │ in: latitude │
//! └──────────────┘                           └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Tool`]: registry entry with parameters and dependencies
//! - [`ToolParameter`]: named input with required flag, default and source
//! - [`ToolDependency`]: directed "cannot run before" relationship
//! - [`ParameterMapping`]: output → input binding along a dependency
//! - [`GraphUpdateEvent`]: structural snapshot emitted after mutations
//!
//! # Invariants
//!
//! - Parameter names are unique within a tool
//!   ([`Tool::validate_parameter_names`]).
//! - Dependency edges form a DAG; enforced at write time by the
//!   application layer's dependency validator.

pub mod entities;
pub mod events;
pub mod value_objects;

pub use entities::{Tool, ToolDependency, ToolId, ToolParameter};
pub use events::{GraphSnapshot, GraphUpdateEvent, SnapshotEdge};
pub use value_objects::{DependencyType, ParameterMapping, ParameterSource};
