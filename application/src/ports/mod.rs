//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod cache;
pub mod event_publisher;
pub mod tool_repository;
