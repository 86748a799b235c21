//! Infrastructure layer for toolgraph
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: tool storage, caching, event publishing,
//! and configuration file loading.

pub mod cache;
pub mod config;
pub mod events;
pub mod storage;

// Re-export commonly used types
pub use cache::InMemoryTtlCache;
pub use config::{
    ConfigLoader, ConfigValidationError, EventSinkKind, FileCacheConfig, FileCatalogConfig,
    FileConfig, FileEventsConfig, FileLoggingConfig, FilePlannerConfig,
};
pub use events::{ChannelEventPublisher, JsonlEventPublisher, LogEventPublisher, PublishedEvent};
pub use storage::{CatalogError, InMemoryToolRepository, ToolCatalogFile};
