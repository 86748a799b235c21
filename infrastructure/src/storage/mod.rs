//! Tool storage adapters

mod catalog;
mod in_memory;

pub use catalog::{CatalogError, ToolCatalogFile};
pub use in_memory::InMemoryToolRepository;
