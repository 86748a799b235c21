//! Cache adapters

mod ttl_cache;

pub use ttl_cache::InMemoryTtlCache;
