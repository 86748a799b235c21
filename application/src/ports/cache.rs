//! Cache port
//!
//! A namespaced key/value cache with per-entry TTL. The graph builder and
//! the plan generator each own one namespace and clear it wholesale on any
//! structural change.

use std::time::Duration;

/// Namespace holding built dependency graphs, keyed by mode
pub const GRAPH_NAMESPACE: &str = "dependency-graph";

/// Namespace holding execution plans, keyed by request hash
pub const PLAN_NAMESPACE: &str = "execution-plan";

/// Shared cache used by the use cases
///
/// Implementations must allow concurrent readers; `invalidate_all` must be
/// atomic with respect to readers of the same namespace.
pub trait CachePort<V>: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Option<V>;

    fn put(&self, namespace: &str, key: &str, value: V, ttl: Duration);

    /// Drop every entry in `namespace`
    fn invalidate_all(&self, namespace: &str);
}

/// Cache that never holds anything
pub struct NoCache;

impl<V> CachePort<V> for NoCache {
    fn get(&self, _namespace: &str, _key: &str) -> Option<V> {
        None
    }

    fn put(&self, _namespace: &str, _key: &str, _value: V, _ttl: Duration) {}

    fn invalidate_all(&self, _namespace: &str) {}
}
