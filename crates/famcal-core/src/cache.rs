use uuid::Uuid;

/// Cached data a mutation makes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Event(Uuid),
    Family(Uuid),
}

impl std::fmt::Display for CacheScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheScope::Event(id) => write!(f, "event:{}", id),
            CacheScope::Family(id) => write!(f, "family:{}", id),
        }
    }
}

/// Receives invalidations after a mutation has committed. Fire and forget:
/// implementations must not fail the caller.
pub trait CacheInvalidationNotifier: Send + Sync {
    fn invalidate(&self, scope: CacheScope);
}

/// Notifier for deployments without a cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl CacheInvalidationNotifier for NoopNotifier {
    fn invalidate(&self, _scope: CacheScope) {}
}
