use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use super::Schema;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// `true` when nothing is cached yet or the cached table is older than `ttl`.
pub fn needs_refresh(loaded_at: Option<Instant>, now: Instant, ttl: Duration) -> bool {
    match loaded_at {
        None => true,
        Some(at) => now.saturating_duration_since(at) > ttl,
    }
}

struct Cached {
    loaded_at: Instant,
    schema: Arc<Schema>,
}

/// Holds the most recently loaded schema. Keyed by load time only.
pub struct SchemaCache {
    ttl: Duration,
    slot: RwLock<Option<Cached>>,
}

impl SchemaCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached schema if still fresh at `now`.
    pub fn get(&self, now: Instant) -> Option<Arc<Schema>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|c| !needs_refresh(Some(c.loaded_at), now, self.ttl))
            .map(|c| c.schema.clone())
    }

    /// Returns the cached schema, or runs `load` and stores its result. `load`
    /// runs without holding the lock; two racing callers may both load, and the
    /// last one to finish wins.
    pub fn get_or_refresh(&self, now: Instant, load: impl FnOnce() -> Schema) -> Arc<Schema> {
        if let Some(schema) = self.get(now) {
            return schema;
        }
        let schema = Arc::new(load());
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Cached {
            loaded_at: now,
            schema: schema.clone(),
        });
        schema
    }

    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaLiteral, ValueSpec};
    use std::cell::Cell;

    fn one_prop(name: &str) -> Schema {
        [(name, ValueSpec::Enumerated(vec![SchemaLiteral::Str("x".into())]))]
            .into_iter()
            .collect()
    }

    #[test]
    fn refresh_policy() {
        let t0 = Instant::now();
        let ttl = Duration::from_secs(60);
        assert!(needs_refresh(None, t0, ttl));
        assert!(!needs_refresh(Some(t0), t0, ttl));
        assert!(!needs_refresh(Some(t0), t0 + ttl, ttl));
        assert!(needs_refresh(Some(t0), t0 + ttl + Duration::from_millis(1), ttl));
    }

    #[test]
    fn loads_once_within_window_then_replaces() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        let loads = Cell::new(0);
        let t0 = Instant::now();

        let first = cache.get_or_refresh(t0, || {
            loads.set(loads.get() + 1);
            one_prop("width")
        });
        let second = cache.get_or_refresh(t0 + Duration::from_secs(30), || {
            loads.set(loads.get() + 1);
            one_prop("height")
        });
        assert_eq!(loads.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));

        let third = cache.get_or_refresh(t0 + Duration::from_secs(61), || {
            loads.set(loads.get() + 1);
            one_prop("height")
        });
        assert_eq!(loads.get(), 2);
        assert!(third.is_known_property("height"));
        assert!(!third.is_known_property("width"));
        // The earlier handle still sees the table it was given.
        assert!(first.is_known_property("width"));
    }

    #[test]
    fn clear_forces_reload() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.get_or_refresh(t0, Schema::empty);
        assert!(cache.get(t0).is_some());
        cache.clear();
        assert!(cache.get(t0).is_none());
    }
}
