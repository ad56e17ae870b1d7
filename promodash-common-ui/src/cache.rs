use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::debug;

/// Read cache keyed by query key (`path?query`). Entries live until a
/// mutation under the same path prefix invalidates them.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.lock().insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Drops every entry whose key starts with `prefix`; returns how many went.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!("invalidated {} cached read(s) under '{}'", dropped, prefix);
        }
        dropped
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefix_invalidation_only_touches_matching_keys() {
        let cache = QueryCache::new();
        cache.put("campaigns/?page=1&page_size=10", json!({"count": 0}));
        cache.put("campaigns/4/rewards/", json!([]));
        cache.put("countries/?page=1&page_size=10", json!({"count": 0}));

        assert_eq!(cache.invalidate_prefix("campaigns/4/rewards/"), 1);
        assert!(cache.contains("campaigns/?page=1&page_size=10"));
        assert_eq!(cache.invalidate_prefix("campaigns/"), 1);
        assert_eq!(cache.len(), 1);
    }
}
