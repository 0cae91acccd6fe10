use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;

/// Builds the normalized memoization key for a query: each part is trimmed,
/// case-folded, and the parts are joined with a stable separator.
pub fn cache_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
}

/// Session-scoped memoization of computed analysis values. No TTL and no
/// size bound; entries live until the process exits. Concurrent duplicate
/// computation for the same key is tolerated, last write wins.
pub struct ResultCache<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T: Clone> ResultCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let hit = self.entries.lock().get(key).cloned();
        trace!(key, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn put(&self, key: String, value: T) {
        self.entries.lock().insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<T: Clone> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_key_parts() {
        assert_eq!(cache_key(&["  Coffee Shop ", "BOSTON"]), "coffee shop|boston");
        assert_eq!(
            cache_key(&["Barber", "Somerville", "Davis Square"]),
            "barber|somerville|davis square"
        );
        assert_eq!(
            cache_key(&["coffee shop", "boston"]),
            cache_key(&["Coffee Shop  ", "  Boston"])
        );
    }

    #[test]
    fn stores_and_returns_clones() {
        let cache = ResultCache::new();
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());

        cache.put("k".into(), vec![1, 2, 3]);
        assert_eq!(cache.get("k"), Some(vec![1, 2, 3]));
        assert_eq!(cache.len(), 1);

        cache.put("k".into(), vec![4]);
        assert_eq!(cache.get("k"), Some(vec![4]));
        assert_eq!(cache.len(), 1);
    }
}
