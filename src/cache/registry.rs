//! Cache registry - central management for all caches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{CacheConfig, TypedCache};

/// Hands out named [`TypedCache`]s and keeps one instance per name, so a
/// store and a test (or two store handles) observe the same entries.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

struct CacheEntry {
    cache: Box<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cache registered under `name`, creating it on first use.
    ///
    /// # Panics
    /// Panics if `name` is already registered with different key/value
    /// types - that is a wiring bug, not a runtime condition.
    pub fn get_or_create<K, V>(&self, name: &str, config: CacheConfig) -> TypedCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let expected = TypeId::of::<TypedCache<K, V>>();

        let mut caches = self.caches.write().unwrap();
        if let Some(existing) = caches.get(name) {
            if existing.type_id != expected {
                panic!(
                    "cache '{}' already exists with different types: expected {}, got {}",
                    name,
                    std::any::type_name::<TypedCache<K, V>>(),
                    existing.type_name
                );
            }
            return existing
                .cache
                .downcast_ref::<TypedCache<K, V>>()
                .unwrap()
                .clone();
        }

        debug!("creating cache: {}", name);
        let cache = TypedCache::new(name, config);
        caches.insert(
            name.to_string(),
            CacheEntry {
                cache: Box::new(cache.clone()),
                type_id: expected,
                type_name: std::any::type_name::<TypedCache<K, V>>(),
            },
        );

        cache
    }

    /// Number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.read().unwrap().is_empty()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let caches = self.caches.read().unwrap();
        f.debug_struct("CacheRegistry")
            .field("cache_count", &caches.len())
            .field("cache_names", &caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_returns_same_cache() {
        let registry = CacheRegistry::new();
        let a: TypedCache<String, u32> = registry.get_or_create("x", CacheConfig::default());
        a.insert("k".into(), 7);

        let b: TypedCache<String, u32> = registry.get_or_create("x", CacheConfig::default());
        assert_eq!(b.get(&"k".to_string()), Some(7));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "different types")]
    fn type_mismatch_panics() {
        let registry = CacheRegistry::new();
        let _: TypedCache<String, u32> = registry.get_or_create("x", CacheConfig::default());
        let _: TypedCache<String, String> = registry.get_or_create("x", CacheConfig::default());
    }
}
