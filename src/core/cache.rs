//! Model caching utilities for loading each classifier once per process.
//!
//! Loading a ModernBERT checkpoint means downloading weights and mapping them
//! into memory, so pipelines built with the same options and device share one
//! model instance for the lifetime of the process.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

/// Trait implemented by model option types to generate a stable cache key.
pub trait ModelOptions {
    fn cache_key(&self) -> String;
}

type CacheStorage = HashMap<(TypeId, String), Arc<dyn Any + Send + Sync>>;

/// A process-wide store of loaded models.
///
/// Models are keyed by their concrete type and a string key (typically the
/// model size plus device location). Requests for a cached key return clones
/// that share the underlying weights.
pub struct ModelCache {
    cache: Mutex<CacheStorage>,
}

impl ModelCache {
    /// Create a new empty model cache.
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create a model from the cache.
    ///
    /// The lock is held while `loader` runs, so concurrent callers never build
    /// the same model twice. `loader` must not call back into the cache.
    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> anyhow::Result<M>
    where
        M: Clone + Send + Sync + 'static,
        F: FnOnce() -> anyhow::Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(model) = cache
            .get(&cache_key)
            .and_then(|cached| cached.downcast_ref::<M>())
        {
            tracing::debug!(key, "model cache hit");
            return Ok(model.clone());
        }

        tracing::info!(key, "loading model");
        let model = loader()?;
        cache.insert(cache_key, Arc::new(model.clone()) as Arc<dyn Any + Send + Sync>);

        Ok(model)
    }

    /// Clear all cached models.
    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Get the number of cached models.
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: Lazy<ModelCache> = Lazy::new(ModelCache::new);

/// Get a reference to the global model cache.
pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}
