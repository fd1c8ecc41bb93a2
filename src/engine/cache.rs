//! Engine cache
//!
//! Analyzer engines are expensive to build (they load NLP models), so
//! engines are memoized by a key derived from their effective configuration.
//! The cache is an explicit object shared through `Arc` by every task built
//! from the same collector.

use super::AnalyzerEngine;
use crate::config::ModelSpec;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Key identifying an effective engine configuration
///
/// Composed as `<langs>/<engine>/<models>`: the sorted language set joined
/// with `-` (a single `-` when unrestricted), the NLP backend name, and the
/// sorted `lang:model` pairs joined with `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(languages: &BTreeSet<String>, engine_name: &str, models: &[ModelSpec]) -> Self {
        let key_l = if languages.is_empty() {
            "-".to_string()
        } else {
            languages.iter().cloned().collect::<Vec<_>>().join("-")
        };

        let mut key_m: Vec<String> = models
            .iter()
            .map(|m| {
                format!(
                    "{}:{}",
                    m.lang_code.as_deref().unwrap_or_default(),
                    m.model_label()
                )
            })
            .collect();
        key_m.sort();

        Self(format!("{key_l}/{engine_name}/{}", key_m.join("-")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Memoizes analyzer engines by [`CacheKey`]
///
/// No eviction and no capacity bound: the universe of configurations a
/// process sees is small and fixed.
#[derive(Default)]
pub struct EngineCache {
    engines: Mutex<HashMap<CacheKey, Arc<dyn AnalyzerEngine>>>,
}

impl EngineCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<dyn AnalyzerEngine>>> {
        // A panic while building an engine leaves the map itself consistent
        self.engines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the engine stored under `key`, building and storing it first
    /// if absent
    ///
    /// The lock is held while `build` runs, so concurrent callers asking for
    /// the same key get the same instance. A failed build stores nothing.
    pub fn get_or_build<F, E>(&self, key: &CacheKey, build: F) -> Result<Arc<dyn AnalyzerEngine>, E>
    where
        F: FnOnce() -> Result<Arc<dyn AnalyzerEngine>, E>,
    {
        let mut engines = self.lock();
        if let Some(engine) = engines.get(key) {
            return Ok(Arc::clone(engine));
        }
        let engine = build()?;
        engines.insert(key.clone(), Arc::clone(&engine));
        Ok(engine)
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<dyn AnalyzerEngine>> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every cached engine
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl fmt::Debug for EngineCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engines = self.lock();
        let mut keys: Vec<&str> = engines.keys().map(CacheKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("EngineCache").field("keys", &keys).finish()
    }
}
