//! Compiled-template cache keyed by template identity.
//!
//! Each template id maps to an `Arc<CompiledTemplate>`. Updates never touch an
//! existing tree: a changed template is compiled into a fresh tree and the map
//! entry is swapped. Readers holding the old `Arc` keep rendering the old tree
//! to completion, and new readers see the new one.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CompiledTemplate, TemplateError, compile, fingerprint};

/// Concurrent cache of compiled templates.
///
/// Safe to share between threads (`Arc<TemplateCache>` or `&TemplateCache`);
/// all methods take `&self`.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: DashMap<String, Arc<CompiledTemplate>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl TemplateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached tree for `id`, if any.
    pub fn get(&self, id: &str) -> Option<Arc<CompiledTemplate>> {
        match self.entries.get(id) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Compile `raw` and replace whatever is cached under `id`.
    pub fn insert(&self, id: &str, raw: &str) -> Result<Arc<CompiledTemplate>, TemplateError> {
        let compiled = Arc::new(compile(raw)?);
        tracing::debug!(
            "Caching template '{}' ({} bytes, {})",
            id,
            raw.len(),
            compiled.fingerprint()
        );
        self.entries.insert(id.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Return the cached tree for `id` if it was compiled from exactly `raw`,
    /// otherwise compile `raw` and replace the entry.
    pub fn get_or_compile(
        &self,
        id: &str,
        raw: &str,
    ) -> Result<Arc<CompiledTemplate>, TemplateError> {
        let wanted = fingerprint(raw);
        if let Some(entry) = self.entries.get(id) {
            if entry.fingerprint() == wanted {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(entry.value()));
            }
            tracing::debug!("Template '{}' changed, recompiling", id);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        self.insert(id, raw)
    }

    /// Drop the cached tree for `id`. Returns whether an entry existed.
    pub fn invalidate(&self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            tracing::debug!("Invalidated cached template '{}'", id);
        }
        removed
    }

    /// Remove all entries and reset statistics.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cache statistics as `(hits, misses)`.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.stats();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}
