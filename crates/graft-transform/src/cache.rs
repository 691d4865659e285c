//! Synthesis deduplication cache
//!
//! Synthesis is deterministic in (target name, parent introspection), so
//! finished models are safe to share. The cache holds its lock across the
//! synthesis call, so two concurrent requests for the same class cannot
//! both build it; the loser of the race observes the winner's model.

use crate::driver::{Fingerprint, ParentClass, Synthesizer};
use crate::error::TransformResult;
use graft_model::ClassModel;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Cache of finished class models keyed by target name and parent
/// fingerprint.
#[derive(Default)]
pub struct ModelCache {
    models: Mutex<FxHashMap<(String, Fingerprint), Arc<ClassModel>>>,
}

impl ModelCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self {
            models: Mutex::new(FxHashMap::default()),
        }
    }

    /// Return the cached model for the key, synthesizing it on first use.
    ///
    /// Failures are not cached: synthesis is deterministic and cheap to
    /// repeat, and a later request with corrected introspection input gets
    /// a fresh key anyway.
    pub fn get_or_synthesize(
        &self,
        synthesizer: &Synthesizer,
        target: &str,
        parent: &ParentClass,
    ) -> TransformResult<Arc<ClassModel>> {
        let key = (target.to_string(), parent.fingerprint());
        let mut models = self.models.lock();
        if let Some(model) = models.get(&key) {
            return Ok(Arc::clone(model));
        }
        let model = Arc::new(synthesizer.synthesize(target, parent)?);
        models.insert(key, Arc::clone(&model));
        Ok(model)
    }

    /// Number of cached models.
    pub fn len(&self) -> usize {
        self.models.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.models.lock().is_empty()
    }

    /// Drop all cached models.
    pub fn clear(&self) {
        self.models.lock().clear();
    }
}
