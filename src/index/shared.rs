//! Atomic whole-index replacement for long-running callers.

use super::TemplateIndex;
use std::sync::{Arc, PoisonError, RwLock};

/// Holder for the current index.
///
/// Readers take an `Arc` snapshot and keep using it for the whole call, so a
/// concurrent [`SharedIndex::replace`] never exposes a partially built index.
#[derive(Debug)]
pub struct SharedIndex {
    current: RwLock<Arc<TemplateIndex>>,
}

impl SharedIndex {
    pub fn new(index: TemplateIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Returns the index currently in effect.
    pub fn snapshot(&self) -> Arc<TemplateIndex> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Swaps in a fully built index and returns the previous one.
    pub fn replace(&self, index: TemplateIndex) -> Arc<TemplateIndex> {
        let next = Arc::new(index);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
