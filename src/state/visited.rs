//! Run-scoped set of post ids that already produced (or are producing) a record

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Post ids claimed during the current run
///
/// Presence check and insertion happen under one lock, so two workers that
/// resolve different URLs to the same post id cannot both win.
#[derive(Debug, Default)]
pub struct VisitedPosts {
    ids: Mutex<HashSet<String>>,
}

impl VisitedPosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically marks a post id as taken
    ///
    /// Returns true if the caller now owns the id, false if it was already
    /// present.
    pub fn claim(&self, post_id: &str) -> bool {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        ids.insert(post_id.to_string())
    }

    /// Gives a claimed id back, e.g. when its record could not be written
    pub fn release(&self, post_id: &str) {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        ids.remove(post_id);
    }

    pub fn len(&self) -> usize {
        let ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
