//! Thread stores.
//!
//! A [`ThreadStore`] owns the ordered, append-only exchange history for
//! each [`ThreadId`]. The pipeline reads history to replay prior exchanges
//! into later prompts and appends the finished exchange after a successful
//! call; appends for one identifier are serialized by the store so
//! chronological order holds even under concurrent calls.

use std::collections::HashMap;

use parking_lot::Mutex;
use typecast_ai_core::thread::{Exchange, ThreadId};

/// Owner of per-thread exchange history.
pub trait ThreadStore: Send + Sync {
    /// All exchanges for `id`, oldest first. Empty for an unknown id.
    fn history(&self, id: &ThreadId) -> Vec<Exchange>;

    /// Append an exchange to `id`'s history.
    fn append(&self, id: &ThreadId, exchange: Exchange);
}

/// In-memory thread store.
///
/// One lock guards the whole map, which trivially serializes appends per
/// identifier. Persistence is deliberately out of scope; this type is the
/// reference implementation of the seam.
#[derive(Debug, Default)]
pub struct InMemoryThreadStore {
    threads: Mutex<HashMap<ThreadId, Vec<Exchange>>>,
}

impl InMemoryThreadStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of exchanges recorded for `id`.
    #[must_use]
    pub fn len(&self, id: &ThreadId) -> usize {
        self.threads.lock().get(id).map_or(0, Vec::len)
    }

    /// Whether `id` has no recorded exchanges.
    #[must_use]
    pub fn is_empty(&self, id: &ThreadId) -> bool {
        self.len(id) == 0
    }

    /// Drop all history for `id`.
    pub fn clear(&self, id: &ThreadId) {
        self.threads.lock().remove(id);
    }
}

impl ThreadStore for InMemoryThreadStore {
    fn history(&self, id: &ThreadId) -> Vec<Exchange> {
        self.threads.lock().get(id).cloned().unwrap_or_default()
    }

    fn append(&self, id: &ThreadId, exchange: Exchange) {
        self.threads.lock().entry(id.clone()).or_default().push(exchange);
    }
}
