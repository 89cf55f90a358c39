//! Search result cache.
//!
//! Keyed by the exact `artist|title` pair the caller searched for. The
//! cache is owned by its orchestrator; nothing is shared process-wide.

use std::collections::{HashMap, VecDeque};

use discern_core::ScoredResult;

/// In-memory cache of filtered search results.
///
/// With a capacity set, the oldest inserted key is evicted first.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, Vec<ScoredResult>>,
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl ResultCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` keys. Zero means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: (capacity > 0).then_some(capacity),
            ..Self::default()
        }
    }

    /// Cache key for a search. Not normalized: `"Led Zep"` and
    /// `"led zeppelin"` are different keys.
    pub fn key(artist: &str, title: &str) -> String {
        format!("{artist}|{title}")
    }

    pub fn get(&self, key: &str) -> Option<&Vec<ScoredResult>> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, results: Vec<ScoredResult>) {
        if self.entries.insert(key.clone(), results).is_some() {
            return;
        }
        self.order.push_back(key);

        if let Some(capacity) = self.capacity {
            while self.order.len() > capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
