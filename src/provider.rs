//! Where snippets come from.
//!
//! The pipeline only sees the [`SnippetProvider`] trait. Search APIs,
//! caches and test fixtures all live behind it.

use std::fmt;

use dashmap::DashMap;
use tracing::debug;

use crate::fact::Snippet;

/// Answers one search query with up to `limit` snippets.
pub trait SnippetProvider {
    type Error: fmt::Display;

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>, Self::Error>;
}

impl<F, E> SnippetProvider for F
where
    F: Fn(&str, usize) -> Result<Vec<Snippet>, E>,
    E: fmt::Display,
{
    type Error = E;

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>, E> {
        self(query, limit)
    }
}

/// Memoises successful searches of an inner provider by `(query, limit)`.
/// Failures are passed through and not cached.
pub struct CachedProvider<P> {
    inner: P,
    entries: DashMap<(String, usize), Vec<Snippet>>,
    max_entries: usize,
}

impl<P: SnippetProvider> CachedProvider<P> {
    pub fn new(inner: P, max_entries: usize) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    fn store(&self, key: (String, usize), snippets: Vec<Snippet>) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self
                .entries
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.entries.remove(&key);
            }
        }
        self.entries.insert(key, snippets);
    }
}

impl<P: SnippetProvider> SnippetProvider for CachedProvider<P> {
    type Error = P::Error;

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>, P::Error> {
        let key = (query.to_string(), limit);
        if let Some(hit) = self.entries.get(&key) {
            debug!(query, "snippet cache hit");
            return Ok(hit.value().clone());
        }
        let snippets = self.inner.search(query, limit)?;
        self.store(key, snippets.clone());
        Ok(snippets)
    }
}
