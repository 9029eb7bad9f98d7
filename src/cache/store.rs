//! Per-search-term storage of filtered result sets.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::time::Instant;
use tracing::debug;

use super::config::CacheConfig;

pub const CACHE_HIT_TOTAL: &str = "feedsearch_query_cache_hit_total";
pub const CACHE_MISS_TOTAL: &str = "feedsearch_query_cache_miss_total";
pub const CACHE_STALE_TOTAL: &str = "feedsearch_query_cache_stale_total";
pub const CACHE_EVICT_TOTAL: &str = "feedsearch_query_cache_evict_total";

/// Positions of matching records in the loaded record set, in load order.
pub type MatchSet = Arc<[usize]>;

struct CacheEntry {
    matches: MatchSet,
    updated_at: Instant,
    accessed_at: Instant,
}

/// Filter results keyed by the exact search term.
///
/// Not synchronized; the owner serializes sweep, lookup and store under one lock.
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
    max_update_wait: Duration,
    idle_eviction: Duration,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            max_update_wait: config.max_update_wait(),
            idle_eviction: config.idle_eviction(),
        }
    }

    /// Fresh result for `term`, refreshing its access time. Stale entries count as misses.
    pub fn get(&mut self, term: &str, now: Instant) -> Option<MatchSet> {
        let Some(entry) = self.entries.get_mut(term) else {
            counter!(CACHE_MISS_TOTAL).increment(1);
            return None;
        };

        if now.saturating_duration_since(entry.updated_at) >= self.max_update_wait {
            counter!(CACHE_STALE_TOTAL).increment(1);
            return None;
        }

        entry.accessed_at = now;
        counter!(CACHE_HIT_TOTAL).increment(1);
        Some(entry.matches.clone())
    }

    /// Store a freshly computed result, replacing any previous entry for `term`.
    pub fn put(&mut self, term: String, matches: MatchSet, now: Instant) {
        self.entries.insert(
            term,
            CacheEntry {
                matches,
                updated_at: now,
                accessed_at: now,
            },
        );
    }

    /// Remove every entry idle for at least the eviction threshold. Returns the number removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let idle: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.accessed_at) >= self.idle_eviction)
            .map(|(term, _)| term.clone())
            .collect();

        for term in &idle {
            self.entries.remove(term);
        }

        if !idle.is_empty() {
            counter!(CACHE_EVICT_TOTAL).increment(idle.len() as u64);
            debug!(
                target = "feedsearch::cache",
                evicted = idle.len(),
                remaining = self.entries.len(),
                "Swept idle query cache entries"
            );
        }

        idle.len()
    }

    /// Number of terms held, stale ones included.
    pub fn term_count(&self) -> usize {
        self.entries.len()
    }
}
