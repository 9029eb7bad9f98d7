//! Query result cache.
//!
//! Memoizes the filtered record set per distinct search term. Entries are reused while
//! fresh and swept once they have sat idle for too long:
//!
//! ```toml
//! [cache]
//! max_update_wait_seconds = 60
//! old_feeds_access_seconds = 120
//! ```

mod config;
mod lock;
mod store;

pub use config::CacheConfig;
pub(crate) use lock::mutex_lock;
pub use store::{
    CACHE_EVICT_TOTAL, CACHE_HIT_TOTAL, CACHE_MISS_TOTAL, CACHE_STALE_TOTAL, MatchSet, QueryCache,
};
