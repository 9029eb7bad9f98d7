//! Cache configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_MAX_UPDATE_WAIT_SECS: u64 = 60;
const DEFAULT_OLD_FEEDS_ACCESS_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Age after which a cached filter result is recomputed.
    pub max_update_wait_seconds: u64,
    /// Idle time after which an entry is swept regardless of freshness.
    pub old_feeds_access_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_update_wait_seconds: DEFAULT_MAX_UPDATE_WAIT_SECS,
            old_feeds_access_seconds: DEFAULT_OLD_FEEDS_ACCESS_SECS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            max_update_wait_seconds: settings.max_update_wait_seconds.get(),
            old_feeds_access_seconds: settings.old_feeds_access_seconds.get(),
        }
    }
}

impl CacheConfig {
    pub fn max_update_wait(&self) -> Duration {
        Duration::from_secs(self.max_update_wait_seconds)
    }

    pub fn idle_eviction(&self) -> Duration {
        Duration::from_secs(self.old_feeds_access_seconds)
    }
}
