//! Record sources backing the feed query engine.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::repos::{FeedsRepo, RepoError};
use crate::domain::entities::FeedRecord;

/// Reads the feed list from a JSON array on disk.
#[derive(Debug, Clone)]
pub struct FeedFileRepository {
    path: PathBuf,
}

impl FeedFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FeedsRepo for FeedFileRepository {
    async fn load_feeds(&self) -> Result<Vec<FeedRecord>, RepoError> {
        let location = self.path.display().to_string();
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| RepoError::Io {
                location: location.clone(),
                source,
            })?;

        debug!(
            target = "feedsearch::infra::source",
            location = %location,
            bytes = bytes.len(),
            "Read feed source"
        );

        serde_json::from_slice(&bytes).map_err(|source| RepoError::Decode { location, source })
    }
}

/// Serves a fixed in-memory feed list.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedsRepo {
    feeds: Vec<FeedRecord>,
}

impl StaticFeedsRepo {
    pub fn new(feeds: Vec<FeedRecord>) -> Self {
        Self { feeds }
    }
}

#[async_trait]
impl FeedsRepo for StaticFeedsRepo {
    async fn load_feeds(&self) -> Result<Vec<FeedRecord>, RepoError> {
        Ok(self.feeds.clone())
    }
}
