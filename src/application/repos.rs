//! Repository traits describing record sources.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::FeedRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("failed to read feed source `{location}`: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("feed source `{location}` is not a valid feed list: {source}")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("feed source unavailable: {0}")]
    Unavailable(String),
}

impl RepoError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Supplies the complete, ordered record set. Called once per engine.
#[async_trait]
pub trait FeedsRepo: Send + Sync {
    async fn load_feeds(&self) -> Result<Vec<FeedRecord>, RepoError>;
}
