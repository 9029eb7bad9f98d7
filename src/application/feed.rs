//! Query engine over the loaded feed record set.
//!
//! The record set is loaded once in the background. Queries wait on a watch channel until
//! the load settles, then filter through the query cache, optionally sort, and slice a page.

use std::sync::{Arc, Mutex};

use metrics::histogram;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::application::collation::{CollationError, TextCollator};
use crate::application::pagination::PageRequest;
use crate::application::repos::{FeedsRepo, RepoError};
use crate::application::search::{SearchError, SearchMatcher};
use crate::cache::{CacheConfig, MatchSet, QueryCache, mutex_lock};
use crate::domain::entities::FeedRecord;
use crate::domain::types::{SortColumn, SortDirection};

pub const QUERY_DURATION_MS: &str = "feedsearch_query_ms";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed records failed to load")]
    Load(#[source] Arc<RepoError>),
    #[error("feed loader stopped before publishing records")]
    LoaderStopped,
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Collation(#[from] CollationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub search_term: String,
    pub sort: Option<FeedSort>,
    pub page: PageRequest,
}

/// One page of a query result. `total_size` counts every match before slicing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
    pub feeds: Vec<FeedRecord>,
    pub total_size: usize,
    pub result_size: usize,
    pub current_page: usize,
    pub page_size: usize,
}

#[derive(Debug)]
enum LoadState {
    Loading,
    Ready(Arc<[FeedRecord]>),
    Failed(Arc<RepoError>),
}

pub struct FeedService {
    state: watch::Receiver<LoadState>,
    cache: Mutex<QueryCache>,
}

impl FeedService {
    /// Spawn the one-shot record load and return immediately. Must run inside a tokio runtime.
    pub fn start(repo: Arc<dyn FeedsRepo>, cache: &CacheConfig) -> Self {
        let (tx, rx) = watch::channel(LoadState::Loading);

        tokio::spawn(async move {
            let state = match repo.load_feeds().await {
                Ok(records) => {
                    let irregular_dates = records
                        .iter()
                        .filter(|record| !record.has_rfc3339_timestamp())
                        .count();
                    if irregular_dates > 0 {
                        warn!(
                            target = "feedsearch::application::feed",
                            irregular_dates,
                            "Some dateLastEdited values are not RFC 3339; date sorting compares raw text"
                        );
                    }
                    info!(
                        target = "feedsearch::application::feed",
                        records = records.len(),
                        "Feed records loaded"
                    );
                    LoadState::Ready(records.into())
                }
                Err(err) => {
                    error!(
                        target = "feedsearch::application::feed",
                        error = %err,
                        "Feed records failed to load"
                    );
                    LoadState::Failed(Arc::new(err))
                }
            };
            tx.send_replace(state);
        });

        Self {
            state: rx,
            cache: Mutex::new(QueryCache::new(cache)),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), LoadState::Ready(_))
    }

    /// Number of search terms currently held by the query cache.
    pub fn cached_queries(&self) -> usize {
        mutex_lock(&self.cache, "application::feed", "cached_queries").term_count()
    }

    pub async fn execute(&self, query: &FeedQuery) -> Result<FeedPage, FeedError> {
        let records = self.records().await?;
        let started = std::time::Instant::now();

        let matches = self.resolve_matches(&records, &query.search_term)?;
        let mut ordered = matches.to_vec();
        if let Some(sort) = query.sort {
            sort_matches(&records, &mut ordered, sort)?;
        }

        let bounds = query.page.bounds(ordered.len());
        let feeds: Vec<FeedRecord> = ordered[bounds]
            .iter()
            .map(|&index| records[index].clone())
            .collect();

        histogram!(QUERY_DURATION_MS).record(started.elapsed().as_secs_f64() * 1000.0);

        Ok(FeedPage {
            total_size: ordered.len(),
            result_size: feeds.len(),
            current_page: query.page.current_page.get(),
            page_size: query.page.page_size.get(),
            feeds,
        })
    }

    async fn records(&self) -> Result<Arc<[FeedRecord]>, FeedError> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|state| !matches!(state, LoadState::Loading))
            .await
            .map_err(|_| FeedError::LoaderStopped)?;

        match &*settled {
            LoadState::Ready(records) => Ok(records.clone()),
            LoadState::Failed(err) => Err(FeedError::Load(err.clone())),
            LoadState::Loading => Err(FeedError::LoaderStopped),
        }
    }

    fn resolve_matches(&self, records: &[FeedRecord], term: &str) -> Result<MatchSet, FeedError> {
        let now = Instant::now();
        let mut cache = mutex_lock(&self.cache, "application::feed", "resolve_matches");
        cache.sweep(now);

        if let Some(matches) = cache.get(term, now) {
            return Ok(matches);
        }

        let matcher = SearchMatcher::compile(term)?;
        let matches: MatchSet = if matcher.is_unrestricted() {
            (0..records.len()).collect()
        } else {
            records
                .iter()
                .enumerate()
                .filter(|(_, record)| matcher.matches(record))
                .map(|(index, _)| index)
                .collect()
        };
        debug!(
            target = "feedsearch::application::feed",
            term,
            matched = matches.len(),
            "Computed search result"
        );

        cache.put(term.to_string(), matches.clone(), now);
        Ok(matches)
    }
}

/// Stable sort, so equal values keep load order in both directions.
fn sort_matches(
    records: &[FeedRecord],
    ordered: &mut [usize],
    sort: FeedSort,
) -> Result<(), CollationError> {
    let collator = TextCollator::new()?;
    let text = |index: &usize| records[*index].column(sort.column);
    match sort.direction {
        SortDirection::Ascending => {
            ordered.sort_by(|left, right| collator.compare(text(left), text(right)))
        }
        SortDirection::Descending => {
            ordered.sort_by(|left, right| collator.compare(text(right), text(left)))
        }
    }
    Ok(())
}
