use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::feed::{FeedPage, FeedQuery, FeedSort};
use crate::application::pagination::{DEFAULT_CURRENT_PAGE, PageRequest};
use crate::domain::entities::FeedRecord;
use crate::domain::types::{SortColumn, SortDirection};

/// Raw `/api/feed` query string. Every field stays textual so malformed values can be reported.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedListQuery {
    pub search_term: Option<String>,
    pub should_sort: Option<String>,
    pub sort_column_name: Option<String>,
    pub sort_ascending: Option<String>,
    pub page_size: Option<String>,
    pub current_page: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedQueryError {
    #[error("shouldSort=true requires both sortColumnName and sortAscending")]
    SortParametersMissing,
    #[error("unknown sort column `{0}`")]
    SortColumn(String),
    #[error("sortAscending must be `true` or `false`, got `{0}`")]
    SortAscending(String),
    #[error("{field} must be a positive integer, got `{value}`")]
    Paging { field: &'static str, value: String },
}

impl FeedListQuery {
    /// Validate the raw parameters. Empty values count as absent.
    pub fn into_feed_query(
        self,
        default_page_size: NonZeroUsize,
    ) -> Result<FeedQuery, FeedQueryError> {
        let sort = if present(&self.should_sort) == Some("true") {
            let (Some(column), Some(ascending)) = (
                present(&self.sort_column_name),
                present(&self.sort_ascending),
            ) else {
                return Err(FeedQueryError::SortParametersMissing);
            };
            Some(FeedSort {
                column: column
                    .parse::<SortColumn>()
                    .map_err(|()| FeedQueryError::SortColumn(column.to_string()))?,
                direction: parse_direction(ascending)?,
            })
        } else {
            None
        };

        let page_size = parse_positive("pageSize", present(&self.page_size))?
            .unwrap_or(default_page_size);
        let current_page = parse_positive("currentPage", present(&self.current_page))?
            .unwrap_or(DEFAULT_CURRENT_PAGE);

        Ok(FeedQuery {
            search_term: self.search_term.unwrap_or_default(),
            sort,
            page: PageRequest::new(current_page, page_size),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn parse_direction(value: &str) -> Result<SortDirection, FeedQueryError> {
    match value {
        "true" => Ok(SortDirection::Ascending),
        "false" => Ok(SortDirection::Descending),
        other => Err(FeedQueryError::SortAscending(other.to_string())),
    }
}

fn parse_positive(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NonZeroUsize>, FeedQueryError> {
    value
        .map(|raw| {
            raw.parse::<NonZeroUsize>()
                .map_err(|_| FeedQueryError::Paging {
                    field,
                    value: raw.to_string(),
                })
        })
        .transpose()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedListResponse {
    pub total_size: usize,
    pub result_size: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub feeds: Vec<FeedRecord>,
}

impl From<FeedPage> for FeedListResponse {
    fn from(page: FeedPage) -> Self {
        Self {
            total_size: page.total_size,
            result_size: page.result_size,
            current_page: page.current_page,
            page_size: page.page_size,
            feeds: page.feeds,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
