use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::error::ErrorReport;
use crate::application::feed::FeedError;

use super::models::{FeedQueryError, MessageBody};

const SOURCE: &str = "infra::http::api";

pub mod messages {
    pub const SORT_PARAMETERS_MISSING: &str =
        "Sort parameters must be specified to use the sort function";
    pub const INVALID_SORT_COLUMN: &str = "Invalid value passed to sortColumnName";
    pub const INVALID_SORT_DIRECTION: &str = "Invalid value passed to sortAscending";
    pub const INVALID_PAGING: &str = "Invalid values passed to paging parameters";
    pub const INVALID_QUERY: &str = "Invalid query string";
    pub const INVALID_SEARCH_TERM: &str = "Search term could not be processed";
    pub const FEEDS_UNAVAILABLE: &str = "Feeds are currently unavailable";
    pub const SORT_UNAVAILABLE: &str = "Feeds could not be sorted";
}

/// Error response carrying a `{ message }` body and a diagnostic chain for the logs.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    diagnostics: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str, diagnostics: Vec<String>) -> Self {
        Self {
            status,
            message,
            diagnostics,
        }
    }

    pub fn bad_request(message: &'static str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, vec![detail.into()])
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl From<FeedQueryError> for ApiError {
    fn from(err: FeedQueryError) -> Self {
        let message = match &err {
            FeedQueryError::SortParametersMissing => messages::SORT_PARAMETERS_MISSING,
            FeedQueryError::SortColumn(_) => messages::INVALID_SORT_COLUMN,
            FeedQueryError::SortAscending(_) => messages::INVALID_SORT_DIRECTION,
            FeedQueryError::Paging { .. } => messages::INVALID_PAGING,
        };
        Self::bad_request(message, err.to_string())
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        let (status, message) = match &err {
            FeedError::Load(_) | FeedError::LoaderStopped => {
                (StatusCode::SERVICE_UNAVAILABLE, messages::FEEDS_UNAVAILABLE)
            }
            FeedError::Search(_) => (StatusCode::BAD_REQUEST, messages::INVALID_SEARCH_TERM),
            FeedError::Collation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, messages::SORT_UNAVAILABLE)
            }
        };
        let report = ErrorReport::from_error(SOURCE, status, &err);
        Self::new(status, message, report.messages)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = MessageBody::new(self.message);
        let mut response = (self.status, Json(body)).into_response();
        let report = if self.diagnostics.is_empty() {
            ErrorReport::from_message(SOURCE, self.status, self.message)
        } else {
            ErrorReport {
                source: SOURCE,
                status: self.status,
                messages: self.diagnostics,
            }
        };
        report.attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::repos::RepoError;

    #[test]
    fn load_failures_map_to_service_unavailable_with_chain() {
        let err = FeedError::Load(Arc::new(RepoError::unavailable("disk gone")));
        let api: ApiError = err.into();

        assert_eq!(api.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api.message(), messages::FEEDS_UNAVAILABLE);

        let response = api.into_response();
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.messages.len(), 2);
        assert!(report.messages[1].contains("disk gone"));
    }

    #[test]
    fn validation_errors_keep_their_message() {
        let api: ApiError = FeedQueryError::SortParametersMissing.into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.message(), messages::SORT_PARAMETERS_MISSING);
    }
}
