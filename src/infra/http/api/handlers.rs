use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use super::HttpState;
use super::error::{ApiError, messages};
use super::models::{FeedListQuery, FeedListResponse, MessageBody};

pub async fn ping() -> Json<MessageBody> {
    Json(MessageBody::new("Pong!"))
}

pub async fn list_feeds(
    State(state): State<HttpState>,
    query: Result<Query<FeedListQuery>, QueryRejection>,
) -> Result<Json<FeedListResponse>, ApiError> {
    let Query(params) = query.map_err(|rejection| {
        ApiError::bad_request(messages::INVALID_QUERY, rejection.body_text())
    })?;

    let feed_query = params.into_feed_query(state.default_page_size)?;
    let page = state.feeds.execute(&feed_query).await?;

    Ok(Json(page.into()))
}
