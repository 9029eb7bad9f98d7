pub mod error;
pub mod handlers;
pub mod models;

use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::application::feed::FeedService;
use crate::infra::http::middleware::{log_failures, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub feeds: Arc<FeedService>,
    pub default_page_size: NonZeroUsize,
}

pub fn build_router(state: HttpState) -> Router {
    let log_state = state.clone();

    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/api/ping", get(handlers::ping))
        .route("/api/feed", get(handlers::list_feeds))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            log_state,
            log_failures,
        ))
        .layer(axum_middleware::from_fn(set_request_context))
}
