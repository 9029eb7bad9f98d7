//! Request id tagging and failure logging for the feed API.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;
use crate::infra::http::api::HttpState;
use crate::infra::http::api::models::FeedListQuery;

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Logs 4xx at `warn` and 5xx at `error` with the feed parameters as sent, whether the
/// record set had loaded, and the attached [`ErrorReport`] chain.
pub async fn log_failures(
    State(state): State<HttpState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let elapsed_ms = start.elapsed().as_millis();
    let (source, chain) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = chain.first().map_or("no diagnostic available", String::as_str);
    let params = Query::<FeedListQuery>::try_from_uri(&uri)
        .map(|Query(params)| params)
        .unwrap_or_default();
    let param = |value: &Option<String>| value.clone().unwrap_or_default();
    let feeds_ready = state.feeds.is_ready();

    macro_rules! log_failure {
        ($level:ident, $message:literal) => {
            $level!(
                target = "feedsearch::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                search_term = param(&params.search_term),
                should_sort = param(&params.should_sort),
                sort_column = param(&params.sort_column_name),
                sort_ascending = param(&params.sort_ascending),
                page_size = param(&params.page_size),
                current_page = param(&params.current_page),
                feeds_ready,
                elapsed_ms,
                source,
                detail,
                chain = ?chain,
                request_id = %request_id,
                $message,
            )
        };
    }

    if status.is_server_error() {
        log_failure!(error, "request failed");
    } else {
        log_failure!(warn, "client request error");
    }

    response
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::num::NonZeroUsize;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::application::feed::FeedService;
    use crate::cache::CacheConfig;
    use crate::infra::http::build_router;
    use crate::infra::source::StaticFeedsRepo;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn router() -> Router {
        build_router(HttpState {
            feeds: Arc::new(FeedService::start(
                Arc::new(StaticFeedsRepo::new(Vec::new())),
                &CacheConfig::default(),
            )),
            default_page_size: NonZeroUsize::new(50).expect("page size"),
        })
    }

    async fn get(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
            .status()
    }

    fn capture() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejected_feed_query_logs_its_parameters() {
        let (logs, _guard) = capture();

        let status = get(router(), "/api/feed?searchTerm=lord&currentPage=wrong").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let text = logs.text();
        assert!(text.contains("client request error"), "{text}");
        assert!(text.contains("search_term=\"lord\""), "{text}");
        assert!(text.contains("current_page=\"wrong\""), "{text}");
        assert!(text.contains("feeds_ready="), "{text}");
        assert!(text.contains("status=400"), "{text}");
        assert!(!text.contains("query="), "{text}");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn successful_requests_are_not_logged() {
        let (logs, _guard) = capture();

        let status = get(router(), "/api/feed?searchTerm=lord").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!logs.text().contains("feedsearch::http::response"));
    }
}
