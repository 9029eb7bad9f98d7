use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use metrics_util::debugging::DebuggingRecorder;

use feedsearch::application::feed::{FeedQuery, FeedService};
use feedsearch::cache::CacheConfig;
use feedsearch::domain::entities::FeedRecord;
use feedsearch::infra::source::StaticFeedsRepo;

fn feeds() -> Vec<FeedRecord> {
    ["alpha", "beta", "gamma"]
        .into_iter()
        .map(|name| FeedRecord {
            name: name.to_string(),
            image: format!("{name}.png"),
            description: format!("{name} description"),
            date_last_edited: "2020-01-01T00:00:00.000Z".to_string(),
        })
        .collect()
}

fn search(term: &str) -> FeedQuery {
    FeedQuery {
        search_term: term.to_string(),
        ..FeedQuery::default()
    }
}

#[tokio::test(start_paused = true)]
async fn query_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let service = FeedService::start(
        Arc::new(StaticFeedsRepo::new(feeds())),
        &CacheConfig::default(),
    );

    // miss, then hit
    service.execute(&search("alpha")).await.expect("miss");
    service.execute(&search("alpha")).await.expect("hit");

    // stale after the freshness window
    tokio::time::advance(Duration::from_secs(60)).await;
    service.execute(&search("alpha")).await.expect("stale");
    service.execute(&search("beta")).await.expect("second term");
    assert_eq!(service.cached_queries(), 2);

    // both entries idle past the eviction threshold
    tokio::time::advance(Duration::from_secs(120)).await;
    service.execute(&search("gamma")).await.expect("evicting query");
    assert_eq!(service.cached_queries(), 1);

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "feedsearch_query_cache_hit_total",
        "feedsearch_query_cache_miss_total",
        "feedsearch_query_cache_stale_total",
        "feedsearch_query_cache_evict_total",
        "feedsearch_query_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
