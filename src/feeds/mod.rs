// src/feeds/mod.rs
pub mod config;
pub mod providers;
pub mod types;

use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::article::Article;
use crate::feeds::types::FeedProvider;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_items_total", "Total items parsed from feeds.");
        describe_counter!(
            "feed_fetch_errors_total",
            "Feed fetch/parse errors (feed contributed zero articles)."
        );
        describe_histogram!("feed_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!(
            "feeds_last_aggregate_ts",
            "Unix ts when the aggregator last ran."
        );
    });
}

/// Fetch every configured feed once, concurrently, and merge the results.
///
/// All fetches are issued in parallel and we wait for every one to settle; a
/// failed feed contributes zero articles and logs a warning rather than
/// failing the aggregation. The merged list is sorted most-recent-first with
/// a stable sort, so ties and unparseable dates (0) keep input order, and an
/// empty result is a valid outcome, not an error.
pub async fn aggregate_once(providers: &[Box<dyn FeedProvider>]) -> Vec<Article> {
    ensure_metrics_described();

    let fetches = providers.iter().map(|p| async move {
        match p.fetch_latest().await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(error = ?e, feed = p.name(), "feed error, skipping");
                counter!("feed_fetch_errors_total").increment(1);
                Vec::new()
            }
        }
    });

    let mut merged: Vec<Article> = join_all(fetches).await.into_iter().flatten().collect();
    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let now = chrono::Utc::now().timestamp().max(0) as u64;
    gauge!("feeds_last_aggregate_ts").set(now as f64);

    merged
}
