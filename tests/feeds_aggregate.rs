// tests/feeds_aggregate.rs
//
// Aggregator behavior across mixed provider outcomes: failed feeds contribute
// nothing, the merge is sorted most-recent-first, and unparseable dates land
// at the tail.

use anyhow::Result;
use async_trait::async_trait;

use mbb_insights::article::{Article, Source, SUMMARY_PLACEHOLDER};
use mbb_insights::feeds;
use mbb_insights::feeds::providers::json_feed::JsonFeedProvider;
use mbb_insights::feeds::types::FeedProvider;

struct StaticProvider {
    source: Source,
    articles: Vec<Article>,
}

struct FailingProvider;

fn article(source: Source, id: &str, published_at: u64) -> Article {
    Article {
        id: id.to_string(),
        source,
        title: format!("title {id}"),
        link: format!("https://example.test/{id}"),
        published_at,
        summary: "s".to_string(),
    }
}

#[async_trait]
impl FeedProvider for StaticProvider {
    async fn fetch_latest(&self) -> Result<Vec<Article>> {
        Ok(self.articles.clone())
    }
    fn name(&self) -> &'static str {
        self.source.label()
    }
    fn source(&self) -> Source {
        self.source
    }
}

#[async_trait]
impl FeedProvider for FailingProvider {
    async fn fetch_latest(&self) -> Result<Vec<Article>> {
        anyhow::bail!("connection refused")
    }
    fn name(&self) -> &'static str {
        "Failing"
    }
    fn source(&self) -> Source {
        Source::McKinsey
    }
}

#[tokio::test]
async fn failed_feed_contributes_nothing_and_nothing_propagates() {
    let providers: Vec<Box<dyn FeedProvider>> = vec![
        Box::new(FailingProvider),
        Box::new(StaticProvider {
            source: Source::Bcg,
            articles: vec![article(Source::Bcg, "b1", 100)],
        }),
        Box::new(StaticProvider {
            source: Source::Bain,
            articles: vec![article(Source::Bain, "n1", 200)],
        }),
    ];

    let merged = feeds::aggregate_once(&providers).await;
    assert_eq!(merged.len(), 2);
    assert!(merged.iter().all(|a| a.source != Source::McKinsey));
}

#[tokio::test]
async fn merge_is_sorted_descending_by_publish_date() {
    let providers: Vec<Box<dyn FeedProvider>> = vec![
        Box::new(StaticProvider {
            source: Source::McKinsey,
            articles: vec![article(Source::McKinsey, "m1", 50), article(Source::McKinsey, "m2", 300)],
        }),
        Box::new(StaticProvider {
            source: Source::Bcg,
            articles: vec![article(Source::Bcg, "b1", 150)],
        }),
    ];

    let merged = feeds::aggregate_once(&providers).await;
    let ids: Vec<&str> = merged.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["m2", "b1", "m1"]);
}

#[tokio::test]
async fn unparseable_dates_sort_last_and_ties_keep_input_order() {
    let providers: Vec<Box<dyn FeedProvider>> = vec![Box::new(StaticProvider {
        source: Source::Bain,
        articles: vec![
            article(Source::Bain, "undated-a", 0),
            article(Source::Bain, "dated", 10),
            article(Source::Bain, "undated-b", 0),
        ],
    })];

    let merged = feeds::aggregate_once(&providers).await;
    let ids: Vec<&str> = merged.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["dated", "undated-a", "undated-b"]);
}

#[tokio::test]
async fn all_feeds_failing_is_a_valid_empty_result() {
    let providers: Vec<Box<dyn FeedProvider>> =
        vec![Box::new(FailingProvider), Box::new(FailingProvider)];
    let merged = feeds::aggregate_once(&providers).await;
    assert!(merged.is_empty());
}

#[tokio::test]
async fn fixture_feed_flows_through_the_aggregator() {
    let fixture = r#"{
        "items": [
            { "guid": "x1", "title": "AI at scale", "link": "https://e.test/1",
              "pubDate": "2025-06-01T08:00:00Z" },
            { "guid": "x2", "title": "Older piece", "link": "https://e.test/2",
              "pubDate": "2024-06-01T08:00:00Z", "description": "<p>Body</p>" }
        ]
    }"#;
    let providers: Vec<Box<dyn FeedProvider>> =
        vec![Box::new(JsonFeedProvider::from_fixture(Source::McKinsey, fixture))];

    let merged = feeds::aggregate_once(&providers).await;
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].id, "x1");
    assert_eq!(merged[0].summary, SUMMARY_PLACEHOLDER);
    assert_eq!(merged[1].summary, "Body");
}
