// src/search.rs
//! Client-facing search over the aggregated article list. Deterministic and
//! side-effect-free; recomputed from the full list on every query, which is
//! fine at feed-sized inputs.

use crate::article::Article;

/// Keep articles whose title or summary contains `query` as a
/// case-insensitive substring. A blank or whitespace-only query returns the
/// full list unchanged, in its original order.
pub fn filter_articles(articles: &[Article], query: &str) -> Vec<Article> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return articles.to_vec();
    }
    articles
        .iter()
        .filter(|a| a.title.to_lowercase().contains(&q) || a.summary.to_lowercase().contains(&q))
        .cloned()
        .collect()
}
