// src/article.rs
//! Canonical article record plus the normalization applied to raw feed items:
//! HTML entity decoding, tag stripping, whitespace collapse, and publish-date
//! parsing across the formats the upstream feeds actually emit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::feeds::types::FeedItem;

/// Shown on cards when a feed item carries no usable text content.
pub const SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Summaries are card-sized; anything longer than this is cut.
const SUMMARY_MAX_CHARS: usize = 600;

/// The fixed set of publishers we aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    McKinsey,
    Bcg,
    Bain,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::McKinsey => "McKinsey",
            Source::Bcg => "BCG",
            Source::Bain => "Bain",
        }
    }
}

impl std::str::FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mckinsey" => Ok(Source::McKinsey),
            "bcg" => Ok(Source::Bcg),
            "bain" => Ok(Source::Bain),
            other => Err(anyhow::anyhow!("unknown feed source: {other}")),
        }
    }
}

/// One normalized, displayable news item. Immutable after construction; the
/// aggregate list is rebuilt wholesale on every fetch cycle, never patched.
///
/// `id` is stable only within its source feed; we do not deduplicate across
/// sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub source: Source,
    pub title: String,
    pub link: String,
    /// Unix seconds; 0 when the upstream date is missing or unparseable,
    /// which places the item last under the descending sort.
    pub published_at: u64,
    pub summary: String,
}

impl Article {
    /// Map one raw feed item into an `Article`. Total: missing fields fall
    /// back to defaults or the summary placeholder instead of erroring.
    pub fn from_item(item: FeedItem, source: Source) -> Self {
        let link = item.link.unwrap_or_default();
        let id = item.guid.unwrap_or_else(|| link.clone());
        let title = normalize_text(item.title.as_deref().unwrap_or_default());

        let raw_summary = item.description.or(item.content).unwrap_or_default();
        let mut summary = normalize_text(&raw_summary);
        if summary.is_empty() {
            summary = SUMMARY_PLACEHOLDER.to_string();
        }

        Article {
            id,
            source,
            title,
            link,
            published_at: item
                .pub_date
                .as_deref()
                .map(parse_published_to_unix)
                .unwrap_or(0),
            summary,
        }
    }
}

/// Normalize feed text: decode entities, strip tags, collapse whitespace,
/// trim, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap
    if out.chars().count() > SUMMARY_MAX_CHARS {
        out = out.chars().take(SUMMARY_MAX_CHARS).collect();
    }

    out
}

/// Parse a publish date to unix seconds. The three feeds disagree on format,
/// so we try RFC 3339, RFC 2822, then the bare `YYYY-MM-DD HH:MM:SS` shape
/// some JSON bridges emit. Anything else maps to 0.
pub fn parse_published_to_unix(ts: &str) -> u64 {
    let ts = ts.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        return u64::try_from(dt.timestamp()).unwrap_or(0);
    }

    if let Some(unix) = OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
    {
        return u64::try_from(unix).unwrap_or(0);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return u64::try_from(naive.and_utc().timestamp()).unwrap_or(0);
    }

    0
}
