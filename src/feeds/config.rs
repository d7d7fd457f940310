// src/feeds/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::article::Source;

const ENV_PATH: &str = "FEEDS_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/feeds.toml";

/// One configured upstream feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEndpoint {
    pub source: Source,
    pub url: String,
}

/// The three feeds the hub ships with, used when no config file is present.
pub fn default_endpoints() -> Vec<FeedEndpoint> {
    const DEFAULTS: [(Source, &str); 3] = [
        (
            Source::McKinsey,
            "https://api.rss2json.com/v1/api.json?rss_url=https%3A%2F%2Fwww.mckinsey.com%2Finsights%2Frss",
        ),
        (
            Source::Bcg,
            "https://api.rss2json.com/v1/api.json?rss_url=https%3A%2F%2Fwww.bcg.com%2Ffeatured-insights%2Frss",
        ),
        (
            Source::Bain,
            "https://api.rss2json.com/v1/api.json?rss_url=https%3A%2F%2Fwww.bain.com%2Finsights%2Ffeed.rss",
        ),
    ];
    DEFAULTS
        .iter()
        .map(|(source, url)| FeedEndpoint {
            source: *source,
            url: (*url).to_string(),
        })
        .collect()
}

/// Load feed endpoints from an explicit TOML path.
pub fn load_endpoints_from(path: &Path) -> Result<Vec<FeedEndpoint>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed config from {}", path.display()))?;
    parse_endpoints(&content)
}

/// Load feed endpoints using env var + fallbacks:
/// 1) $FEEDS_CONFIG_PATH
/// 2) config/feeds.toml
/// 3) built-in defaults
pub fn load_endpoints_default() -> Result<Vec<FeedEndpoint>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_endpoints_from(&pb);
        } else {
            return Err(anyhow!("FEEDS_CONFIG_PATH points to non-existent path"));
        }
    }
    let default_p = PathBuf::from(DEFAULT_PATH);
    if default_p.exists() {
        return load_endpoints_from(&default_p);
    }
    Ok(default_endpoints())
}

fn parse_endpoints(s: &str) -> Result<Vec<FeedEndpoint>> {
    #[derive(serde::Deserialize)]
    struct FeedsFile {
        feeds: Vec<RawEndpoint>,
    }
    #[derive(serde::Deserialize)]
    struct RawEndpoint {
        source: String,
        url: String,
    }

    let file: FeedsFile = toml::from_str(s).context("parsing feed config toml")?;
    let mut out = Vec::with_capacity(file.feeds.len());
    for raw in file.feeds {
        let url = raw.url.trim().to_string();
        if url.is_empty() {
            return Err(anyhow!("feed entry for '{}' has an empty url", raw.source));
        }
        out.push(FeedEndpoint {
            source: raw.source.parse()?,
            url,
        });
    }
    if out.is_empty() {
        return Err(anyhow!("feed config contains no feeds"));
    }
    Ok(out)
}
