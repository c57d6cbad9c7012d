//! Per-crawl robots.txt cache
//!
//! One robots.txt is fetched per origin (scheme, host and port) and kept for
//! the rest of the crawl.

use crate::crawler::Fetcher;
use crate::robots::RobotsRules;
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Default)]
pub struct RobotsCache {
    by_origin: HashMap<String, RobotsRules>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rules governing `url`, fetching them on first use
    ///
    /// A missing or unreachable robots.txt yields [`RobotsRules::allow_all`].
    pub async fn rules_for(&mut self, url: &Url, fetcher: &dyn Fetcher) -> &RobotsRules {
        let origin = url.origin().ascii_serialization();

        if !self.by_origin.contains_key(&origin) {
            let rules = fetch_rules(url, fetcher).await;
            self.by_origin.insert(origin.clone(), rules);
        }

        // Inserted above when absent
        &self.by_origin[&origin]
    }

    /// Number of origins whose robots.txt has been resolved
    pub fn len(&self) -> usize {
        self.by_origin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }
}

async fn fetch_rules(url: &Url, fetcher: &dyn Fetcher) -> RobotsRules {
    let Ok(robots_url) = url.join("/robots.txt") else {
        return RobotsRules::allow_all();
    };

    match fetcher.fetch_robots(&robots_url).await {
        Ok(Some(content)) => {
            tracing::debug!("Loaded robots.txt from {}", robots_url);
            RobotsRules::from_content(&content)
        }
        Ok(None) => {
            tracing::debug!("No robots.txt at {}", robots_url);
            RobotsRules::allow_all()
        }
        Err(e) => {
            tracing::warn!("Could not fetch {}: {}; allowing all", robots_url, e);
            RobotsRules::allow_all()
        }
    }
}
