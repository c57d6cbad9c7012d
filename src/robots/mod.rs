//! Robots.txt handling module
//!
//! This module provides fetching, parsing and caching of robots.txt files.
//! When enabled, both pages and PDF links are checked before they are
//! requested.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::RobotsRules;

use crate::crawler::Fetcher;
use std::time::Duration;
use url::Url;

/// robots.txt policy for one crawl
///
/// Disabled gates allow everything and never touch the network.
#[derive(Debug)]
pub struct RobotsGate {
    enabled: bool,
    user_agent: String,
    cache: RobotsCache,
}

impl RobotsGate {
    /// `user_agent` is the product token matched against `User-agent` lines
    pub fn new(enabled: bool, user_agent: impl Into<String>) -> Self {
        Self {
            enabled,
            user_agent: user_agent.into(),
            cache: RobotsCache::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Checks if `url` may be requested
    pub async fn allows(&mut self, url: &Url, fetcher: &dyn Fetcher) -> bool {
        if !self.enabled {
            return true;
        }
        let rules = self.cache.rules_for(url, fetcher).await;
        rules.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Crawl-delay declared for `url`'s origin, if any
    pub async fn crawl_delay(&mut self, url: &Url, fetcher: &dyn Fetcher) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let rules = self.cache.rules_for(url, fetcher).await;
        rules.crawl_delay(&self.user_agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{FetchError, Page};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RobotsOnly {
        body: Option<String>,
        requests: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for RobotsOnly {
        async fn fetch_page(&self, _url: &Url) -> Result<Page, FetchError> {
            Err(FetchError::Status(404))
        }

        async fn fetch_bytes(&self, _url: &Url) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Status(404))
        }

        async fn fetch_robots(&self, url: &Url) -> Result<Option<String>, FetchError> {
            assert_eq!(url.path(), "/robots.txt");
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    fn fetcher(body: Option<&str>) -> RobotsOnly {
        RobotsOnly {
            body: body.map(str::to_string),
            requests: AtomicUsize::new(0),
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_disabled_gate_never_fetches() {
        let f = fetcher(Some("User-agent: *\nDisallow: /"));
        let mut gate = RobotsGate::new(false, "pdf-trawler");
        assert!(gate.allows(&url("https://example.com/a.pdf"), &f).await);
        assert_eq!(f.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rules_fetched_once_per_origin() {
        let f = fetcher(Some("User-agent: *\nDisallow: /private/\nCrawl-delay: 1"));
        let mut gate = RobotsGate::new(true, "pdf-trawler");

        assert!(gate.allows(&url("https://example.com/public/a.pdf"), &f).await);
        assert!(!gate.allows(&url("https://example.com/private/b.pdf"), &f).await);
        assert_eq!(
            gate.crawl_delay(&url("https://example.com/"), &f).await,
            Some(Duration::from_secs(1))
        );
        assert_eq!(f.requests.load(Ordering::SeqCst), 1);

        assert!(!gate.allows(&url("https://other.org/private/c.pdf"), &f).await);
        assert_eq!(f.requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_robots_allows_everything() {
        let f = fetcher(None);
        let mut gate = RobotsGate::new(true, "pdf-trawler");
        assert!(gate.allows(&url("https://example.com/anything.pdf"), &f).await);
        assert_eq!(gate.crawl_delay(&url("https://example.com/"), &f).await, None);
    }
}
