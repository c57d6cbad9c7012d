//! Crawler module for page traversal and PDF downloads
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing and link extraction
//! - The breadth-first frontier with its depth bound
//! - The download pipeline and overall harvest coordination

mod coordinator;
mod fetcher;
mod frontier;
mod orchestrator;
mod parser;
mod sort;

pub use coordinator::Harvester;
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher, Page};
pub use frontier::{Frontier, QueuedPage};
pub use parser::{extract_links, DiscoveredLink};
pub use sort::sort_candidates;

use crate::config::Config;
use crate::output::HarvestReport;
use crate::Result;

/// Crawls from `seed` and downloads every PDF that passes the filters
///
/// This is the main entry point for a harvest. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Crawl breadth-first up to the configured recursion depth
/// 3. Filter, download and persist the PDFs found
/// 4. Merge them into one file in merge mode
///
/// # Example
///
/// ```no_run
/// use pdf_trawler::{download_pdfs_from_webpage, Config};
///
/// # async fn example() -> pdf_trawler::Result<()> {
/// let report = download_pdfs_from_webpage("https://example.com/", &Config::default()).await?;
/// for path in report.persisted() {
///     println!("{}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn download_pdfs_from_webpage(seed: &str, config: &Config) -> Result<HarvestReport> {
    Harvester::new(config.clone())?.harvest(seed).await
}

/// Downloads an explicit list of PDF URLs, skipping the crawl
pub async fn process_pdfs(urls: &[String], config: &Config) -> Result<HarvestReport> {
    Harvester::new(config.clone())?.process(urls).await
}
