//! Harvest observer trait and stock implementations
//!
//! An observer receives one callback per crawl or download event. All
//! methods default to doing nothing, so an implementation only overrides
//! what it cares about. Implementations must be thread-safe.

use crate::crawler::FetchError;
use crate::merge::MergeOutcome;
use crate::output::HarvestReport;
use crate::state::{FilterStage, ItemError, PdfCandidate};
use crate::UrlError;
use std::path::Path;
use url::Url;

/// Receives progress events from a harvest
#[allow(unused_variables)]
pub trait HarvestObserver: Send + Sync {
    /// A page was fetched and parsed
    fn page_visited(&self, url: &Url, depth: u32, links_found: usize) {}

    /// A page could not be fetched; the crawl continues without its links
    fn page_failed(&self, url: &Url, error: &FetchError) {}

    /// A new PDF candidate was found
    fn candidate_discovered(&self, candidate: &PdfCandidate) {}

    /// robots.txt disallowed a page or PDF link
    fn robots_denied(&self, url: &Url) {}

    /// An explicitly supplied URL could not be used
    fn invalid_url(&self, raw: &str, error: &UrlError) {}

    /// The download phase begins with `total` candidates
    fn downloads_started(&self, total: usize) {}

    /// A candidate was rejected by a filter
    fn filtered(&self, candidate: &PdfCandidate, stage: FilterStage) {}

    /// A candidate's bytes were downloaded
    fn fetched(&self, candidate: &PdfCandidate, size: u64) {}

    /// A candidate was written to disk
    fn persisted(&self, candidate: &PdfCandidate, path: &Path) {}

    /// A candidate could not be fetched or written
    fn failed(&self, candidate: &PdfCandidate, error: &ItemError) {}

    /// The merged PDF was written
    fn merged(&self, outcome: &MergeOutcome) {}

    /// The harvest is over; `report` is what the caller receives
    fn finished(&self, report: &HarvestReport) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl HarvestObserver for NoopObserver {}

/// Forwards every event to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl HarvestObserver for TracingObserver {
    fn page_visited(&self, url: &Url, depth: u32, links_found: usize) {
        tracing::info!("Visited {} (depth {}, {} links)", url, depth, links_found);
    }

    fn page_failed(&self, url: &Url, error: &FetchError) {
        tracing::warn!("Could not load page {}: {}", url, error);
    }

    fn candidate_discovered(&self, candidate: &PdfCandidate) {
        tracing::debug!("Found PDF {}", candidate);
    }

    fn robots_denied(&self, url: &Url) {
        tracing::info!("Skipping {}: disallowed by robots.txt", url);
    }

    fn invalid_url(&self, raw: &str, error: &UrlError) {
        tracing::warn!("Skipping {:?}: {}", raw, error);
    }

    fn downloads_started(&self, total: usize) {
        tracing::debug!("Downloading {} candidates", total);
    }

    fn filtered(&self, candidate: &PdfCandidate, stage: FilterStage) {
        match stage {
            FilterStage::NameOrUrl => {
                tracing::debug!("Filtered out {} by name/url", candidate.url)
            }
            FilterStage::Size { size } => {
                tracing::info!("Filtered out {} by size ({} bytes)", candidate.url, size)
            }
        }
    }

    fn fetched(&self, candidate: &PdfCandidate, size: u64) {
        tracing::debug!("Downloaded {} ({} bytes)", candidate.url, size);
    }

    fn persisted(&self, candidate: &PdfCandidate, path: &Path) {
        tracing::info!("Saved {} to {}", candidate.url, path.display());
    }

    fn failed(&self, candidate: &PdfCandidate, error: &ItemError) {
        tracing::warn!("Failed to download {}: {}", candidate.url, error);
    }

    fn merged(&self, outcome: &MergeOutcome) {
        if let Some(path) = &outcome.output_path {
            tracing::info!(
                "Merged {} PDFs into {} ({} skipped)",
                outcome.included.len(),
                path.display(),
                outcome.skipped.len()
            );
        }
        for (path, reason) in &outcome.skipped {
            tracing::warn!("Left {} out of the merge: {}", path.display(), reason);
        }
    }
}
