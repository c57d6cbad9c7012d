//! Terminal progress display
//!
//! A spinner while the crawl runs, then a bar with one step per candidate
//! while PDFs are downloaded. Failures are still logged, printed above the
//! bar so they do not garble it.

use crate::crawler::FetchError;
use crate::output::{HarvestObserver, HarvestReport, TracingObserver};
use crate::state::{FilterStage, ItemError, PdfCandidate};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

const CRAWL_TEMPLATE: &str = "{spinner} {msg}";
const DOWNLOAD_TEMPLATE: &str = "{spinner} Downloading PDFs [{bar:40}] {pos}/{len} {msg}";

/// Shows harvest progress with `indicatif`
pub struct ProgressObserver {
    bar: ProgressBar,
    pages: AtomicUsize,
    found: AtomicUsize,
}

impl ProgressObserver {
    /// Draws to stderr
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(
            ProgressStyle::with_template(CRAWL_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            bar,
            pages: AtomicUsize::new(0),
            found: AtomicUsize::new(0),
        }
    }

    fn crawl_message(&self) {
        self.bar.set_message(format!(
            "Crawling: {} pages visited, {} PDFs found",
            self.pages.load(Ordering::Relaxed),
            self.found.load(Ordering::Relaxed)
        ));
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl HarvestObserver for ProgressObserver {
    fn page_visited(&self, _url: &Url, _depth: u32, _links_found: usize) {
        self.pages.fetch_add(1, Ordering::Relaxed);
        self.crawl_message();
    }

    fn page_failed(&self, url: &Url, error: &FetchError) {
        self.bar.suspend(|| TracingObserver.page_failed(url, error));
    }

    fn candidate_discovered(&self, _candidate: &PdfCandidate) {
        self.found.fetch_add(1, Ordering::Relaxed);
        self.crawl_message();
    }

    fn downloads_started(&self, total: usize) {
        self.bar.set_style(
            ProgressStyle::with_template(DOWNLOAD_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message("");
    }

    fn filtered(&self, _candidate: &PdfCandidate, _stage: FilterStage) {
        self.bar.inc(1);
    }

    fn fetched(&self, candidate: &PdfCandidate, _size: u64) {
        self.bar.set_message(candidate.filename());
    }

    fn persisted(&self, _candidate: &PdfCandidate, _path: &Path) {
        self.bar.inc(1);
    }

    fn failed(&self, candidate: &PdfCandidate, error: &ItemError) {
        self.bar.suspend(|| TracingObserver.failed(candidate, error));
        self.bar.inc(1);
    }

    fn finished(&self, _report: &HarvestReport) {
        self.bar.finish_and_clear();
    }
}
