//! Harvest coordinator - crawl, download and merge orchestration
//!
//! A [`Harvester`] owns everything one harvest needs:
//! - The validated configuration
//! - The fetch capability (HTTP by default)
//! - The observer that receives progress events
//! - The cancellation token
//!
//! The crawl runs to completion before any PDF is downloaded, so the crawl
//! state is never shared with the download pipeline.

use crate::config::{Config, OutputMode, MAX_RECURSION_DEPTH};
use crate::crawler::orchestrator::Orchestrator;
use crate::crawler::parser::extract_links;
use crate::crawler::sort::sort_candidates;
use crate::crawler::{Fetcher, Frontier, HttpFetcher};
use crate::merge::{merge_pdfs, MergeOutcome};
use crate::output::{HarvestObserver, HarvestReport, TracingObserver};
use crate::robots::RobotsGate;
use crate::state::{DownloadResult, ItemError, Outcome, PdfCandidate};
use crate::url::{normalize_url, resolve_unique_path, sanitize_filename, CrawlScope};
use crate::Result;
use chrono::Utc;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Prefix of the staging directory used in merge mode
const STAGING_PREFIX: &str = ".pdf-trawler-";

/// What the crawl phase produced
struct CrawlSummary {
    candidates: Vec<PdfCandidate>,
    pages_visited: usize,
}

/// Entry point for crawling and downloading
///
/// # Example
///
/// ```no_run
/// use pdf_trawler::{Config, Harvester};
///
/// # async fn example() -> pdf_trawler::Result<()> {
/// let harvester = Harvester::new(Config::default())?;
/// let report = harvester.harvest("https://example.com/papers/").await?;
/// println!("{} files saved", report.persisted().len());
/// # Ok(())
/// # }
/// ```
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    observer: Arc<dyn HarvestObserver>,
    cancel: CancellationToken,
}

impl Harvester {
    /// Creates a harvester with the HTTP fetcher and tracing observer
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::from_config(&config.user_agent, config.crawler.timeout())?;

        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            observer: Arc::new(TracingObserver),
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the fetch capability
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replaces the observer
    pub fn with_observer(mut self, observer: Arc<dyn HarvestObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Uses `cancel` to stop the harvest early
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls from `seed`, then downloads every candidate that passes the filters
    ///
    /// Per-document failures are recorded in the report; only setup problems
    /// (bad seed URL, unwritable output directory) are returned as errors.
    pub async fn harvest(&self, seed: &str) -> Result<HarvestReport> {
        let seed_url = normalize_url(seed)?;
        let mut report = HarvestReport::new(Some(seed.to_string()), self.config.output.mode);

        tracing::info!(
            "Starting harvest from {} (depth {}, {} mode)",
            seed_url,
            self.config.effective_depth(),
            self.config.output.mode
        );

        let crawl = self.crawl(&seed_url).await;
        report.pages_visited = crawl.pages_visited;

        let mut candidates = crawl.candidates;
        sort_candidates(&mut candidates, self.config.output.sort_by);

        self.download(candidates, &mut report).await?;
        Ok(self.finish(report))
    }

    /// Downloads an explicit list of PDF URLs without crawling
    ///
    /// A URL that does not parse (or is not http/https) becomes a failed
    /// entry in the report; the remaining URLs are still downloaded.
    pub async fn process(&self, urls: &[String]) -> Result<HarvestReport> {
        let mut report = HarvestReport::new(None, self.config.output.mode);
        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(urls.len());
        for raw in urls {
            let url = match normalize_url(raw) {
                Ok(url) => url,
                Err(e) => {
                    self.observer.invalid_url(raw, &e);
                    report.results.push(DownloadResult::invalid_url(raw, e));
                    continue;
                }
            };
            if self.config.crawler.deduplicate && !seen.insert(url.as_str().to_string()) {
                continue;
            }
            candidates.push(PdfCandidate::new(url, 0));
        }
        sort_candidates(&mut candidates, self.config.output.sort_by);

        tracing::info!("Processing {} PDF URLs", candidates.len());

        self.download(candidates, &mut report).await?;
        Ok(self.finish(report))
    }

    /// Crawls from `seed` and returns the candidates a harvest would download
    ///
    /// Applies the filename and URL filters; no PDF is fetched, so the size
    /// filter cannot be evaluated.
    pub async fn discover(&self, seed: &str) -> Result<Vec<PdfCandidate>> {
        let seed_url = normalize_url(seed)?;
        let mut candidates = self.crawl(&seed_url).await.candidates;
        sort_candidates(&mut candidates, self.config.output.sort_by);

        let filter = &self.config.filter;
        candidates.retain(|c| filter.passes_name_and_url(c.url.as_str()));
        Ok(candidates)
    }

    /// Breadth-first crawl collecting PDF candidates
    async fn crawl(&self, seed: &Url) -> CrawlSummary {
        let crawler = &self.config.crawler;
        if crawler.recursion_depth > MAX_RECURSION_DEPTH {
            tracing::warn!(
                "recursion-depth {} exceeds the maximum, using {}",
                crawler.recursion_depth,
                MAX_RECURSION_DEPTH
            );
        }

        let fetcher = self.fetcher.as_ref();
        let scope = CrawlScope::resolve(crawler.scope, &crawler.allowed_domains, seed);
        let mut robots = RobotsGate::new(
            crawler.respect_robots,
            self.config.user_agent.crawler_name.clone(),
        );
        let mut frontier = Frontier::new(
            seed.clone(),
            self.config.effective_depth(),
            crawler.deduplicate,
        );

        let mut candidates = Vec::new();
        let mut pages_visited = 0;
        let mut first_request = true;

        while !self.cancel.is_cancelled() {
            let Some(page) = frontier.next_page() else {
                break;
            };

            if !robots.allows(&page.url, fetcher).await {
                self.observer.robots_denied(&page.url);
                continue;
            }

            if !first_request {
                let delay = match robots.crawl_delay(&page.url, fetcher).await {
                    Some(robots_delay) => robots_delay.max(crawler.request_delay()),
                    None => crawler.request_delay(),
                };
                if !delay.is_zero() {
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
            first_request = false;

            tracing::debug!("Fetching page {} (depth {})", page.url, page.depth);
            let fetched = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = fetcher.fetch_page(&page.url) => result,
            };
            let fetched = match fetched {
                Ok(p) => p,
                Err(e) => {
                    self.observer.page_failed(&page.url, &e);
                    continue;
                }
            };
            pages_visited += 1;

            let links = extract_links(&fetched.body, &fetched.url);
            self.observer.page_visited(&page.url, page.depth, links.len());

            for link in links {
                if link.is_pdf() {
                    if !frontier.record_pdf(&link.url) {
                        tracing::debug!("Skipping repeated PDF link {}", link.url);
                        continue;
                    }
                    if !robots.allows(&link.url, fetcher).await {
                        self.observer.robots_denied(&link.url);
                        continue;
                    }
                    let candidate = PdfCandidate::new(link.url, page.depth + 1);
                    self.observer.candidate_discovered(&candidate);
                    candidates.push(candidate);
                } else if frontier.can_descend(page.depth) {
                    if scope.allows(&link.url) {
                        frontier.enqueue(link.url, page.depth);
                    } else {
                        tracing::debug!("Not following {}: outside crawl scope", link.url);
                    }
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages visited, {} PDF links found",
            pages_visited,
            candidates.len()
        );

        CrawlSummary {
            candidates,
            pages_visited,
        }
    }

    /// Runs the download pipeline, then merges in merge mode
    async fn download(
        &self,
        candidates: Vec<PdfCandidate>,
        report: &mut HarvestReport,
    ) -> Result<()> {
        let write_dir = &self.config.output.write_dir;
        tokio::fs::create_dir_all(write_dir).await?;

        match self.config.output.mode {
            OutputMode::Separate => {
                let results = self.orchestrator().run(candidates, write_dir).await;
                report.results.extend(results);
            }
            OutputMode::Merge => self.download_and_merge(candidates, write_dir, report).await?,
        }
        Ok(())
    }

    /// Stages downloads in a private directory and merges them into one file
    ///
    /// The staging directory is removed afterwards whatever the merge result,
    /// so every staged outcome is rewritten to [`Outcome::Merged`] or a
    /// failure before returning.
    async fn download_and_merge(
        &self,
        candidates: Vec<PdfCandidate>,
        write_dir: &Path,
        report: &mut HarvestReport,
    ) -> Result<()> {
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(write_dir)?;

        let results = self.orchestrator().run(candidates, staging.path()).await;
        report.results.extend(results);

        let sources: Vec<PathBuf> = report.persisted().into_iter().cloned().collect();
        if sources.is_empty() {
            tracing::warn!("Nothing to merge: no PDFs were downloaded");
            report.merge_error = Some("no PDFs were downloaded".to_string());
        } else {
            let output = resolve_unique_path(
                write_dir,
                &sanitize_filename(&self.config.output.output_name),
            );
            tracing::info!("Merging {} PDFs into {}", sources.len(), output.display());

            let merged = match tokio::task::spawn_blocking(move || merge_pdfs(&sources, &output))
                .await
            {
                Ok(Ok(outcome)) => Ok(outcome),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(format!("merge task failed: {}", e)),
            };

            match merged {
                Ok(outcome) => {
                    self.observer.merged(&outcome);
                    settle_staged(&mut report.results, Ok(&outcome));
                    report.merge = Some(outcome);
                }
                Err(reason) => {
                    tracing::error!("Merge failed: {}", reason);
                    settle_staged(&mut report.results, Err(&reason));
                    report.merge_error = Some(reason);
                }
            }
        }

        if let Err(e) = staging.close() {
            tracing::warn!("Could not remove staging directory: {}", e);
        }
        Ok(())
    }

    fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator {
            fetcher: self.fetcher.as_ref(),
            observer: self.observer.as_ref(),
            filter: &self.config.filter,
            cancel: &self.cancel,
            concurrency: self.config.crawler.concurrency,
        }
    }

    fn finish(&self, mut report: HarvestReport) -> HarvestReport {
        report.cancelled = self.cancel.is_cancelled();
        report.finished_at = Utc::now();

        tracing::info!(
            "Harvest finished in {:.1}s: {} saved, {} merged, {} filtered, {} failed{}",
            report.duration().num_milliseconds() as f64 / 1000.0,
            report.persisted().len(),
            report.merged().count(),
            report.filtered().count(),
            report.failed().count(),
            if report.cancelled { " (cancelled)" } else { "" }
        );
        self.observer.finished(&report);
        report
    }
}

/// Rewrites staged outcomes once the merge has run
///
/// Documents in the merged file point at it; documents the merge left out,
/// or all of them when the merge failed, become failures with the reason.
fn settle_staged(results: &mut [DownloadResult], merge: std::result::Result<&MergeOutcome, &str>) {
    for result in results.iter_mut() {
        let Outcome::Persisted(staged) = &result.outcome else {
            continue;
        };

        let settled = match merge {
            Ok(outcome) => {
                let skipped = outcome.skipped.iter().find(|(path, _)| path == staged);
                match (skipped, &outcome.output_path) {
                    (Some((_, reason)), _) => Outcome::Failed(ItemError::NotMerged {
                        reason: reason.clone(),
                    }),
                    (None, Some(output)) => Outcome::Merged(output.clone()),
                    (None, None) => Outcome::Failed(ItemError::NotMerged {
                        reason: "no merged file was written".to_string(),
                    }),
                }
            }
            Err(reason) => Outcome::Failed(ItemError::NotMerged {
                reason: reason.to_string(),
            }),
        };
        result.outcome = settled;
    }
}
