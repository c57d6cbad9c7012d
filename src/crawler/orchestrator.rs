//! Download orchestration
//!
//! For each candidate, in order:
//! 1. Filename/URL filter (no network access on rejection)
//! 2. Fetch, on a bounded pool of concurrent requests
//! 3. Size filter on the actual byte count
//! 4. Write to the destination directory under a collision-free name
//!
//! Fetches may overlap, but steps 3 and 4 run one candidate at a time in
//! candidate order, so file naming and the result list are deterministic.

use crate::crawler::{FetchError, Fetcher};
use crate::filter::FilterConfig;
use crate::output::HarvestObserver;
use crate::state::{DownloadResult, FilterStage, ItemError, Outcome, PdfCandidate};
use crate::url::{resolve_unique_path, sanitize_filename};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// What happened before the sequential part of the pipeline
enum Prepared {
    Rejected,
    Fetched(Result<Vec<u8>, FetchError>),
}

pub(crate) struct Orchestrator<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub observer: &'a dyn HarvestObserver,
    pub filter: &'a FilterConfig,
    pub cancel: &'a CancellationToken,
    pub concurrency: usize,
}

impl Orchestrator<'_> {
    /// Runs every candidate through the pipeline, writing into `dest`
    ///
    /// `dest` must exist. Returns one result per candidate, in input order.
    pub async fn run(&self, candidates: Vec<PdfCandidate>, dest: &Path) -> Vec<DownloadResult> {
        let fetcher = self.fetcher;
        let filter = self.filter;
        let cancel = self.cancel;
        self.observer.downloads_started(candidates.len());

        let prepared = stream::iter(candidates)
            .map(|candidate| async move {
                if !filter.passes_name_and_url(candidate.url.as_str()) {
                    return (candidate, Prepared::Rejected);
                }
                if cancel.is_cancelled() {
                    return (candidate, Prepared::Fetched(Err(FetchError::Cancelled)));
                }

                let fetched = tokio::select! {
                    _ = cancel.cancelled() => Err(FetchError::Cancelled),
                    result = fetcher.fetch_bytes(&candidate.url) => result,
                };
                (candidate, Prepared::Fetched(fetched))
            })
            .buffered(self.concurrency.max(1));
        let mut prepared = std::pin::pin!(prepared);

        let mut results = Vec::new();
        while let Some((candidate, step)) = prepared.next().await {
            let outcome = self.settle(&candidate, step, dest).await;
            results.push(DownloadResult::new(candidate, outcome));
        }
        results
    }

    /// Size check and persistence for one candidate
    async fn settle(&self, candidate: &PdfCandidate, step: Prepared, dest: &Path) -> Outcome {
        let bytes = match step {
            Prepared::Rejected => {
                self.observer.filtered(candidate, FilterStage::NameOrUrl);
                return Outcome::FilteredOut(FilterStage::NameOrUrl);
            }
            Prepared::Fetched(Err(e)) => {
                let error = ItemError::Fetch(e);
                self.observer.failed(candidate, &error);
                return Outcome::Failed(error);
            }
            Prepared::Fetched(Ok(bytes)) => bytes,
        };

        let size = bytes.len() as u64;
        self.observer.fetched(candidate, size);

        if !self.filter.passes_size(Some(size)) {
            let stage = FilterStage::Size { size };
            self.observer.filtered(candidate, stage);
            return Outcome::FilteredOut(stage);
        }

        let filename = sanitize_filename(&candidate.filename());
        let path = resolve_unique_path(dest, &filename);

        match tokio::fs::write(&path, &bytes).await {
            Ok(()) => {
                self.observer.persisted(candidate, &path);
                Outcome::Persisted(path)
            }
            Err(source) => {
                let error = ItemError::Persist { path, source };
                self.observer.failed(candidate, &error);
                Outcome::Failed(error)
            }
        }
    }
}
