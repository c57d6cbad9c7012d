//! Harvest report
//!
//! The report is the return value of every harvest operation. It carries
//! the outcome of each candidate in processing order plus run metadata.

use crate::config::OutputMode;
use crate::merge::MergeOutcome;
use crate::state::DownloadResult;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Everything a harvest produced
#[derive(Debug)]
pub struct HarvestReport {
    /// The seed page, or `None` when explicit URLs were processed
    pub seed: Option<String>,

    pub mode: OutputMode,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of pages fetched during the crawl
    pub pages_visited: usize,

    /// One entry per candidate, in processing order
    pub results: Vec<DownloadResult>,

    /// Merge result (merge mode only)
    ///
    /// `included` and `skipped` name the staged copies, which are removed
    /// before the report is returned. Per-document status is in `results`.
    pub merge: Option<MergeOutcome>,

    /// Why the merge failed, if it did
    pub merge_error: Option<String>,

    /// The harvest was cancelled before it finished
    pub cancelled: bool,
}

impl HarvestReport {
    /// Starts an empty report timestamped now
    pub fn new(seed: Option<String>, mode: OutputMode) -> Self {
        let now = Utc::now();
        Self {
            seed,
            mode,
            started_at: now,
            finished_at: now,
            pages_visited: 0,
            results: Vec::new(),
            merge: None,
            merge_error: None,
            cancelled: false,
        }
    }

    /// Paths of every separately written file, in processing order
    ///
    /// Empty in merge mode, where documents end up as [`Outcome::Merged`].
    ///
    /// [`Outcome::Merged`]: crate::state::Outcome::Merged
    pub fn persisted(&self) -> Vec<&PathBuf> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.path())
            .collect()
    }

    /// Documents whose pages are in the merged PDF
    pub fn merged(&self) -> impl Iterator<Item = &DownloadResult> {
        self.results.iter().filter(|r| r.outcome.is_merged())
    }

    pub fn filtered(&self) -> impl Iterator<Item = &DownloadResult> {
        self.results.iter().filter(|r| r.outcome.is_filtered())
    }

    pub fn failed(&self) -> impl Iterator<Item = &DownloadResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    /// True when at least one file was written
    ///
    /// In merge mode that is the merged file; in separate mode any download.
    pub fn any_persisted(&self) -> bool {
        match self.mode {
            OutputMode::Merge => self
                .merge
                .as_ref()
                .is_some_and(|m| m.output_path.is_some()),
            OutputMode::Separate => self.results.iter().any(|r| r.outcome.is_persisted()),
        }
    }

    /// Wall-clock duration of the harvest
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Report ===\n");

    println!("Overview:");
    if let Some(seed) = &report.seed {
        println!("  Seed: {}", seed);
    }
    println!("  Mode: {}", report.mode);
    println!("  Pages visited: {}", report.pages_visited);
    println!("  Candidates: {}", report.results.len());
    println!(
        "  Duration: {:.1}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    if report.cancelled {
        println!("  Cancelled before completion");
    }
    println!();

    let persisted = report.persisted();
    if !persisted.is_empty() {
        println!("Saved ({}):", persisted.len());
        for path in &persisted {
            println!("  - {}", path.display());
        }
        println!();
    }

    let merged: Vec<_> = report.merged().collect();
    if !merged.is_empty() {
        println!("Merged ({}):", merged.len());
        for result in merged {
            println!("  - {}", result.url);
        }
        println!();
    }

    let filtered: Vec<_> = report.filtered().collect();
    if !filtered.is_empty() {
        println!("Filtered Out ({}):", filtered.len());
        for result in filtered {
            println!("  - {} [{}]", result.url, result.outcome);
        }
        println!();
    }

    let failed: Vec<_> = report.failed().collect();
    if !failed.is_empty() {
        println!("Failed ({}):", failed.len());
        for result in failed {
            println!("  - {}: {}", result.url, result.outcome);
        }
        println!();
    }

    if let Some(path) = report.merge.as_ref().and_then(|m| m.output_path.as_ref()) {
        println!("Merged PDF: {}", path.display());
    }
    if let Some(err) = &report.merge_error {
        println!("Merge failed: {}", err);
    }
}
