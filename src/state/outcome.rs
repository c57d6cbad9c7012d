//! Outcome definitions for processed candidates
//!
//! Every candidate handed to the orchestrator ends in exactly one of these.

use crate::crawler::FetchError;
use crate::state::PdfCandidate;
use crate::UrlError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The filter stage that rejected a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterStage {
    /// Rejected by filename or URL patterns before any network access
    NameOrUrl,

    /// Rejected by the size bounds after download
    Size { size: u64 },
}

impl FilterStage {
    /// Short identifier used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameOrUrl => "name_or_url",
            Self::Size { .. } => "size",
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a single candidate could not be harvested
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("invalid URL {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: UrlError,
    },

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to write {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("left out of the merge: {reason}")]
    NotMerged { reason: String },
}

/// Terminal state of one candidate
#[derive(Debug)]
pub enum Outcome {
    /// Written to disk at this path
    Persisted(PathBuf),

    /// Downloaded and included in the merged PDF at this path
    Merged(PathBuf),

    /// Rejected by a filter
    FilteredOut(FilterStage),

    /// Could not be fetched or written
    Failed(ItemError),
}

impl Outcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::FilteredOut(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Path of the separately written file, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Persisted(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(path) => write!(f, "persisted to {}", path.display()),
            Self::Merged(path) => write!(f, "merged into {}", path.display()),
            Self::FilteredOut(stage) => write!(f, "filtered out ({})", stage),
            Self::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// A candidate together with what happened to it
#[derive(Debug)]
pub struct DownloadResult {
    /// The document URL: normalized, or exactly as given if it did not parse
    pub url: String,

    /// `None` when `url` could not be parsed
    pub candidate: Option<PdfCandidate>,

    pub outcome: Outcome,
}

impl DownloadResult {
    pub fn new(candidate: PdfCandidate, outcome: Outcome) -> Self {
        Self {
            url: candidate.url.to_string(),
            candidate: Some(candidate),
            outcome,
        }
    }

    /// A supplied URL that was rejected before any network access
    pub fn invalid_url(raw: &str, source: UrlError) -> Self {
        Self {
            url: raw.to_string(),
            candidate: None,
            outcome: Outcome::Failed(ItemError::InvalidUrl {
                raw: raw.to_string(),
                source,
            }),
        }
    }
}
