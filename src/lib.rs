//! pdf-trawler: harvest PDF documents reachable from a web page
//!
//! This crate crawls outward from a seed page to a bounded depth, collects the
//! PDF links it finds, filters them by filename, URL and size, downloads the
//! survivors and either keeps them as separate files or merges them into one.

pub mod config;
pub mod crawler;
pub mod filter;
pub mod merge;
pub mod output;
pub mod robots;
pub mod schema;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for harvest operations
///
/// Only setup problems surface here. Per-document failures are recorded on
/// the individual [`state::DownloadResult`] instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("min_size ({min}) must not exceed max_size ({max})")]
    InvalidSizeRange { min: u64, max: u64 },

    #[error("Schema error: {0}")]
    Schema(#[from] schema::SchemaError),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::{Config, OutputMode, SortBy};
pub use crawler::{download_pdfs_from_webpage, process_pdfs, Fetcher, Harvester, HttpFetcher};
pub use filter::{should_download_pdf, FilterConfig};
pub use merge::{delete_downloaded_pdfs, merge_pdfs, CleanupReport, DeleteTarget, MergeOutcome};
pub use output::{HarvestObserver, HarvestReport};
pub use schema::{SchemaRegistry, SiteSchema};
pub use state::{DownloadResult, FilterStage, ItemError, Outcome, PdfCandidate};
