//! Filter evaluation for PDF candidates
//!
//! Filtering happens in two phases:
//! - before download, on the filename and the full URL
//! - after download, on the actual size in bytes
//!
//! # Example
//!
//! ```
//! use pdf_trawler::filter::{should_download_pdf, FilterConfig};
//!
//! let filter = FilterConfig::builder()
//!     .filename_include(["report*.pdf"])
//!     .min_size(1000)
//!     .max_size(100_000)
//!     .build()
//!     .unwrap();
//!
//! assert!(should_download_pdf("https://x.com/report_2023.pdf", Some(5000), &filter));
//! ```

mod pattern;

pub use pattern::{matches, matches_any, GlobPattern};

use crate::url::filename_from_url;
use crate::ConfigError;
use serde::Deserialize;

/// An ordered set of compiled glob patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| GlobPattern::new(p.as_ref()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Iterates over the patterns as written
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(GlobPattern::as_str)
    }

    /// Include semantics: an empty set admits everything
    fn admits(&self, value: &str) -> bool {
        self.patterns.is_empty() || self.hits(value)
    }

    /// Exclude semantics: an empty set rejects nothing
    fn hits(&self, value: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(value))
    }
}

/// Immutable filter settings
///
/// Construct with [`FilterConfig::builder`]; the size range is validated once
/// at construction so evaluation never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FilterSpec")]
pub struct FilterConfig {
    filename_include: PatternSet,
    filename_exclude: PatternSet,
    url_include: PatternSet,
    url_exclude: PatternSet,
    min_size: Option<u64>,
    max_size: Option<u64>,
}

impl FilterConfig {
    /// A filter that accepts every candidate
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::default()
    }

    pub fn filename_include(&self) -> &PatternSet {
        &self.filename_include
    }

    pub fn filename_exclude(&self) -> &PatternSet {
        &self.filename_exclude
    }

    pub fn url_include(&self) -> &PatternSet {
        &self.url_include
    }

    pub fn url_exclude(&self) -> &PatternSet {
        &self.url_exclude
    }

    pub fn min_size(&self) -> Option<u64> {
        self.min_size
    }

    pub fn max_size(&self) -> Option<u64> {
        self.max_size
    }

    /// True when a size bound is configured, so a post-download check matters
    pub fn has_size_limits(&self) -> bool {
        self.min_size.is_some() || self.max_size.is_some()
    }

    /// Pre-download check on the filename and the full URL
    ///
    /// Exclude patterns win over include patterns within each category.
    pub fn passes_name_and_url(&self, url: &str) -> bool {
        let filename = filename_from_url(url);

        let filename_ok =
            self.filename_include.admits(&filename) && !self.filename_exclude.hits(&filename);
        let url_ok = self.url_include.admits(url) && !self.url_exclude.hits(url);

        filename_ok && url_ok
    }

    /// Post-download check on the byte size; unknown sizes always pass
    pub fn passes_size(&self, size: Option<u64>) -> bool {
        let Some(size) = size else {
            return true;
        };

        self.min_size.map_or(true, |min| size >= min) && self.max_size.map_or(true, |max| size <= max)
    }

    /// Both checks combined
    pub fn should_download(&self, url: &str, size: Option<u64>) -> bool {
        self.passes_name_and_url(url) && self.passes_size(size)
    }

    /// Returns the settings in their raw form, e.g. to layer overrides on top
    pub fn to_spec(&self) -> FilterSpec {
        let owned = |set: &PatternSet| -> Vec<String> { set.iter().map(str::to_string).collect() };
        FilterSpec {
            filename_include: owned(&self.filename_include),
            filename_exclude: owned(&self.filename_exclude),
            url_include: owned(&self.url_include),
            url_exclude: owned(&self.url_exclude),
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

/// Builder for [`FilterConfig`]
#[derive(Debug, Clone, Default)]
pub struct FilterConfigBuilder {
    spec: FilterSpec,
}

impl FilterConfigBuilder {
    pub fn filename_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.filename_include = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filename_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.filename_exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn url_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.url_include = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn url_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.url_exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_size(mut self, bytes: u64) -> Self {
        self.spec.min_size = Some(bytes);
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.spec.max_size = Some(bytes);
        self
    }

    /// Validates and freezes the configuration
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSizeRange`] when `min_size > max_size`.
    pub fn build(self) -> Result<FilterConfig, ConfigError> {
        FilterConfig::try_from(self.spec)
    }
}

/// Raw, unvalidated filter settings as they appear in a config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilterSpec {
    #[serde(default)]
    pub filename_include: Vec<String>,
    #[serde(default)]
    pub filename_exclude: Vec<String>,
    #[serde(default)]
    pub url_include: Vec<String>,
    #[serde(default)]
    pub url_exclude: Vec<String>,
    #[serde(default)]
    pub min_size: Option<u64>,
    #[serde(default)]
    pub max_size: Option<u64>,
}

impl TryFrom<FilterSpec> for FilterConfig {
    type Error = ConfigError;

    fn try_from(spec: FilterSpec) -> Result<Self, Self::Error> {
        if let (Some(min), Some(max)) = (spec.min_size, spec.max_size) {
            if min > max {
                return Err(ConfigError::InvalidSizeRange { min, max });
            }
        }

        Ok(Self {
            filename_include: PatternSet::new(&spec.filename_include),
            filename_exclude: PatternSet::new(&spec.filename_exclude),
            url_include: PatternSet::new(&spec.url_include),
            url_exclude: PatternSet::new(&spec.url_exclude),
            min_size: spec.min_size,
            max_size: spec.max_size,
        })
    }
}

/// Decides whether a PDF should be downloaded
///
/// Pass `size = None` before the download to apply only the filename and URL
/// rules; pass the real size afterwards for the full decision.
pub fn should_download_pdf(url: &str, size: Option<u64>, filter: &FilterConfig) -> bool {
    filter.should_download(url, size)
}
