use std::fmt;
use url::Url;

/// A PDF link discovered during the crawl
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PdfCandidate {
    /// Normalized absolute URL of the document
    pub url: Url,

    /// Depth of the page the link was found on, plus one
    ///
    /// Candidates supplied directly (not crawled) have depth 0.
    pub discovery_depth: u32,
}

impl PdfCandidate {
    pub fn new(url: Url, discovery_depth: u32) -> Self {
        Self {
            url,
            discovery_depth,
        }
    }

    /// Percent-decoded last path segment, as used by the name filters
    pub fn filename(&self) -> String {
        crate::url::filename_from_url(self.url.as_str())
    }
}

impl fmt::Display for PdfCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {})", self.url, self.discovery_depth)
    }
}
