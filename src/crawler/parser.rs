//! HTML parser for extracting links
//!
//! Every `<a href>` on a page is resolved against the page URL (or the
//! document's `<base href>`, when present) and classified as a PDF candidate
//! or a page to crawl.

use crate::url::{has_pdf_extension, resolve_link};
use scraper::{Html, Selector};
use url::Url;

/// MIME type that marks an anchor as pointing to a PDF
const PDF_MIME: &str = "application/pdf";

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute, normalized target (fragment removed)
    pub url: Url,

    /// The anchor's `type` attribute, if it had one
    pub declared_type: Option<String>,
}

impl DiscoveredLink {
    /// True when the link should be treated as a PDF rather than a page
    ///
    /// Either the URL ends in `.pdf` (any case) or the anchor declares
    /// `type="application/pdf"`.
    pub fn is_pdf(&self) -> bool {
        has_pdf_extension(&self.url)
            || self
                .declared_type
                .as_deref()
                .is_some_and(|t| t.trim().to_ascii_lowercase().starts_with(PDF_MIME))
    }
}

/// Extracts all followable links from an HTML document, in document order
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">`, including anchors with a `download` attribute
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links
/// - Anything that does not resolve to http(s)
///
/// # Example
///
/// ```
/// use pdf_trawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="report.pdf">Report</a><a href="/next">Next</a>"#;
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links.len(), 2);
/// assert!(links[0].is_pdf());
/// assert!(!links[1].is_pdf());
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<DiscoveredLink> {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let url = resolve_link(&base, href)?;
            let declared_type = element.value().attr("type").map(str::to_string);
            Some(DiscoveredLink { url, declared_type })
        })
        .collect()
}

/// Honors `<base href>` when it resolves to an http(s) URL
fn document_base(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("href"))
                .and_then(|href| resolve_link(page_url, href))
        })
        .unwrap_or_else(|| page_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/section/page.html").unwrap()
    }

    fn urls(links: &[DiscoveredLink]) -> Vec<&str> {
        links.iter().map(|l| l.url.as_str()).collect()
    }

    #[test]
    fn test_extract_relative_and_absolute() {
        let html = r#"<html><body>
            <a href="a.pdf">A</a>
            <a href="/top.html">Top</a>
            <a href="https://other.org/b.PDF">B</a>
        </body></html>"#;

        let links = extract_links(html, &base_url());
        assert_eq!(
            urls(&links),
            vec![
                "https://example.com/section/a.pdf",
                "https://example.com/top.html",
                "https://other.org/b.PDF",
            ]
        );
    }

    #[test]
    fn test_skip_unfetchable_links() {
        let html = r##"<a href="javascript:void(0)">x</a>
            <a href="mailto:test@example.com">x</a>
            <a href="tel:+1234567890">x</a>
            <a href="#top">x</a>
            <a href="">x</a>
            <a>no href</a>"##;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_download_attribute_is_kept() {
        let html = r#"<a href="report.pdf" download>Get</a>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links.len(), 1);
        assert!(links[0].is_pdf());
    }

    #[test]
    fn test_fragment_removed() {
        let html = r#"<a href="guide.pdf#page=4">Guide</a>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(urls(&links), vec!["https://example.com/section/guide.pdf"]);
    }

    #[test]
    fn test_pdf_classification() {
        let html = r#"
            <a href="Report.PDF">ext upper</a>
            <a href="report.pdf?version=2">with query</a>
            <a href="/download?id=7" type="application/pdf">declared</a>
            <a href="/viewer?file=x.pdf">viewer</a>
            <a href="/page.html">page</a>
        "#;
        let links = extract_links(html, &base_url());
        let flags: Vec<bool> = links.iter().map(DiscoveredLink::is_pdf).collect();
        assert_eq!(flags, vec![true, false, true, true, false]);
    }

    #[test]
    fn test_base_href_is_honored() {
        let html = r#"<html><head><base href="https://cdn.example.com/files/"></head>
            <body><a href="doc.pdf">Doc</a></body></html>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(urls(&links), vec!["https://cdn.example.com/files/doc.pdf"]);
    }

    #[test]
    fn test_duplicates_are_preserved_in_order() {
        let html = r#"<a href="a.pdf">1</a><a href="b.pdf">2</a><a href="a.pdf">3</a>"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links.len(), 3);
        assert_eq!(links[0], links[2]);
    }

    #[test]
    fn test_malformed_html_does_not_fail() {
        let html = r#"<div><a href="x.pdf">unclosed <p><a href="y.html">"#;
        let links = extract_links(html, &base_url());
        assert_eq!(links.len(), 2);
    }
}
