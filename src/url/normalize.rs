use crate::UrlError;
use url::Url;

/// Link prefixes that never lead to a fetchable document
const SKIPPED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes an absolute URL into the form used for de-duplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https`
/// 3. Require a host (the parser lowercases it and drops default ports)
/// 4. Remove the fragment
///
/// Dot segments are resolved by the parser. The query string is kept because
/// it frequently selects the document being served.
///
/// # Examples
///
/// ```
/// use pdf_trawler::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/docs/../a.pdf#page=2").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/a.pdf");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    finish(url)
}

/// Resolves `href` against the page it was found on, then normalizes it
///
/// Returns `None` for links that can never be fetched: empty hrefs,
/// fragment-only anchors, `javascript:`/`mailto:`/`tel:`/`data:` links and
/// anything that does not resolve to an http(s) URL.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    let joined = base.join(href).ok()?;
    finish(joined).ok()
}

fn finish(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns true if the whole URL ends in `.pdf`, ignoring case
///
/// The query string is part of the test: `viewer?file=report.pdf` counts,
/// `report.pdf?version=2` does not.
pub fn has_pdf_extension(url: &Url) -> bool {
    url.as_str().to_ascii_lowercase().ends_with(".pdf")
}
