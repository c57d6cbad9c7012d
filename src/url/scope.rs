use serde::Deserialize;
use url::Url;

/// How far page traversal may wander from the seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    /// Only the seed's host and its subdomains
    #[default]
    SeedDomain,
    /// Only the hosts listed in `allowed-domains`
    AllowList,
    /// Any host
    Any,
}

/// The set of hosts whose pages may be followed during one crawl
///
/// Scope limits which pages are crawled. PDF links are collected from every
/// crawled page regardless of the host they point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlScope {
    Domains(Vec<String>),
    Any,
}

impl CrawlScope {
    /// Builds the scope for a crawl starting at `seed`
    pub fn resolve(kind: ScopeKind, allowed_domains: &[String], seed: &Url) -> Self {
        match kind {
            ScopeKind::Any => CrawlScope::Any,
            ScopeKind::AllowList => CrawlScope::Domains(
                allowed_domains
                    .iter()
                    .map(|d| d.trim().to_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect(),
            ),
            ScopeKind::SeedDomain => CrawlScope::Domains(
                seed.host_str()
                    .map(|h| vec![h.to_lowercase()])
                    .unwrap_or_default(),
            ),
        }
    }

    /// Checks whether pages on this URL's host may be crawled
    pub fn allows(&self, url: &Url) -> bool {
        match self {
            CrawlScope::Any => true,
            CrawlScope::Domains(domains) => {
                let Some(host) = url.host_str() else {
                    return false;
                };
                let host = host.to_lowercase();
                domains.iter().any(|d| domain_matches(d, &host))
            }
        }
    }
}

/// Checks if a host falls under an allowed domain
///
/// A domain admits itself and every subdomain. A leading `*.` is accepted
/// and means the same thing.
///
/// # Examples
///
/// ```
/// use pdf_trawler::url::domain_matches;
///
/// assert!(domain_matches("example.com", "example.com"));
/// assert!(domain_matches("example.com", "docs.example.com"));
/// assert!(domain_matches("*.example.com", "example.com"));
/// assert!(!domain_matches("example.com", "notexample.com"));
/// ```
pub fn domain_matches(allowed: &str, host: &str) -> bool {
    let base = allowed.strip_prefix("*.").unwrap_or(allowed);
    if base.is_empty() {
        return false;
    }
    host == base
        || host
            .strip_suffix(base)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
