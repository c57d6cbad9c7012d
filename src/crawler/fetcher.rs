//! HTTP fetcher implementation
//!
//! This module handles all network access for a harvest:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for HTML pages
//! - GET requests for PDF bodies, with a signature check
//! - GET requests for robots.txt
//! - Error classification
//!
//! The [`Fetcher`] trait is the seam; [`HttpFetcher`] is the reqwest-backed
//! implementation used by default.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Leading bytes of every PDF file
const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Why a single request did not produce a usable body
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("server answered with HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("response is not a PDF")]
    NotPdf,

    #[error("response is not HTML (Content-Type: {content_type})")]
    NotHtml { content_type: String },

    #[error("cancelled before the request completed")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_connect() {
            FetchError::Network(format!("connection failed: {}", e))
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// An HTML page as returned by the server
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects, used as the base for relative links
    pub url: Url,
    pub body: String,
}

/// Network access used by the crawler and the download orchestrator
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches an HTML page
    async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError>;

    /// Fetches a PDF body
    ///
    /// Bodies that do not start with `%PDF` are rejected with
    /// [`FetchError::NotPdf`].
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;

    /// Fetches a robots.txt file
    ///
    /// `Ok(None)` means the server has no robots.txt (HTTP 4xx).
    async fn fetch_robots(&self, url: &Url) -> Result<Option<String>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use pdf_trawler::config::UserAgentConfig;
/// use pdf_trawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }

    async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self.get(url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(FetchError::NotHtml { content_type });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;

        Ok(Page {
            url: final_url,
            body,
        })
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await?;

        if !bytes.starts_with(PDF_SIGNATURE) {
            return Err(FetchError::NotPdf);
        }

        Ok(bytes.to_vec())
    }

    async fn fetch_robots(&self, url: &Url) -> Result<Option<String>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status.is_client_error() {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(Some(response.text().await?))
    }
}

/// Accepts HTML and XHTML; a missing Content-Type is given the benefit of the doubt
fn is_html_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    lowered.is_empty() || lowered.contains("text/html") || lowered.contains("application/xhtml")
}
