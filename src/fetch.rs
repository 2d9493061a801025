//! Page fetching and title extraction.
//!
//! The HTTP transport sits behind the [`PageFetcher`] trait; the production
//! implementation is a thin wrapper over a shared `reqwest` client carrying
//! the run's request headers and the per-fetch timeout.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, ReconError};

/// Title sentinel for pages that loaded but carry no usable `<title>`.
pub const NO_TITLE: &str = "No Title Found";

/// Title sentinel for targets whose fetch failed at the network level.
pub const FETCH_FAILED: &str = "Failed to Fetch";

/// The immutable outcome of processing one target.
///
/// Exactly one of these exists per loaded target, success or not; it is the
/// unit handed to the report emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub target: String,
    pub url: String,
    pub title: String,
    pub screenshot: Option<PathBuf>,
}

impl FetchResult {
    /// Result for a successfully fetched page; capture reference still pending.
    pub fn fetched(target: String, url: String, title: Option<String>) -> Self {
        Self {
            target,
            url,
            title: title.unwrap_or_else(|| NO_TITLE.to_string()),
            screenshot: None,
        }
    }

    /// Degraded result for a target whose fetch failed. No capture is attempted.
    pub fn failed(target: String, url: String) -> Self {
        Self {
            target,
            url,
            title: FETCH_FAILED.to_string(),
            screenshot: None,
        }
    }

    pub fn is_fetched(&self) -> bool {
        self.title != FETCH_FAILED
    }
}

/// Capability interface for retrieving a page and extracting its title.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Perform a single GET and return the page title, `Ok(None)` when the
    /// document has none. Exactly one attempt; no retry.
    async fn fetch_title(&self, url: &str) -> Result<Option<String>, FetchError>;
}

/// Production fetcher over a shared `reqwest::Client`.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build the shared client with the run's headers and fetch timeout.
    ///
    /// Invalid TLS certificates are accepted: recon targets routinely present
    /// self-signed or mismatched certs and should still be reported.
    pub fn new(headers: HeaderMap, timeout: Duration) -> Result<Self, ReconError> {
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| ReconError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_title(&self, url: &str) -> Result<Option<String>, FetchError> {
        let response = self.client.get(url).send().await?;
        debug!("fetched {} ({})", url, response.status());

        let body = response.text().await?;
        Ok(extract_title(&body))
    }
}

/// Pull the document title out of an HTML body.
///
/// Whitespace is collapsed; an empty or whitespace-only title counts as absent.
pub fn extract_title(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let body = "<html><head><title>Login Portal</title></head><body></body></html>";
        assert_eq!(extract_title(body), Some("Login Portal".to_string()));
    }

    #[test]
    fn test_extract_title_collapses_whitespace() {
        let body = "<html><head><title>\n  Admin\n  Console  </title></head></html>";
        assert_eq!(extract_title(body), Some("Admin Console".to_string()));
    }

    #[test]
    fn test_extract_title_absent() {
        assert_eq!(extract_title("<html><body>hello</body></html>"), None);
        assert_eq!(extract_title("<html><head><title></title></head></html>"), None);
        assert_eq!(extract_title("not html at all"), None);
    }

    #[test]
    fn test_fetched_result_applies_no_title_sentinel() {
        let result = FetchResult::fetched("a.example".into(), "http://a.example".into(), None);
        assert_eq!(result.title, NO_TITLE);
        assert!(result.is_fetched());
        assert!(result.screenshot.is_none());
    }

    #[test]
    fn test_failed_result_sentinel() {
        let result = FetchResult::failed("a.example".into(), "http://a.example".into());
        assert_eq!(result.title, FETCH_FAILED);
        assert!(!result.is_fetched());
        assert!(result.screenshot.is_none());
    }
}
