use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;

use crate::parser::{ParseError, decode_html};
use crate::types::Page;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static RE_HAS_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("invalid regex: url scheme")
});

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Blocking page fetcher. One GET per call, no retries, no caching.
#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }

    pub fn fetch(&self, url: &str) -> Result<Page, ScraperError> {
        let url = normalize_url(url);
        log::info!("Fetching {}...", url);

        let response = self
            .client
            .get(&url)
            .send()
            .inspect_err(|e| log::debug!("HTTP error: {e:?}"))?
            .error_for_status()?;

        let final_url = response.url().to_string();
        if final_url != url {
            log::info!("Redirected to {}", final_url);
        }

        let body = response
            .bytes()
            .inspect_err(|e| log::debug!("Body read error: {e:?}"))?;
        log::debug!("Received {} bytes from {}", body.len(), final_url);

        let html = decode_html(&body)?;
        Ok(Page::new(final_url, html))
    }
}

/// Prefixes `https://` when the input has no scheme, so `example.com/x`
/// can be typed the way it is read.
pub fn normalize_url(input: &str) -> String {
    let input = input.trim();
    if RE_HAS_SCHEME.is_match(input) {
        input.to_string()
    } else {
        format!("https://{}", input.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(
            normalize_url("  example.com/a/b?c=1 "),
            "https://example.com/a/b?c=1"
        );
        assert_eq!(normalize_url("//cdn.example.com/x"), "https://cdn.example.com/x");
    }

    #[test]
    fn test_normalize_url_keeps_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(normalize_url("file:///tmp/x.html"), "file:///tmp/x.html");
    }

    #[test]
    fn test_fetch_unreachable_host_is_http_error() {
        let scraper = WebScraper::with_timeout(Duration::from_secs(5)).unwrap();

        // Port 9 (discard) on loopback has nothing listening.
        let err = scraper.fetch("http://127.0.0.1:9/").unwrap_err();

        assert!(matches!(err, ScraperError::Http(_)), "got {:?}", err);
        assert!(err.to_string().starts_with("HTTP request failed"));
    }

    #[test]
    fn test_fetch_invalid_url_is_http_error() {
        let scraper = WebScraper::new().unwrap();

        let err = scraper.fetch("http://exa mple.com/").unwrap_err();

        assert!(matches!(err, ScraperError::Http(_)));
    }
}
