//! HTTP item fetching.
//!
//! Thin wrapper over a blocking reqwest client. Non-success statuses are
//! reported as [`HttpStatusError`] so callers can tell a missing item (404)
//! from a broken registry.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::fmt;
use std::time::Duration;

/// Fetches registry documents over HTTP/HTTPS.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

/// Response from fetching a document.
#[derive(Debug)]
pub struct FetchResponse {
    /// The response body.
    pub content: String,
    /// HTTP status code.
    pub status: u16,
}

/// A non-success HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    /// HTTP status code.
    pub status: u16,
    /// Requested URL.
    pub url: String,
}

impl HttpStatusError {
    /// Whether the server reported the document as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.status == 410
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            401 => write!(f, "HTTP 401 Unauthorized fetching {}", self.url),
            403 => write!(f, "HTTP 403 Forbidden fetching {}", self.url),
            404 => write!(f, "HTTP 404 Not Found fetching {}", self.url),
            status => write!(f, "HTTP {} fetching {}", status, self.url),
        }
    }
}

impl std::error::Error for HttpStatusError {}

impl HttpFetcher {
    /// Create a new HTTP fetcher with default 30-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new HTTP fetcher with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("kitbox/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch a document, sending the given headers.
    ///
    /// A non-success status is returned as an [`HttpStatusError`] wrapped in
    /// the `anyhow` error.
    pub fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<FetchResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let content = response
            .text()
            .with_context(|| format!("Failed to read response from {}", url))?;

        Ok(FetchResponse {
            content,
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn default_timeout_is_30_seconds() {
        let fetcher = HttpFetcher::new().unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn custom_timeout() {
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn fetch_returns_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/r/button.json");
            then.status(200).body("{}");
        });

        let fetcher = HttpFetcher::new().unwrap();
        let response = fetcher.fetch(&server.url("/r/button.json"), &[]).unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.status, 200);
    }

    #[test]
    fn fetch_sends_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/r/secret.json")
                .header("authorization", "Bearer t0k3n");
            then.status(200).body("{}");
        });

        let fetcher = HttpFetcher::new().unwrap();
        let headers = vec![("Authorization".to_string(), "Bearer t0k3n".to_string())];
        fetcher
            .fetch(&server.url("/r/secret.json"), &headers)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn non_success_status_is_typed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/r/missing.json");
            then.status(404);
        });

        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .fetch(&server.url("/r/missing.json"), &[])
            .unwrap_err();
        let status = err.downcast_ref::<HttpStatusError>().unwrap();
        assert!(status.is_not_found());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn status_error_messages() {
        let err = HttpStatusError {
            status: 401,
            url: "https://x.dev/a.json".into(),
        };
        assert!(err.to_string().contains("Unauthorized"));
        assert!(!err.is_not_found());

        let err = HttpStatusError {
            status: 502,
            url: "https://x.dev/a.json".into(),
        };
        assert_eq!(err.to_string(), "HTTP 502 fetching https://x.dev/a.json");
    }
}
