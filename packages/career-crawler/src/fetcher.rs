//! Page fetching.
//!
//! [`PageFetcher`] is the seam between the crawl logic and the network.
//! [`HttpFetcher`] is the reqwest implementation used in production;
//! tests use [`MockFetcher`](crate::testing::MockFetcher).

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::PoolConfig;
use crate::error::{ConfigError, FetchError, FetchResult};

/// Raw response body for a fetched URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Body bytes, possibly truncated to the configured limit
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }
}

/// Retrieves raw page bodies.
///
/// Implementations return `FetchError::Status` for non-2xx responses so
/// callers never classify error pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// HTTP fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Build a fetcher from pool configuration.
    pub fn new(config: &PoolConfig) -> Result<Self, ConfigError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .connect_timeout(config.fetch_timeout.min(Duration::from_secs(10)))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self::with_client(client, config.max_body_bytes))
    }

    /// Use a pre-built client.
    pub fn with_client(client: reqwest::Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    fn map_error(url: &Url, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::http(url.as_str(), err)
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        debug!(url = %url, "HTTP fetch starting");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                debug!(url = %url, error = %e, "HTTP request failed");
                Self::map_error(url, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::map_error(url, e))?
        {
            let remaining = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                warn!(
                    url = %url,
                    limit = self.max_body_bytes,
                    "Response body truncated"
                );
                break;
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = body.len(), "Page fetched successfully");

        Ok(FetchedPage::new(body))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_default_config() {
        let fetcher = HttpFetcher::new(&PoolConfig::default()).unwrap();
        assert_eq!(fetcher.name(), "http");
        assert_eq!(fetcher.max_body_bytes, crate::config::DEFAULT_MAX_BODY_BYTES);
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Bind then drop to obtain a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let fetcher = HttpFetcher::with_client(client, 1024);
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
        assert_eq!(err.url(), url.as_str());
    }
}
