//! Typed errors for the career crawler.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell
//! a failed fetch apart from a misconfigured pool.

use thiserror::Error;

/// Errors that can occur while fetching a single page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is empty or cannot be parsed
    #[error("invalid URL: {url:?}")]
    InvalidUrl { url: String },

    /// Transport-level failure (DNS, connection refused, TLS, body read)
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Fetch did not complete within the per-fetch timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },
}

impl FetchError {
    /// Wrap a transport error for `url`.
    pub fn http(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Http {
            url: url.into(),
            source: source.into(),
        }
    }

    /// URL the failed fetch was aimed at.
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url }
            | Self::Http { url, .. }
            | Self::Status { url, .. }
            | Self::Timeout { url } => url,
        }
    }
}

/// Errors recorded on a job result.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The business root page could not be fetched
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The scrape task stopped before producing an answer
    #[error("scrape aborted: {reason}")]
    Aborted { reason: String },
}

/// Configuration errors raised when building a pool or fetcher.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Worker count must be at least one
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// Fetch timeout must be non-zero
    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,

    /// Environment variable present but unparsable
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for scrape operations.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_url() {
        let err = FetchError::Status {
            url: "https://example.com/jobs".to_string(),
            status: 503,
        };
        assert_eq!(err.url(), "https://example.com/jobs");
        assert_eq!(err.to_string(), "HTTP 503 for https://example.com/jobs");
    }

    #[test]
    fn test_scrape_error_wraps_fetch_error() {
        let err: ScrapeError = FetchError::Timeout {
            url: "https://slow.example".to_string(),
        }
        .into();
        assert!(matches!(err, ScrapeError::Fetch(FetchError::Timeout { .. })));
        assert_eq!(
            err.to_string(),
            "fetch failed: timeout fetching: https://slow.example"
        );
    }

    #[test]
    fn test_http_error_keeps_source() {
        let err = FetchError::http("https://down.example", "connection refused");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("connection refused"));
    }
}
