//! Pool and fetcher configuration.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Browser-like user agent sent by default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_WORKER_COUNT: usize = 100;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Configuration for a [`WorkerPool`](crate::WorkerPool) and the fetcher it builds.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum concurrently running scrapes (at least 1)
    pub worker_count: usize,

    /// Deadline applied to every single page fetch
    pub fetch_timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,

    /// Response bodies are truncated past this size
    pub max_body_bytes: usize,

    /// Upper bound on candidate links fetched per site (None = all)
    pub max_candidate_links: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_candidate_links: None,
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// Reads `CRAWLER_WORKERS`, `CRAWLER_FETCH_TIMEOUT_SECS`,
    /// `CRAWLER_USER_AGENT`, `CRAWLER_MAX_BODY_BYTES` and
    /// `CRAWLER_MAX_CANDIDATE_LINKS`. A `.env` file is honoured if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(workers) = parse_env::<usize>("CRAWLER_WORKERS")? {
            config.worker_count = workers;
        }
        if let Some(secs) = parse_env::<u64>("CRAWLER_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Ok(user_agent) = env::var("CRAWLER_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(bytes) = parse_env::<usize>("CRAWLER_MAX_BODY_BYTES")? {
            config.max_body_bytes = bytes;
        }
        if let Some(max) = parse_env::<usize>("CRAWLER_MAX_CANDIDATE_LINKS")? {
            config.max_candidate_links = Some(max);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the worker count.
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the per-fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the body size limit.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Cap the candidate links fetched per site.
    pub fn with_max_candidate_links(mut self, max: usize) -> Self {
        self.max_candidate_links = Some(max);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
        Err(_) => Ok(None),
    }
}
