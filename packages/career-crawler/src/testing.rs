//! Testing utilities including a mock page fetcher.
//!
//! Useful for exercising the scraper and worker pool without network
//! access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::fetcher::{FetchedPage, PageFetcher};

/// Canned response for a URL.
#[derive(Debug, Clone)]
enum MockResponse {
    Page(String),
    Status(u16),
    ConnectionRefused,
    Panic,
}

/// Mock fetcher for testing.
///
/// Serves canned bodies by exact URL, answers 404 for anything unknown,
/// and records every request. Clones share state, so a test can keep a
/// handle while the pool owns another.
///
/// # Example
///
/// ```rust
/// use career_crawler::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new()
///     .with_page("https://acme.example/", "<a href=\"/jobs\">Jobs</a>")
///     .with_status("https://down.example/", 503);
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    default_delay: Option<Duration>,
    calls: Arc<RwLock<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Page(html.into()));
        self
    }

    /// Answer `url` with an HTTP error status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Fail `url` as if the connection was refused.
    pub fn with_connection_refused(self, url: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::ConnectionRefused);
        self
    }

    /// Panic while fetching `url`, as a buggy fetcher would.
    pub fn with_panic(self, url: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Panic);
        self
    }

    /// Delay every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Delay responses for one URL.
    pub fn with_delay_for(self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(url.into(), delay);
        self
    }

    /// URLs requested so far, in request order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of fetches made so far.
    pub fn fetch_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Number of fetches made for `url`.
    pub fn fetch_count_for(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|u| *u == url).count()
    }

    /// Number of fetches in progress right now.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
        self.max_in_flight.store(0, Ordering::SeqCst);
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        let key = url.as_str().to_string();
        self.calls.write().unwrap().push(key.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        // Released on every exit, including cancellation mid-delay
        let _in_flight = InFlightGuard(&self.in_flight);

        let delay = self
            .delays
            .read()
            .unwrap()
            .get(&key)
            .copied()
            .or(self.default_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().unwrap().get(&key).cloned();

        match response {
            Some(MockResponse::Page(html)) => Ok(FetchedPage::new(html)),
            Some(MockResponse::Status(status)) => Err(FetchError::Status { url: key, status }),
            Some(MockResponse::ConnectionRefused) => {
                Err(FetchError::http(key, "connection refused"))
            }
            Some(MockResponse::Panic) => panic!("mock fetcher panicked on {}", key),
            None => Err(FetchError::Status {
                url: key,
                status: 404,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
