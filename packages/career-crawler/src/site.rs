//! Per-site crawl strategy.
//!
//! A site is checked in two steps: the root page itself, then every link
//! on it whose URL names a careers keyword. Candidates are fetched one at a
//! time, in link order, and the first page that passes the classifier wins.
//! Only the root fetch can fail the site; a broken candidate link just
//! counts as a miss.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::classifier::JobPageClassifier;
use crate::config::PoolConfig;
use crate::error::{FetchError, FetchResult, ScrapeError, ScrapeResult};
use crate::fetcher::PageFetcher;
use crate::html::extract_links;
use crate::types::PageContent;

/// What a site crawl found, plus bookkeeping for the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteScan {
    /// First page passing both checks, if any
    pub job_page_url: Option<String>,

    /// Pages fetched successfully (root included)
    pub pages_fetched: usize,

    /// Candidate links whose fetch failed
    pub failed_candidates: usize,
}

/// Finds the careers page of a single business site.
pub struct SiteScraper<F: PageFetcher> {
    fetcher: F,
    classifier: JobPageClassifier,
    fetch_timeout: Duration,
    max_candidate_links: Option<usize>,
}

impl<F: PageFetcher> SiteScraper<F> {
    pub fn new(fetcher: F, config: &PoolConfig) -> Self {
        Self {
            fetcher,
            classifier: JobPageClassifier::default(),
            fetch_timeout: config.fetch_timeout,
            max_candidate_links: config.max_candidate_links,
        }
    }

    /// Use a classifier with a custom vocabulary.
    pub fn with_classifier(mut self, classifier: JobPageClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Find the careers page for `root_url`.
    ///
    /// `Ok(None)` means the site was crawled and nothing qualified; an
    /// error means the root page itself could not be fetched.
    pub async fn scrape<S: AsRef<str>>(
        &self,
        root_url: &str,
        titles: &[S],
    ) -> ScrapeResult<Option<String>> {
        Ok(self.scan(root_url, titles).await?.job_page_url)
    }

    /// Like [`Self::scrape`], also reporting fetch counts.
    pub async fn scan<S: AsRef<str>>(
        &self,
        root_url: &str,
        titles: &[S],
    ) -> ScrapeResult<SiteScan> {
        let root = parse_root_url(root_url)?;
        let mut scan = SiteScan::default();

        let (root_page, links) = self.fetch_page(&root, true).await?;
        scan.pages_fetched += 1;

        if self.classifier.accepts(&root_page, titles) {
            debug!(url = %root, "Root page is a matching job page");
            scan.job_page_url = Some(root.to_string());
            return Ok(scan);
        }

        drop(root_page);

        let candidates: Vec<String> = links
            .into_iter()
            .filter(|link| link != root.as_str() && self.classifier.url_has_keyword(link))
            .take(self.max_candidate_links.unwrap_or(usize::MAX))
            .collect();

        debug!(
            url = %root,
            candidates = candidates.len(),
            "Checking candidate links"
        );

        for candidate in candidates {
            let Ok(candidate_url) = Url::parse(&candidate) else {
                continue;
            };

            match self.fetch_page(&candidate_url, false).await {
                Ok((page, _)) => {
                    scan.pages_fetched += 1;
                    if self.classifier.accepts(&page, titles) {
                        debug!(url = %root, job_page = %candidate, "Found job page");
                        scan.job_page_url = Some(candidate);
                        return Ok(scan);
                    }
                }
                Err(e) => {
                    debug!(url = %candidate, error = %e, "Candidate fetch failed");
                    scan.failed_candidates += 1;
                }
            }
        }

        debug!(url = %root, pages = scan.pages_fetched, "No job page found");
        Ok(scan)
    }

    /// Fetch and parse one page under a single per-fetch deadline.
    ///
    /// Parsing runs on the blocking pool so an expensive document cannot
    /// stall the async workers. When `with_links` is set the page's links
    /// are resolved against `url` as well.
    async fn fetch_page(
        &self,
        url: &Url,
        with_links: bool,
    ) -> ScrapeResult<(PageContent, Vec<String>)> {
        let deadline = Instant::now() + self.fetch_timeout;
        let timed_out = || FetchError::Timeout {
            url: url.to_string(),
        };

        let fetched = tokio::time::timeout_at(deadline, self.fetcher.fetch(url))
            .await
            .map_err(|_| timed_out())??;

        let page_url = url.clone();
        let parse = tokio::task::spawn_blocking(move || {
            let page = PageContent::new(page_url.as_str(), fetched.body);
            let links = if with_links {
                extract_links(&page.html(), &page_url)
            } else {
                Vec::new()
            };
            (page, links)
        });

        match tokio::time::timeout_at(deadline, parse).await {
            Ok(Ok(parsed)) => Ok(parsed),
            Ok(Err(e)) => Err(ScrapeError::Aborted {
                reason: e.to_string(),
            }),
            Err(_) => {
                debug!(url = %url, "Page parse exceeded fetch deadline");
                Err(timed_out().into())
            }
        }
    }
}

/// Parse a business root URL, assuming https when no scheme is given.
pub fn parse_root_url(url: &str) -> FetchResult<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
        });
    }

    let normalized = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    Url::parse(&normalized)
        .ok()
        .filter(|u| u.host_str().is_some())
        .ok_or_else(|| FetchError::InvalidUrl {
            url: url.to_string(),
        })
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
