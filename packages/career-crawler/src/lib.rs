//! Career Crawler
//!
//! Finds the careers page of many business websites concurrently and
//! checks whether it advertises a desired job title.
//!
//! # Usage
//!
//! ```rust,ignore
//! use career_crawler::{Job, PoolConfig, WorkerPool};
//!
//! let pool = WorkerPool::new(PoolConfig::new().with_workers(16))?;
//! let results = pool
//!     .run(vec![Job::new("Acme", "https://acme.example").with_titles(["engineer"])])
//!     .await;
//!
//! for result in &results {
//!     println!("{}: {:?}", result.business_name, result.outcome());
//! }
//! ```
//!
//! # Modules
//!
//! - [`pool`] - Bounded worker pool, one result per job
//! - [`site`] - Per-site crawl strategy
//! - [`classifier`] - Job-page and title-context heuristics
//! - [`fetcher`] - `PageFetcher` trait and the reqwest implementation
//! - [`html`] - DOM visitor, visible text and link extraction
//! - [`locator`] - Interface to the business discovery service
//! - [`testing`] - Mock fetcher for tests

pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod html;
pub mod locator;
pub mod pool;
pub mod site;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use classifier::{is_job_page, matches_job_title, JobPageClassifier, Vocabulary};
pub use config::PoolConfig;
pub use error::{ConfigError, FetchError, ScrapeError};
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use locator::{jobs_from_businesses, Business, BusinessLocator, JsonFileLocator, LocateRequest};
pub use pool::WorkerPool;
pub use site::{SiteScan, SiteScraper};
pub use types::{Job, JobResult, Outcome, PageContent};

// Re-export testing utilities
pub use testing::MockFetcher;
