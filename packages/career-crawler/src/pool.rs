//! Bounded worker pool running site scrapes concurrently.
//!
//! `run` starts `min(worker_count, jobs)` worker tasks that pull jobs from
//! a shared queue until it is empty. Each scrape runs in its own task so a
//! panic inside one site is reported on that job's result instead of
//! taking the worker (and the jobs it would have processed) down with it.
//! `run` returns only after every worker has drained the queue and exited.
//! Dropping the `run` future aborts the workers and their in-progress
//! scrapes.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::PoolConfig;
use crate::error::{ConfigError, ScrapeError};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::site::SiteScraper;
use crate::types::{Job, JobResult};

type JobQueue = Arc<Mutex<VecDeque<(usize, Job)>>>;

/// Runs [`SiteScraper`] over many jobs with bounded parallelism.
pub struct WorkerPool<F: PageFetcher + 'static> {
    config: PoolConfig,
    scraper: Arc<SiteScraper<F>>,
}

impl WorkerPool<HttpFetcher> {
    /// Create a pool that fetches over HTTP.
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: PageFetcher + 'static> WorkerPool<F> {
    /// Create a pool around a custom fetcher.
    pub fn with_fetcher(config: PoolConfig, fetcher: F) -> Result<Self, ConfigError> {
        config.validate()?;
        let scraper = SiteScraper::new(fetcher, &config);
        Ok(Self {
            config,
            scraper: Arc::new(scraper),
        })
    }

    /// Create a pool around a preconfigured scraper.
    pub fn with_scraper(
        config: PoolConfig,
        scraper: SiteScraper<F>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            scraper: Arc::new(scraper),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn scraper(&self) -> &SiteScraper<F> {
        &self.scraper
    }

    /// Process every job and return one result per job.
    ///
    /// Results arrive in completion order; match them to jobs by
    /// `job_id`, the job's index in `jobs`. A caller-chosen `Job::id` is
    /// echoed separately as `JobResult::id`.
    pub async fn run(&self, jobs: Vec<Job>) -> Vec<JobResult> {
        let total = jobs.len();
        if total == 0 {
            debug!("No jobs submitted, skipping worker start");
            return Vec::new();
        }

        let worker_count = self.config.worker_count.min(total);
        info!(
            workers = worker_count,
            jobs = total,
            "Starting worker pool"
        );
        let started = Instant::now();

        let queue: JobQueue = Arc::new(Mutex::new(
            jobs.into_iter().enumerate().collect(),
        ));
        let (tx, mut rx) = mpsc::channel::<JobResult>(total);

        let mut workers = JoinSet::new();
        for worker_id in 1..=worker_count {
            workers.spawn(worker(
                worker_id,
                Arc::clone(&queue),
                Arc::clone(&self.scraper),
                tx.clone(),
            ));
        }
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Worker task failed");
            }
        }

        let mut results = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        let found = results.iter().filter(|r| r.is_found()).count();
        let failed = results.iter().filter(|r| r.is_error()).count();
        if results.len() != total {
            error!(
                jobs = total,
                results = results.len(),
                "Result count does not match job count"
            );
        }
        info!(
            jobs = total,
            found = found,
            failed = failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Worker pool completed"
        );

        results
    }
}

async fn worker<F: PageFetcher + 'static>(
    worker_id: usize,
    queue: JobQueue,
    scraper: Arc<SiteScraper<F>>,
    results: mpsc::Sender<JobResult>,
) {
    let mut processed = 0usize;

    loop {
        // Guard is released before the scrape starts
        let next = queue.lock().await.pop_front();
        let Some((job_id, job)) = next else {
            break;
        };

        let result = process_job(job_id, job, Arc::clone(&scraper)).await;
        processed += 1;

        if results.send(result).await.is_err() {
            warn!(worker = worker_id, "Result receiver dropped");
            break;
        }
    }

    debug!(worker = worker_id, processed = processed, "Worker finished");
}

async fn process_job<F: PageFetcher + 'static>(
    job_id: usize,
    job: Job,
    scraper: Arc<SiteScraper<F>>,
) -> JobResult {
    let mut result = JobResult::for_job(job_id, &job);

    // Owned by a JoinSet so the scrape is aborted if this worker is dropped
    let mut scrape = JoinSet::new();
    scrape.spawn(async move {
        scraper
            .scan(&job.root_url, &job.desired_titles)
            .await
    });

    let Some(joined) = scrape.join_next().await else {
        result.error = Some(ScrapeError::Aborted {
            reason: "scrape task missing".to_string(),
        });
        return result;
    };

    match joined {
        Ok(Ok(scan)) => {
            result.job_page_url = scan.job_page_url.unwrap_or_default();
            result.pages_fetched = scan.pages_fetched;
            result.failed_candidates = scan.failed_candidates;
        }
        Ok(Err(e)) => {
            debug!(
                business = %result.business_name,
                url = %result.source_url,
                error = %e,
                "Scrape failed"
            );
            result.error = Some(e);
        }
        Err(e) => {
            warn!(
                business = %result.business_name,
                url = %result.source_url,
                error = %e,
                "Scrape task aborted"
            );
            result.error = Some(ScrapeError::Aborted {
                reason: e.to_string(),
            });
        }
    }

    result
}
