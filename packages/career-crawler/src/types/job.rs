//! Crawl jobs and their results.

use serde::{Serialize, Serializer};

use crate::error::ScrapeError;

/// One unit of crawl work: a business site and the titles to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Caller-chosen key, echoed unchanged on the result
    pub id: Option<usize>,

    pub business_name: String,

    /// Site root to start from
    pub root_url: String,

    /// Title filter; empty means any careers page is accepted
    pub desired_titles: Vec<String>,
}

impl Job {
    /// Create a job with no title filter.
    pub fn new(business_name: impl Into<String>, root_url: impl Into<String>) -> Self {
        Self {
            id: None,
            business_name: business_name.into(),
            root_url: root_url.into(),
            desired_titles: Vec::new(),
        }
    }

    /// Set the desired job titles.
    pub fn with_titles(mut self, titles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.desired_titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Set a caller-chosen key.
    pub fn with_id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }
}

/// What happened to a job, derived from its result.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// A page passed both classifier checks
    Found(&'a str),
    /// The site was crawled and nothing qualified
    NotFound,
    /// The site could not be crawled
    Failed(&'a ScrapeError),
}

/// Outcome of processing one [`Job`].
#[derive(Debug, Serialize)]
pub struct JobResult {
    /// Submission index of the job; unique within one run
    pub job_id: usize,

    /// The job's caller-chosen key, if it had one
    pub id: Option<usize>,

    pub business_name: String,

    /// Root URL the job started from
    pub source_url: String,

    /// Discovered careers page; empty when none was found
    pub job_page_url: String,

    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ScrapeError>,

    /// Pages successfully fetched for this job
    pub pages_fetched: usize,

    /// Candidate links that could not be fetched
    pub failed_candidates: usize,
}

impl JobResult {
    /// Empty result for `job`, filled in by the scraper.
    pub fn for_job(job_id: usize, job: &Job) -> Self {
        Self {
            job_id,
            id: job.id,
            business_name: job.business_name.clone(),
            source_url: job.root_url.clone(),
            job_page_url: String::new(),
            error: None,
            pages_fetched: 0,
            failed_candidates: 0,
        }
    }

    pub fn outcome(&self) -> Outcome<'_> {
        match (&self.error, self.job_page_url.is_empty()) {
            (Some(err), _) => Outcome::Failed(err),
            (None, true) => Outcome::NotFound,
            (None, false) => Outcome::Found(&self.job_page_url),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome(), Outcome::Found(_))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<ScrapeError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}
