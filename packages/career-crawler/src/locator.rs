//! Boundary to the business discovery service.
//!
//! Finding businesses near a location is done elsewhere (a geocoding plus
//! places lookup). The crawler only needs the resulting `(name, url)`
//! pairs, so this module defines the interface and turns businesses into
//! crawl [`Job`]s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::Job;

/// A business as reported by the locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub name: String,

    /// Website root; may be empty when the listing has none
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub lat: f64,

    #[serde(default)]
    pub lon: f64,
}

impl Business {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            lat: 0.0,
            lon: 0.0,
        }
    }
}

/// Area to search for businesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateRequest {
    pub zip_code: String,
    pub radius_miles: u32,
}

impl LocateRequest {
    pub fn new(zip_code: impl Into<String>, radius_miles: u32) -> Self {
        Self {
            zip_code: zip_code.into(),
            radius_miles,
        }
    }
}

/// Errors raised by locator implementations.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid business list in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of businesses for a location.
#[async_trait]
pub trait BusinessLocator: Send + Sync {
    async fn locate(&self, request: &LocateRequest) -> Result<Vec<Business>, LocateError>;
}

/// Locator that reads a JSON array of businesses from disk.
///
/// The request is ignored; the file is assumed to already hold the
/// businesses for the area of interest.
pub struct JsonFileLocator {
    path: PathBuf,
}

impl JsonFileLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BusinessLocator for JsonFileLocator {
    async fn locate(&self, request: &LocateRequest) -> Result<Vec<Business>, LocateError> {
        debug!(path = %self.path.display(), zip = %request.zip_code, "Loading businesses");

        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LocateError::Read {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_slice(&data).map_err(|source| LocateError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Build one job per business that has a website.
///
/// Businesses with a blank URL are skipped; ids follow the position in
/// `businesses` so results can be traced back to the locator output.
pub fn jobs_from_businesses(businesses: &[Business], titles: &[String]) -> Vec<Job> {
    let jobs: Vec<Job> = businesses
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.url.trim().is_empty())
        .map(|(index, b)| {
            Job::new(&b.name, b.url.trim())
                .with_titles(titles.iter().cloned())
                .with_id(index)
        })
        .collect();

    info!(
        businesses = businesses.len(),
        jobs = jobs.len(),
        skipped = businesses.len() - jobs.len(),
        "Prepared crawl jobs"
    );

    jobs
}
