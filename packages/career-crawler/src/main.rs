//! Command-line runner for the career crawler.
//!
//! Reads a JSON list of businesses (as produced by the geo lookup), crawls
//! every site for a careers page and prints the results as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use career_crawler::{
    jobs_from_businesses, BusinessLocator, JobResult, JsonFileLocator, LocateRequest, PoolConfig,
    WorkerPool,
};

#[derive(Parser)]
#[command(name = "career-crawl")]
#[command(about = "Find careers pages for a list of businesses")]
struct Cli {
    /// JSON file with an array of {"name", "url"} businesses
    businesses: PathBuf,

    /// Job title to look for (repeatable; none accepts any careers page)
    #[arg(short, long = "title")]
    titles: Vec<String>,

    /// Zip code the business list was built for
    #[arg(long, default_value = "")]
    zip: String,

    /// Search radius in miles the business list was built for
    #[arg(long, default_value_t = 0)]
    radius: u32,

    /// Concurrent workers (overrides CRAWLER_WORKERS)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-fetch timeout in seconds (overrides CRAWLER_FETCH_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Write results here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only include businesses where a careers page was found
    #[arg(long)]
    found_only: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    zip: &'a str,
    radius: u32,
    titles: &'a [String],
    found: usize,
    failed: usize,
    results: Vec<&'a JobResult>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,career_crawler=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = PoolConfig::from_env().context("Failed to load configuration")?;
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_fetch_timeout(Duration::from_secs(secs));
    }

    let locator = JsonFileLocator::new(&cli.businesses);
    let businesses = locator
        .locate(&LocateRequest::new(cli.zip.clone(), cli.radius))
        .await
        .context("Failed to load businesses")?;

    let jobs = jobs_from_businesses(&businesses, &cli.titles);
    if jobs.is_empty() {
        tracing::warn!("No businesses with a website to crawl");
    }

    let pool = WorkerPool::new(config).context("Failed to create worker pool")?;
    let mut results = pool.run(jobs).await;
    results.sort_by_key(|r| r.job_id);

    let report = Report {
        zip: &cli.zip,
        radius: cli.radius,
        titles: &cli.titles,
        found: results.iter().filter(|r| r.is_found()).count(),
        failed: results.iter().filter(|r| r.is_error()).count(),
        results: results
            .iter()
            .filter(|r| !cli.found_only || r.is_found())
            .collect(),
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize results")?;

    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Results written");
        }
        None => println!("{}", json),
    }

    Ok(())
}
