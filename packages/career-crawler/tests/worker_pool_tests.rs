//! Worker pool behaviour over a mock fetcher.
//!
//! Covers cardinality, bounded concurrency and failure isolation without
//! touching the network.

use career_crawler::{Job, MockFetcher, PoolConfig, WorkerPool};
use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

fn careers_site(host: &str) -> (String, String) {
    (
        format!("https://{}/careers", host),
        "<h1>Careers</h1><p>Cashier position, apply in store</p>".to_string(),
    )
}

fn pool(workers: usize, fetcher: MockFetcher) -> WorkerPool<MockFetcher> {
    WorkerPool::with_fetcher(PoolConfig::new().with_workers(workers), fetcher).unwrap()
}

#[tokio::test]
async fn test_every_job_yields_one_result() {
    let mut fetcher = MockFetcher::new();
    let mut jobs = Vec::new();
    for i in 0..25 {
        let (url, html) = careers_site(&format!("shop{}.example", i));
        fetcher = fetcher.with_page(url.clone(), html);
        jobs.push(Job::new(format!("Shop {}", i), url).with_titles(["cashier"]));
    }

    let results = pool(4, fetcher.clone()).run(jobs).await;

    assert_eq!(results.len(), 25);
    let ids: HashSet<usize> = results.iter().map(|r| r.job_id).collect();
    assert_eq!(ids, (0..25).collect());
    assert!(results.iter().all(|r| r.is_found()));
    // No job processed twice
    assert_eq!(fetcher.fetch_count(), 25);
}

#[tokio::test]
async fn test_duplicate_business_names_are_kept_apart() {
    let fetcher = MockFetcher::new()
        .with_page("https://a.example/careers", "<p>Cook role</p>")
        .with_status("https://b.example/", 500);

    let results = pool(2, fetcher)
        .run(vec![
            Job::new("Joe's", "https://a.example/careers").with_titles(["cook"]),
            Job::new("Joe's", "https://b.example/").with_titles(["cook"]),
        ])
        .await;

    assert_eq!(results.len(), 2);
    let first = results.iter().find(|r| r.job_id == 0).unwrap();
    let second = results.iter().find(|r| r.job_id == 1).unwrap();
    assert!(first.is_found());
    assert_eq!(first.source_url, "https://a.example/careers");
    assert!(second.is_error());
    assert_eq!(second.source_url, "https://b.example/");
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let fetcher = MockFetcher::new()
        .with_connection_refused("https://down.example/")
        .with_status("https://broken.example/", 502)
        .with_page(
            "https://ok.example/",
            r#"<a href="/jobs">Jobs</a>"#,
        )
        .with_page("https://ok.example/jobs", "<p>Welder opening</p>");

    let results = pool(3, fetcher)
        .run(vec![
            Job::new("Down", "https://down.example/"),
            Job::new("Broken", "https://broken.example/"),
            Job::new("Ok", "https://ok.example/").with_titles(["welder"]),
        ])
        .await;

    assert_eq!(results.len(), 3);
    for result in &results {
        match result.business_name.as_str() {
            "Ok" => {
                assert!(result.error.is_none());
                assert_eq!(result.job_page_url, "https://ok.example/jobs");
            }
            _ => {
                assert!(result.is_error());
                assert!(result.job_page_url.is_empty());
            }
        }
    }
}

#[tokio::test]
async fn test_failed_job_is_not_retried() {
    let fetcher = MockFetcher::new().with_status("https://flaky.example/", 503);

    let results = pool(2, fetcher.clone())
        .run(vec![Job::new("Flaky", "https://flaky.example/")])
        .await;

    assert!(results[0].is_error());
    assert_eq!(fetcher.fetch_count_for("https://flaky.example/"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_is_bounded_by_worker_count() {
    let mut fetcher = MockFetcher::new().with_delay(Duration::from_millis(20));
    let mut jobs = Vec::new();
    for i in 0..12 {
        let (url, html) = careers_site(&format!("store{}.example", i));
        fetcher = fetcher.with_page(url.clone(), html);
        jobs.push(Job::new(format!("Store {}", i), url));
    }

    let results = pool(3, fetcher.clone()).run(jobs).await;

    assert_eq!(results.len(), 12);
    assert!(fetcher.max_in_flight() <= 3);
    assert!(fetcher.max_in_flight() >= 2, "expected parallel fetches");
}

#[tokio::test(start_paused = true)]
async fn test_jobs_run_in_parallel() {
    let mut fetcher = MockFetcher::new().with_delay(Duration::from_secs(1));
    let mut jobs = Vec::new();
    for i in 0..2 {
        let (url, html) = careers_site(&format!("slow{}.example", i));
        fetcher = fetcher.with_page(url.clone(), html);
        jobs.push(Job::new(format!("Slow {}", i), url));
    }

    let started = tokio::time::Instant::now();
    let results = pool(10, fetcher).run(jobs).await;

    assert_eq!(results.len(), 2);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_site_times_out_without_blocking_others() {
    let fetcher = MockFetcher::new()
        .with_page("https://hang.example/careers", "<p>never arrives</p>")
        .with_delay_for("https://hang.example/careers", Duration::from_secs(3600))
        .with_page("https://fast.example/careers", "<p>Careers</p>");
    let config = PoolConfig::new()
        .with_workers(2)
        .with_fetch_timeout(Duration::from_secs(2));
    let pool = WorkerPool::with_fetcher(config, fetcher).unwrap();

    let results = pool
        .run(vec![
            Job::new("Hang", "https://hang.example/careers"),
            Job::new("Fast", "https://fast.example/careers"),
        ])
        .await;

    let hang = results.iter().find(|r| r.business_name == "Hang").unwrap();
    let fast = results.iter().find(|r| r.business_name == "Fast").unwrap();
    assert!(hang.error.as_ref().unwrap().to_string().contains("timeout"));
    assert!(fast.is_found());
}

#[tokio::test]
async fn test_deeply_nested_page_does_not_take_down_siblings() {
    let depth = 100_000;
    let deep = format!("{}careers{}", "<span>".repeat(depth), "</span>".repeat(depth));
    let fetcher = MockFetcher::new()
        .with_page("https://deep.example/", deep)
        .with_page("https://plain.example/careers", "<p>Careers</p>");

    let results = pool(1, fetcher)
        .run(vec![
            Job::new("Deep", "https://deep.example/"),
            Job::new("Plain", "https://plain.example/careers"),
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_found()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_result_count_matches_job_count(jobs in 0usize..30, workers in 1usize..12) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let fetcher = MockFetcher::new()
            .with_page("https://even.example/careers", "<p>Careers</p>")
            .with_status("https://odd.example/", 500);
        let pool = pool(workers, fetcher);

        let input: Vec<Job> = (0..jobs)
            .map(|i| {
                let url = if i % 2 == 0 { "https://even.example/careers" } else { "https://odd.example/" };
                Job::new(format!("Business {}", i), url)
            })
            .collect();

        let results = runtime.block_on(pool.run(input));

        prop_assert_eq!(results.len(), jobs);
        let ids: HashSet<usize> = results.iter().map(|r| r.job_id).collect();
        prop_assert_eq!(ids.len(), jobs);
        prop_assert_eq!(results.iter().filter(|r| r.is_found()).count(), (jobs + 1) / 2);
    }
}
