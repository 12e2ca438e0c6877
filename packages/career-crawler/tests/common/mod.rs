//! Shared test harness: a local fixture website served by axum.

#![allow(dead_code)]

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use career_crawler::{HttpFetcher, PoolConfig, WorkerPool};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// A fixture site running on an ephemeral localhost port.
pub struct FixtureSite {
    pub addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl FixtureSite {
    /// Serve `router` until the fixture is dropped.
    pub async fn start(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fixture listener");
        let addr = listener.local_addr().expect("Fixture has no local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Fixture server failed");
        });

        Self { addr, handle }
    }

    /// Absolute URL for `path` on this site.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for FixtureSite {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Acme: root mentions careers and links to a jobs page listing a software role.
pub fn acme_router() -> Router {
    Router::new()
        .route(
            "/",
            get(|| async {
                Html(
                    r#"<html><head><title>Acme</title><script>var jobs = [];</script></head>
                    <body>
                      <h1>Acme Widgets</h1>
                      <p>Careers at Acme are rewarding.</p>
                      <a href="/about">About</a>
                      <a href="/jobs">See open jobs</a>
                    </body></html>"#,
                )
            }),
        )
        .route(
            "/about",
            get(|| async { Html("<h1>About Acme</h1><p>Founded 1952.</p>") }),
        )
        .route(
            "/jobs",
            get(|| async {
                Html(
                    "<h1>Open jobs</h1><p>Software Engineer. Apply now for this position.</p>",
                )
            }),
        )
}

/// A bakery with no careers content at all.
pub fn bakery_router() -> Router {
    Router::new().route(
        "/",
        get(|| async { Html(r#"<h1>Fresh bread</h1><a href="/menu">Menu</a>"#) }),
    )
}

/// A URL on localhost where nothing is listening.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind port");
    let port = listener.local_addr().expect("Port listener has no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

/// Serves `size` bytes of filler text at `/big`.
pub fn large_body_router(size: usize) -> Router {
    let body = "a".repeat(size);
    Router::new().route(
        "/big",
        get(move || {
            let body = body.clone();
            async move { body }
        }),
    )
}

/// Answers `/slow` only after `delay`.
pub fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        "/slow",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Html("<h1>Careers</h1>")
        }),
    )
}

/// An HTTP fetcher that never routes localhost through a proxy.
pub fn http_fetcher(timeout: Duration, max_body_bytes: usize) -> HttpFetcher {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .expect("Failed to build test client");
    HttpFetcher::with_client(client, max_body_bytes)
}

/// An HTTP pool built on [`http_fetcher`].
pub fn http_pool(workers: usize) -> WorkerPool<HttpFetcher> {
    let config = PoolConfig::new()
        .with_workers(workers)
        .with_fetch_timeout(Duration::from_secs(5));
    let fetcher = http_fetcher(config.fetch_timeout, config.max_body_bytes);
    WorkerPool::with_fetcher(config, fetcher).expect("Failed to build pool")
}
