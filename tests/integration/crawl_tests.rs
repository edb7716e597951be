//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use shoal::config::{Config, CrawlerConfig, OutputConfig, TerminationPolicy, UserAgentConfig};
use shoal::crawler::{run_crawl, Coordinator, SequenceSource};
use shoal::storage::{ArtifactStore, FsStore};
use shoal::url::{derive_filename, ArtifactKind};
use shoal::{ShoalError, UrlError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay and a short idle wait
fn create_test_config(root: &Path, workers: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers,
            base_delay: 0.0,
            request_timeout: 2_000,
            dequeue_wait: 100,
            termination: TerminationPolicy::Quiescent,
        },
        user_agent: UserAgentConfig {
            pool: vec!["TestBot/1.0".to_string()],
        },
        output: OutputConfig {
            root: root.to_path_buf(),
        },
    }
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_only_same_host_links_followed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="http://other.test/c">Elsewhere</a>
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/a", "<p>A page</p>").await;
    mount_page(&server, "/b", "<p>B page</p>").await;

    let report = run_crawl(&server.uri(), create_test_config(dir.path(), 2))
        .await
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.discovered, 3);
}

#[tokio::test]
async fn test_single_worker_three_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/one">1</a> <a href="/two">2</a>"#).await;
    mount_page(&server, "/one", "<p>one</p>").await;
    mount_page(&server, "/two", "<p>two</p>").await;

    let report = run_crawl(&server.uri(), create_test_config(dir.path(), 1))
        .await
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(count_files(&report.html_dir), 3);
    assert_eq!(count_files(&report.text_dir), 3);
    assert_eq!(report.html_dir, dir.path().join("html"));
    assert_eq!(report.text_dir, dir.path().join("text"));
}

#[tokio::test]
async fn test_timed_out_fetch_counts_as_failed_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/slow">slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late</p>").set_delay(Duration::from_secs(3)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(dir.path(), 2);
    config.crawler.request_timeout = 300;

    let report = run_crawl(&server.uri(), config).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(count_files(&report.html_dir), 1);
}

#[tokio::test]
async fn test_error_status_counts_as_failed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/missing">gone</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_crawl(&server.uri(), create_test_config(dir.path(), 2))
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn test_non_html_is_processed_without_artifacts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/data">data</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_crawl(&server.uri(), create_test_config(dir.path(), 2))
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(count_files(&report.html_dir), 1);
    assert_eq!(count_files(&report.text_dir), 1);
}

#[tokio::test]
async fn test_artifacts_contain_markup_and_text() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let page = r#"<html><head><title>Title</title><script>var hidden = 1;</script></head>
<body><h1>Welcome</h1><p>Hello world</p></body></html>"#;
    mount_page(&server, "/", page).await;

    let seed = format!("{}/", server.uri());
    let report = run_crawl(&seed, create_test_config(dir.path(), 1))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(
        report.html_dir.join(derive_filename(&seed, ArtifactKind::Html)),
    )
    .unwrap();
    assert_eq!(raw, page);

    let text = std::fs::read_to_string(
        report.text_dir.join(derive_filename(&seed, ArtifactKind::Text)),
    )
    .unwrap();
    assert_eq!(text, "Welcome\nHello world");
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/a">a</a><a href="/a">again</a><a href="/">home</a>"#,
    )
    .await;
    mount_page(&server, "/a", r#"<a href="/">home</a><a href="/a">self</a>"#).await;

    let report = run_crawl(&server.uri(), create_test_config(dir.path(), 3))
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.discovered, 2);
}

#[tokio::test]
async fn test_excluded_extensions_not_fetched() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<a href="/report.pdf">pdf</a><a href="/logo.PNG">logo</a><a href="/page">page</a>"#,
    )
    .await;
    mount_page(&server, "/page", "<p>page</p>").await;

    let report = run_crawl(&server.uri(), create_test_config(dir.path(), 2))
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.discovered, 2);
}

#[tokio::test]
async fn test_long_chain_completes_with_many_workers() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Each page only links to the next, so most workers sit idle while
    // one is fetching
    let last = 15;
    for i in 0..last {
        mount_page(
            &server,
            &format!("/p{}", i),
            &format!(r#"<a href="/p{}">next</a>"#, i + 1),
        )
        .await;
    }
    mount_page(&server, &format!("/p{}", last), "<p>end</p>").await;

    let seed = format!("{}/p0", server.uri());
    let report = run_crawl(&seed, create_test_config(dir.path(), 5))
        .await
        .unwrap();

    assert_eq!(report.processed, (last + 1) as u64);
    assert_eq!(report.failed, 0);
    assert_eq!(count_files(&report.text_dir), last + 1);
}

#[tokio::test]
async fn test_pending_empty_policy_single_worker() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/first">first</a>"#).await;
    mount_page(&server, "/first", r#"<a href="/second">second</a>"#).await;
    mount_page(&server, "/second", "<p>last</p>").await;

    let mut config = create_test_config(dir.path(), 1);
    config.crawler.termination = TerminationPolicy::PendingEmpty;

    let report = run_crawl(&server.uri(), config).await.unwrap();

    // A lone worker only goes idle between pages, after its links are queued
    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(count_files(&report.text_dir), 3);
}

#[tokio::test]
async fn test_request_headers() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/1.0"))
        .and(header("accept-language", "en-US,en;q=0.9"))
        .respond_with(html("<p>ok</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_crawl(&server.uri(), create_test_config(dir.path(), 1))
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
}

#[tokio::test]
async fn test_coordinator_with_injected_parts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/", r#"<a href="/next">next</a>"#).await;
    mount_page(&server, "/next", "<p>done</p>").await;

    let mut config = create_test_config(dir.path(), 2);
    config.crawler.base_delay = 0.01;
    let store: Arc<dyn ArtifactStore> = Arc::new(FsStore::new(dir.path()).unwrap());
    let seed = url::Url::parse(&server.uri()).unwrap();

    let coordinator = Coordinator::from_parts(
        seed,
        config,
        store,
        Box::new(SequenceSource::constant(0.0)),
    )
    .unwrap();
    let frontier = Arc::clone(coordinator.frontier());

    let report = coordinator.run().await.unwrap();

    assert_eq!(report.processed, 2);
    let stats = frontier.stats();
    assert_eq!(stats.queued, 0);
    assert_eq!(stats.in_flight, 0);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("out");

    let result = run_crawl("not a url", create_test_config(&root, 1)).await;

    assert!(matches!(
        result,
        Err(ShoalError::Url(UrlError::InvalidSeed { .. }))
    ));
    assert!(!root.exists());
}
