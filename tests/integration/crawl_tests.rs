//! Integration tests for the crawler
//!
//! These tests drive the full crawl cycle end-to-end with an in-memory page
//! driver, and use wiremock for the selector oracle and the document host.

use async_trait::async_trait;
use doc_harvester::config::{BrowserConfig, Config, CrawlerConfig, DownloadConfig, OracleConfig};
use doc_harvester::crawler::run_crawl;
use doc_harvester::driver::{DriverResult, PageDriver};
use doc_harvester::oracle::HttpOracle;
use doc_harvester::output::StopReason;
use doc_harvester::DriverError;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory browser: pages are served from a map, and clicking a known
/// selector appends markup to the current page
#[derive(Default)]
struct FakeDriver {
    pages: HashMap<String, String>,
    broken: HashSet<String>,
    reveals: HashMap<String, String>,
    current_url: Option<String>,
    current_html: String,
    navigations: Vec<String>,
    clicks: Vec<String>,
    close_calls: usize,
}

impl FakeDriver {
    fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    fn reveal(mut self, selector: &str, html: &str) -> Self {
        self.reveals.insert(selector.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    type Element = String;

    async fn navigate(&mut self, url: &str) -> DriverResult<()> {
        if self.close_calls > 0 {
            return Err(DriverError::Closed);
        }
        self.navigations.push(url.to_string());

        if self.broken.contains(url) {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }

        self.current_html = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| "<html><body>Not Found</body></html>".to_string());
        self.current_url = Some(url.to_string());
        Ok(())
    }

    async fn page_source(&self) -> DriverResult<String> {
        Ok(self.current_html.clone())
    }

    async fn current_url(&self) -> DriverResult<String> {
        self.current_url
            .clone()
            .ok_or_else(|| DriverError::Command("No page loaded".to_string()))
    }

    async fn find_first(&self, selector: &str) -> DriverResult<Option<String>> {
        Ok(self
            .reveals
            .contains_key(selector)
            .then(|| selector.to_string()))
    }

    async fn scroll_into_view(&self, _element: &String) -> DriverResult<()> {
        Ok(())
    }

    async fn click(&mut self, element: &String) -> DriverResult<()> {
        self.clicks.push(element.clone());
        if let Some(extra) = self.reveals.get(element) {
            self.current_html = self
                .current_html
                .replace("</body>", &format!("{}</body>", extra));
        }
        Ok(())
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.close_calls += 1;
        Ok(())
    }
}

/// Creates a test configuration rooted at `start_url` writing under `dir`
fn create_test_config(server: &MockServer, start_url: &str, dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url: start_url.to_string(),
            max_pages: 50,
            max_documents: 50,
            document_extension: "pdf".to_string(),
            page_settle_ms: 0,
            click_settle_ms: 0,
            post_click_wait_ms: 0,
        },
        oracle: OracleConfig {
            endpoint: format!("{}/generate_selectors", server.uri()),
            timeout_secs: 5,
            chunk_size: 4500,
            chunk_overlap: 400,
        },
        download: DownloadConfig {
            directory: dir.join("pdfs"),
            timeout_secs: 5,
            audit_log: dir.join("download_log.csv"),
            snapshot_directory: None,
        },
        browser: BrowserConfig::default(),
    }
}

/// Mounts an oracle that always answers with `result_text`
async fn mount_oracle(server: &MockServer, result_text: &str) {
    Mock::given(method("POST"))
        .and(path("/generate_selectors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "result_text": result_text })),
        )
        .mount(server)
        .await;
}

/// Mounts a PDF at `route`, expecting exactly `calls` downloads
async fn mount_pdf(server: &MockServer, route: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.7 test".to_vec()),
        )
        .expect(calls)
        .mount(server)
        .await;
}

fn audit_lines(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("download_log.csv"))
        .expect("audit log exists")
        .lines()
        .map(String::from)
        .collect()
}

fn oracle(config: &Config) -> HttpOracle {
    HttpOracle::from_config(&config.oracle).expect("oracle client builds")
}

#[tokio::test]
async fn test_single_page_with_links_and_document() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, r#"{"selectors": []}"#).await;
    mount_pdf(&server, "/files/report.pdf", 1).await;

    let start = format!("{}/", base);
    let mut driver = FakeDriver::default().page(
        &start,
        r#"<html><body>
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="/files/report.pdf">Report</a>
            <a href="https://elsewhere.example.org/c">Elsewhere</a>
        </body></html>"#,
    );

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &start, dir.path());
    config.crawler.max_pages = 1;
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.documents_downloaded, 1);
    assert_eq!(summary.documents_failed, 0);
    assert_eq!(summary.links_queued, 2);
    assert_eq!(summary.frontier_remaining, 2);
    assert_eq!(summary.stop_reason, StopReason::PageLimit);

    let lines = audit_lines(dir.path());
    assert_eq!(lines.len(), 2, "header plus one record");
    assert!(lines[0].starts_with("documentUrl,sourcePageUrl"));
    assert!(lines[1].starts_with(&format!("{}/files/report.pdf,{},success,", base, start)));

    assert_eq!(
        std::fs::read(dir.path().join("pdfs").join("report.pdf")).unwrap(),
        b"%PDF-1.7 test"
    );
    assert_eq!(driver.close_calls, 1);
}

#[tokio::test]
async fn test_clicked_selector_reveals_document() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, r#"Here you go: {"selectors": ["button#show-files", "a.stale"]}"#).await;
    mount_pdf(&server, "/hidden/title-40.pdf", 1).await;

    let start = format!("{}/", base);
    let mut driver = FakeDriver::default()
        .page(&start, r#"<html><body><button id="show-files">Show</button></body></html>"#)
        .reveal("button#show-files", r#"<a href="/hidden/title-40.pdf">Title 40</a>"#);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &start, dir.path());
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(driver.clicks, vec!["button#show-files"]);
    assert_eq!(summary.selectors_proposed, 2);
    assert_eq!(summary.selectors_clicked, 1);
    assert_eq!(summary.documents_downloaded, 1);
    assert_eq!(summary.stop_reason, StopReason::FrontierExhausted);
    assert!(dir.path().join("pdfs").join("title-40.pdf").exists());
}

#[tokio::test]
async fn test_navigation_failure_abandons_page_only() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, "[]").await;

    let start = format!("{}/", base);
    let broken = format!("{}/broken", base);
    let ok = format!("{}/ok", base);
    let mut driver = FakeDriver::default()
        .page(&start, r#"<html><body><a href="/broken">x</a><a href="/ok">y</a></body></html>"#)
        .page(&ok, r#"<html><body><a href="/">home</a></body></html>"#)
        .broken(&broken);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &start, dir.path());
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.pages_abandoned, 1);
    assert_eq!(summary.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(driver.navigations, vec![start, broken, ok]);
    assert_eq!(driver.close_calls, 1);
}

#[tokio::test]
async fn test_breadth_first_order_without_revisits() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, "[]").await;

    let url = |p: &str| format!("{}{}", base, p);
    let mut driver = FakeDriver::default()
        .page(&url("/"), r#"<html><body><a href="/a">a</a><a href="/b">b</a></body></html>"#)
        .page(&url("/a"), r#"<html><body><a href="/c">c</a><a href="/">home</a></body></html>"#)
        .page(&url("/b"), r#"<html><body><a href="/a">a</a><a href="/d#top">d</a></body></html>"#)
        .page(&url("/c"), "<html><body></body></html>")
        .page(&url("/d"), r#"<html><body><a href="/b">b</a></body></html>"#);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &url("/"), dir.path());
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        driver.navigations,
        vec![url("/"), url("/a"), url("/b"), url("/c"), url("/d")]
    );
    assert_eq!(summary.pages_visited, 5);
    assert_eq!(summary.frontier_remaining, 0);
}

#[tokio::test]
async fn test_start_url_without_path_is_not_revisited() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, "[]").await;

    let home = format!("{}/", base);
    let mut driver = FakeDriver::default()
        .page(&home, r#"<html><body><a href="/">home</a><a href="/about">about</a></body></html>"#)
        .page(&format!("{}/about", base), r#"<html><body><a href="/#top">home</a></body></html>"#);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &format!("{}#intro", base), dir.path());
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(driver.navigations, vec![home, format!("{}/about", base)]);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.links_queued, 1);
    assert_eq!(summary.stop_reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_shared_document_downloaded_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, "[]").await;
    mount_pdf(&server, "/shared.pdf", 1).await;

    let start = format!("{}/", base);
    let second = format!("{}/second", base);
    let mut driver = FakeDriver::default()
        .page(&start, r#"<html><body><a href="/shared.pdf">s</a><a href="/second">2</a></body></html>"#)
        .page(&second, r#"<html><body><a href="/shared.pdf">s</a></body></html>"#);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &start, dir.path());
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.documents_downloaded, 1);
    assert_eq!(audit_lines(dir.path()).len(), 2);
}

#[tokio::test]
async fn test_document_limit_stops_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, "[]").await;
    mount_pdf(&server, "/one.pdf", 1).await;
    mount_pdf(&server, "/two.pdf", 1).await;
    mount_pdf(&server, "/three.pdf", 0).await;

    let start = format!("{}/", base);
    let mut driver = FakeDriver::default().page(
        &start,
        r#"<html><body>
            <a href="/one.pdf">1</a><a href="/two.pdf">2</a><a href="/three.pdf">3</a>
            <a href="/more">more</a>
        </body></html>"#,
    );

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &start, dir.path());
    config.crawler.max_documents = 2;
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.documents_attempted(), 2);
    assert_eq!(summary.stop_reason, StopReason::DocumentLimit);
    assert_eq!(summary.frontier_remaining, 1);
    assert!(!dir.path().join("pdfs").join("three.pdf").exists());
}

#[tokio::test]
async fn test_failed_download_is_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_oracle(&server, "[]").await;
    Mock::given(method("GET"))
        .and(path("/gone.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let start = format!("{}/", base);
    let mut driver =
        FakeDriver::default().page(&start, r#"<html><body><a href="/gone.pdf">x</a></body></html>"#);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &start, dir.path());
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.documents_downloaded, 0);
    assert_eq!(summary.documents_failed, 1);
    assert!(audit_lines(dir.path())[1].contains("failure: HTTP 404"));
}

#[tokio::test]
async fn test_unavailable_oracle_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("POST"))
        .and(path("/generate_selectors"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_pdf(&server, "/doc.pdf", 1).await;

    let start = format!("{}/", base);
    let mut driver =
        FakeDriver::default().page(&start, r#"<html><body><a href="/doc.pdf">x</a></body></html>"#);

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &start, dir.path());
    let oracle = oracle(&config);

    let summary = run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.selectors_proposed, 0);
    assert_eq!(summary.pages_visited, 1);
    assert_eq!(summary.documents_downloaded, 1);
}

#[tokio::test]
async fn test_interrupt_before_start_closes_driver() {
    let server = MockServer::start().await;
    let start = format!("{}/", server.uri());
    let mut driver = FakeDriver::default().page(&start, "<html><body></body></html>");

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &start, dir.path());
    let oracle = oracle(&config);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = run_crawl(config, &mut driver, &oracle, cancel).await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::Interrupted);
    assert_eq!(summary.pages_visited, 0);
    assert_eq!(summary.frontier_remaining, 1);
    assert!(driver.navigations.is_empty());
    assert_eq!(driver.close_calls, 1);
}

#[tokio::test]
async fn test_snapshots_written_when_configured() {
    let server = MockServer::start().await;
    mount_oracle(&server, "[]").await;

    let start = format!("{}/", server.uri());
    let mut driver = FakeDriver::default().page(&start, "<html><body>snapshot me</body></html>");

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &start, dir.path());
    config.download.snapshot_directory = Some(dir.path().join("scraped_pages"));
    let oracle = oracle(&config);

    run_crawl(config, &mut driver, &oracle, CancellationToken::new())
        .await
        .unwrap();

    let snapshots: Vec<_> = std::fs::read_dir(dir.path().join("scraped_pages"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&snapshots[0]).unwrap(),
        "<html><body>snapshot me</body></html>"
    );
}

#[tokio::test]
async fn test_slow_oracle_interrupted_mid_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_selectors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "result_text": "[]" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let start = format!("{}/", server.uri());
    let mut driver = FakeDriver::default().page(
        &start,
        r#"<html><body><a href="/next">n</a></body></html>"#,
    );

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &start, dir.path());
    let oracle = oracle(&config);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let summary = run_crawl(config, &mut driver, &oracle, cancel).await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::Interrupted);
    assert_eq!(summary.pages_visited, 0);
    assert_eq!(summary.pages_abandoned, 0);
    assert_eq!(summary.links_queued, 0);
    assert_eq!(driver.navigations.len(), 1);
    assert_eq!(driver.close_calls, 1);
}
