//! Crawl and download tests for separate mode
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl, filter and download cycle end-to-end.

use pdf_trawler::config::Config;
use pdf_trawler::crawler::FetchError;
use pdf_trawler::{
    delete_downloaded_pdfs, download_pdfs_from_webpage, process_pdfs, DeleteTarget, FilterConfig,
    FilterStage, HarvestError, ItemError, Outcome,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// A body with a valid PDF signature, padded to `len` bytes
fn pdf(len: usize) -> ResponseTemplate {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(len.max(bytes.len()), b'%');
    ResponseTemplate::new(200).set_body_raw(bytes, "application/pdf")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn test_config(dir: &TempDir, depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.recursion_depth = depth;
    config.crawler.request_delay_ms = 0;
    config.crawler.timeout_secs = 5;
    config.output.write_dir = dir.path().join("pdfs");
    config
}

fn seed(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

#[tokio::test]
async fn test_draft_exclusion_skips_fetch() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(
        &server,
        "/",
        html(r#"<a href="/report_2023.pdf">Report</a>
                <a href="/draft_notes.pdf">Draft</a>
                <a href="/docs">Docs</a>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/docs",
        html(r#"<a href="/annual.pdf">Annual</a><a href="/report_2023.pdf">Again</a>"#),
        1,
    )
    .await;
    mount(&server, "/report_2023.pdf", pdf(2000), 1).await;
    mount(&server, "/annual.pdf", pdf(3000), 1).await;
    mount(&server, "/draft_notes.pdf", pdf(2000), 0).await;

    let mut config = test_config(&dir, 1);
    config.filter = FilterConfig::builder()
        .filename_exclude(["*draft*"])
        .build()
        .unwrap();

    let report = download_pdfs_from_webpage(&seed(&server), &config)
        .await
        .unwrap();

    let out = dir.path().join("pdfs");
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.results.len(), 3);
    assert_eq!(
        report.persisted(),
        vec![&out.join("report_2023.pdf"), &out.join("annual.pdf")]
    );
    assert!(matches!(
        report.results[1].outcome,
        Outcome::FilteredOut(FilterStage::NameOrUrl)
    ));
    assert_eq!(std::fs::read(out.join("annual.pdf")).unwrap().len(), 3000);
}

#[tokio::test]
async fn test_depth_zero_stays_on_seed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(&server, "/", html(r#"<a href="/sub">Sub</a><a href="/a.pdf">A</a>"#), 1).await;
    mount(&server, "/sub", html(r#"<a href="/b.pdf">B</a>"#), 0).await;
    mount(&server, "/a.pdf", pdf(100), 1).await;

    let report = download_pdfs_from_webpage(&seed(&server), &test_config(&dir, 0))
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.persisted().len(), 1);
}

#[tokio::test]
async fn test_link_cycle_visits_each_page_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(
        &server,
        "/",
        html(r#"<a href="/b">B</a><a href="/">Home</a><a href="/x.pdf">X</a>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/b",
        html(r#"<a href="/">Home</a><a href="/b">Self</a><a href="/x.pdf">X</a>"#),
        1,
    )
    .await;
    mount(&server, "/x.pdf", pdf(100), 1).await;

    let report = download_pdfs_from_webpage(&seed(&server), &test_config(&dir, 5))
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.results.len(), 1);
}

#[tokio::test]
async fn test_size_filter_applies_after_download() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(
        &server,
        "/",
        html(r#"<a href="/small.pdf">S</a><a href="/ok.pdf">O</a><a href="/big.pdf">B</a>"#),
        1,
    )
    .await;
    mount(&server, "/small.pdf", pdf(99), 1).await;
    mount(&server, "/ok.pdf", pdf(150), 1).await;
    mount(&server, "/big.pdf", pdf(201), 1).await;

    let mut config = test_config(&dir, 0);
    config.filter = FilterConfig::builder()
        .min_size(100)
        .max_size(200)
        .build()
        .unwrap();

    let report = download_pdfs_from_webpage(&seed(&server), &config)
        .await
        .unwrap();

    let stages: Vec<_> = report
        .results
        .iter()
        .map(|r| match &r.outcome {
            Outcome::FilteredOut(stage) => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(
        stages,
        vec![
            Some(FilterStage::Size { size: 99 }),
            None,
            Some(FilterStage::Size { size: 201 }),
        ]
    );
    assert_eq!(
        report.persisted(),
        vec![&dir.path().join("pdfs").join("ok.pdf")]
    );
}

#[tokio::test]
async fn test_bad_documents_do_not_stop_batch() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(
        &server,
        "/",
        html(r#"<a href="/fake.pdf">F</a><a href="/missing.pdf">M</a><a href="/real.pdf">R</a>"#),
        1,
    )
    .await;
    mount(&server, "/fake.pdf", html("<p>login required</p>"), 1).await;
    mount(&server, "/missing.pdf", ResponseTemplate::new(404), 1).await;
    mount(&server, "/real.pdf", pdf(100), 1).await;

    let report = download_pdfs_from_webpage(&seed(&server), &test_config(&dir, 0))
        .await
        .unwrap();

    assert!(matches!(
        report.results[0].outcome,
        Outcome::Failed(ItemError::Fetch(FetchError::NotPdf))
    ));
    assert!(matches!(
        report.results[1].outcome,
        Outcome::Failed(ItemError::Fetch(FetchError::Status(404)))
    ));
    assert!(report.results[2].outcome.is_persisted());
    assert_eq!(report.failed().count(), 2);
}

#[tokio::test]
async fn test_same_name_from_different_paths() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(
        &server,
        "/",
        html(r#"<a href="/2022/report.pdf">22</a><a href="/2023/report.pdf">23</a>"#),
        1,
    )
    .await;
    mount(&server, "/2022/report.pdf", pdf(100), 1).await;
    mount(&server, "/2023/report.pdf", pdf(200), 1).await;

    let report = download_pdfs_from_webpage(&seed(&server), &test_config(&dir, 0))
        .await
        .unwrap();

    let out = dir.path().join("pdfs");
    assert_eq!(
        report.persisted(),
        vec![&out.join("report.pdf"), &out.join("report_1.pdf")]
    );
    assert_eq!(std::fs::read(out.join("report_1.pdf")).unwrap().len(), 200);
}

#[tokio::test]
async fn test_robots_rules_are_honored() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/"),
        1,
    )
    .await;
    mount(
        &server,
        "/",
        html(r#"<a href="/private/">P</a><a href="/private/secret.pdf">S</a><a href="/open.pdf">O</a>"#),
        1,
    )
    .await;
    mount(&server, "/private/", html(""), 0).await;
    mount(&server, "/private/secret.pdf", pdf(100), 0).await;
    mount(&server, "/open.pdf", pdf(100), 1).await;

    let mut config = test_config(&dir, 1);
    config.crawler.respect_robots = true;

    let report = download_pdfs_from_webpage(&seed(&server), &config)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 1);
    assert!(report.any_persisted());
}

#[tokio::test]
async fn test_process_explicit_urls() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(&server, "/one.pdf", pdf(100), 1).await;
    mount(&server, "/two.pdf", pdf(100), 1).await;

    let urls = vec![
        format!("{}/one.pdf", server.uri()),
        format!("{}/two.pdf", server.uri()),
        format!("{}/one.pdf", server.uri()),
    ];
    let report = process_pdfs(&urls, &test_config(&dir, 0)).await.unwrap();

    assert!(report.seed.is_none());
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.persisted().len(), 2);
}

#[tokio::test]
async fn test_process_keeps_going_past_bad_urls() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(&server, "/good1.pdf", pdf(100), 1).await;
    mount(&server, "/good2.pdf", pdf(100), 1).await;

    let urls = vec![
        format!("{}/good1.pdf", server.uri()),
        "not a url".to_string(),
        format!("{}/good2.pdf", server.uri()),
    ];
    let report = process_pdfs(&urls, &test_config(&dir, 0)).await.unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.persisted().len(), 2);
    let bad: Vec<_> = report.failed().map(|r| r.url.as_str()).collect();
    assert_eq!(bad, vec!["not a url"]);
    assert!(matches!(
        report.results[0].outcome,
        Outcome::Failed(ItemError::InvalidUrl { .. })
    ));
}

#[tokio::test]
async fn test_invalid_seed_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = download_pdfs_from_webpage("not a url", &test_config(&dir, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::Url(_)));
}

#[tokio::test]
async fn test_cleanup_after_harvest() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(&server, "/", html(r#"<a href="/a.pdf">A</a><a href="/b.pdf">B</a>"#), 1).await;
    mount(&server, "/a.pdf", pdf(100), 1).await;
    mount(&server, "/b.pdf", pdf(100), 1).await;

    let config = test_config(&dir, 0);
    let report = download_pdfs_from_webpage(&seed(&server), &config)
        .await
        .unwrap();
    assert_eq!(report.persisted().len(), 2);

    let target = DeleteTarget::Directory(config.output.write_dir.clone());
    let first = delete_downloaded_pdfs(&target);
    assert_eq!(first.deleted.len(), 2);

    let second = delete_downloaded_pdfs(&target);
    assert!(second.deleted.is_empty());
    assert!(second.is_clean());
}
