//! Site schemas declared in a config file and applied to a harvest

use pdf_trawler::config::parse_config;
use pdf_trawler::{download_pdfs_from_webpage, SchemaRegistry, SortBy};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_toml(dir: &TempDir) -> String {
    format!(
        r#"
[crawler]
recursion-depth = 3
timeout-secs = 5

[output]
write-dir = '{}'

[filter]
filename-exclude = ["*draft*"]

[[schema]]
name = "local_book"
url-pattern = 'http://127\.0\.0\.1:\d+/book/.*'
description = "Chapters of a locally served book"
include-patterns = ["*chapter*"]
exclude-patterns = ["*frontmatter*"]
sort-by = "numeric"
recommended-depth = 0
request-delay-ms = 0

[[schema]]
name = "generic"
url-pattern = '.*'
"#,
        dir.path().join("pdfs").display()
    )
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn pdf() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4\n%%EOF".to_vec(), "application/pdf")
}

#[tokio::test]
async fn test_detected_schema_drives_the_harvest() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount(
        &server,
        "/book/intro",
        ResponseTemplate::new(200).set_body_raw(
            r#"<a href="/files/chapter_10.pdf">10</a>
               <a href="/files/frontmatter_chapter.pdf">Front</a>
               <a href="/files/chapter_2.pdf">2</a>
               <a href="/files/index.pdf">Index</a>
               <a href="/book/next">Next</a>"#,
            "text/html",
        ),
        1,
    )
    .await;
    mount(&server, "/book/next", ResponseTemplate::new(200), 0).await;
    mount(&server, "/files/chapter_2.pdf", pdf(), 1).await;
    mount(&server, "/files/chapter_10.pdf", pdf(), 1).await;
    mount(&server, "/files/frontmatter_chapter.pdf", pdf(), 0).await;
    mount(&server, "/files/index.pdf", pdf(), 0).await;

    let mut config = parse_config(&config_toml(&dir)).unwrap();
    let registry = SchemaRegistry::from_schemas(config.schemas.iter().cloned()).unwrap();
    let seed = format!("{}/book/intro", server.uri());

    let schema = registry.detect(&seed).unwrap();
    assert_eq!(schema.name(), "local_book");
    schema.apply_to(&mut config).unwrap();
    assert_eq!(config.crawler.recursion_depth, 0);
    assert_eq!(config.output.sort_by, SortBy::Numeric);

    let report = download_pdfs_from_webpage(&seed, &config).await.unwrap();

    let out = dir.path().join("pdfs");
    assert_eq!(report.pages_visited, 1);
    assert_eq!(
        report.persisted(),
        vec![&out.join("chapter_2.pdf"), &out.join("chapter_10.pdf")]
    );
}

#[test]
fn test_unmatched_url_falls_through_to_catch_all() {
    let dir = TempDir::new().unwrap();
    let config = parse_config(&config_toml(&dir)).unwrap();
    let registry = SchemaRegistry::from_schemas(config.schemas.iter().cloned()).unwrap();

    assert_eq!(registry.names(), vec!["generic", "local_book"]);
    assert_eq!(
        registry.detect("https://example.com/book/x").unwrap().name(),
        "generic"
    );
}
