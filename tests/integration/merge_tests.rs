//! Merge mode tests
//!
//! Test documents are generated with lopdf; each page's MediaBox width is
//! used as a marker to check page order in the merged output.

use lopdf::{Dictionary, Document, Object};
use pdf_trawler::config::{Config, OutputMode, SortBy};
use pdf_trawler::merge::MergeError;
use pdf_trawler::{download_pdfs_from_webpage, merge_pdfs, ItemError, Outcome};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pdf_with_pages(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for width in widths {
        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(*width),
                Object::Integer(100),
            ]),
        );
        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(kids.len() as i64));
    pages.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                .as_i64()
                .unwrap()
        })
        .collect()
}

async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn pdf_response(bytes: Vec<u8>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(bytes, "application/pdf")
}

fn merge_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.recursion_depth = 0;
    config.crawler.request_delay_ms = 0;
    config.crawler.concurrency = 4;
    config.output.write_dir = dir.path().to_path_buf();
    config.output.mode = OutputMode::Merge;
    config
}

#[tokio::test]
async fn test_merge_mode_end_to_end() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    serve(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_raw(
            r#"<a href="/ch3.pdf">3</a><a href="/ch1.pdf">1</a>
               <a href="/broken.pdf">X</a><a href="/ch2.pdf">2</a>"#,
            "text/html",
        ),
    )
    .await;
    serve(&server, "/ch1.pdf", pdf_response(pdf_with_pages(&[101, 111]))).await;
    serve(&server, "/ch2.pdf", pdf_response(pdf_with_pages(&[102]))).await;
    serve(&server, "/ch3.pdf", pdf_response(pdf_with_pages(&[103]))).await;
    serve(
        &server,
        "/broken.pdf",
        pdf_response(b"%PDF-1.4\nthis is not really a pdf".to_vec()),
    )
    .await;

    let mut config = merge_config(&dir);
    config.output.sort_by = SortBy::Numeric;
    config.output.output_name = "thesis.pdf".to_string();

    let report = download_pdfs_from_webpage(&format!("{}/", server.uri()), &config)
        .await
        .unwrap();

    let merge = report.merge.as_ref().unwrap();
    let output = merge.output_path.clone().unwrap();
    assert_eq!(output, dir.path().join("thesis.pdf"));
    assert_eq!(widths(&output), vec![101, 111, 102, 103]);
    assert_eq!(merge.included.len(), 3);
    assert_eq!(merge.skipped.len(), 1);
    assert!(report.any_persisted());
    assert!(report.persisted().is_empty());

    let broken = report
        .results
        .iter()
        .find(|r| r.url.ends_with("/broken.pdf"))
        .unwrap();
    assert!(matches!(
        broken.outcome,
        Outcome::Failed(ItemError::NotMerged { .. })
    ));
    assert_eq!(report.merged().count(), 3);

    // Staging directory is gone; only the merged file remains
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("thesis.pdf")]);
}

#[test]
fn test_merge_pdfs_preserves_source_order() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&a, pdf_with_pages(&[10, 11])).unwrap();
    std::fs::write(&b, pdf_with_pages(&[20])).unwrap();
    std::fs::write(&bad, b"garbage").unwrap();

    let output = dir.path().join("out.pdf");
    let outcome = merge_pdfs(&[b.clone(), bad.clone(), a.clone()], &output).unwrap();

    assert_eq!(widths(&output), vec![20, 10, 11]);
    assert_eq!(outcome.included, vec![b, a]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].0, bad);
}

#[test]
fn test_merge_pdfs_with_no_valid_sources() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&bad, b"%PDF-1.4\nnope").unwrap();

    let output = dir.path().join("out.pdf");
    let result = merge_pdfs(&[bad], &output);

    assert!(matches!(result, Err(MergeError::NoValidSources { .. })));
    assert!(!output.exists());
}
