//! Integration tests for the full conversion pipeline.
//!
//! These tests build real (minimal) PDF files with lopdf and inject stub
//! completion clients through the config, so the whole path — magic-byte
//! validation, extraction, chunking, generation, gating, assembly, file
//! output — runs without any network access or API key.

use async_trait::async_trait;
use pdf2xml::pipeline::validate::is_well_formed;
use pdf2xml::{CompletionClient, CompletionError, ConversionConfig, Pdf2XmlError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ── Test PDFs ────────────────────────────────────────────────────────────

/// Build a PDF at `dir/name` with one page per entry; `""` produces a page
/// with an empty content stream.
fn build_pdf(dir: &Path, name: &str, page_texts: &[&str]) -> PathBuf {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let mut operations = Vec::new();
        if !text.is_empty() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![100.into(), 600.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(*text)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("save test PDF");
    path
}

// ── Stub clients ─────────────────────────────────────────────────────────

/// Returns the same completion for every chunk.
struct FixedClient(&'static str);

#[async_trait]
impl CompletionClient for FixedClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        Ok(self.0.to_string())
    }
}

/// Fails every call.
struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        Err(CompletionError::Api {
            status: 503,
            body: "service unavailable".into(),
        })
    }
}

/// Echoes each chunk wrapped in a paragraph element.
struct EchoClient;

#[async_trait]
impl CompletionClient for EchoClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, CompletionError> {
        Ok(format!("<p>{user}</p>"))
    }
}

fn config_with(client: Arc<dyn CompletionClient>) -> ConversionConfig {
    ConversionConfig::builder()
        .retry_delay_secs(0)
        .client(client)
        .build()
        .expect("valid config")
}

// ── Conversion tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn converts_single_page_document() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = build_pdf(dir.path(), "hello.pdf", &["Hello World!"]);

    let config = config_with(Arc::new(FixedClient("<p>Hello World!</p>")));
    let output = pdf2xml::convert(&pdf, &config).await.expect("conversion");

    assert!(output.xml.starts_with("<document>\n"));
    assert!(output.xml.ends_with("</document>\n"));
    assert!(output.xml.contains("<page number='1'>"));
    assert!(output.xml.contains("<p>Hello World!</p>"));

    assert_eq!(output.stats.total_pages, 1);
    assert_eq!(output.stats.structured_pages, 1);
    assert_eq!(output.stats.fallback_pages, 0);
    assert_eq!(output.stats.skipped_pages, 0);

    assert_eq!(output.pages.len(), 1);
    assert_eq!(output.pages[0].page_num, 1);
    assert!(!output.pages[0].fallback);
    assert_eq!(output.pages[0].attempts, 1);
}

#[tokio::test]
async fn convert_to_file_derives_xml_path() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = build_pdf(dir.path(), "report.pdf", &["Quarterly figures"]);

    let config = config_with(Arc::new(FixedClient("<p>Quarterly figures</p>")));
    let dest = pdf2xml::convert_to_file(&pdf, &config)
        .await
        .expect("conversion");

    assert_eq!(dest, dir.path().join("report.xml"));

    let written = std::fs::read_to_string(&dest).expect("read output");
    assert!(written.contains("<page number='1'>"));
    assert!(written.contains("<p>Quarterly figures</p>"));

    // The whole document must itself be well-formed XML.
    assert!(is_well_formed(&written));
}

#[tokio::test]
async fn empty_page_is_omitted_from_output() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = build_pdf(
        dir.path(),
        "gaps.pdf",
        &["First page text", "", "Third page text"],
    );

    let config = config_with(Arc::new(EchoClient));
    let output = pdf2xml::convert(&pdf, &config).await.expect("conversion");

    assert!(output.xml.contains("<page number='1'>"));
    assert!(!output.xml.contains("<page number='2'>"));
    assert!(output.xml.contains("<page number='3'>"));

    assert_eq!(output.stats.total_pages, 3);
    assert_eq!(output.stats.skipped_pages, 1);
    assert_eq!(
        output.pages.iter().map(|p| p.page_num).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[tokio::test]
async fn failing_service_exhausts_into_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = build_pdf(dir.path(), "unlucky.pdf", &["Content the model never sees"]);

    let config = ConversionConfig::builder()
        .retry_delay_secs(0)
        .max_attempts(3)
        .client(Arc::new(FailingClient))
        .build()
        .unwrap();

    let output = pdf2xml::convert(&pdf, &config).await.expect("conversion");

    assert_eq!(output.stats.fallback_pages, 1);
    assert_eq!(output.stats.structured_pages, 0);

    let page = &output.pages[0];
    assert!(page.fallback);
    assert_eq!(page.attempts, 3);
    assert!(page.xml.starts_with("<fallback>"));
    assert!(page.xml.contains("Content the model never sees"));
    assert!(is_well_formed(&page.xml));

    // The assembled document is still well-formed despite the fallback.
    assert!(output.xml.contains("<page number='1'>"));
}

#[tokio::test]
async fn invalid_completions_exhaust_into_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = build_pdf(dir.path(), "garbled.pdf", &["Some page content here"]);

    let config = ConversionConfig::builder()
        .retry_delay_secs(0)
        .max_attempts(2)
        .client(Arc::new(FixedClient("<p>never closed")))
        .build()
        .unwrap();

    let output = pdf2xml::convert(&pdf, &config).await.expect("conversion");

    assert_eq!(output.stats.fallback_pages, 1);
    assert!(output.pages[0].fallback);
    assert!(output.pages[0].xml.contains("Some page content"));
}

// ── Fatal-error tests ────────────────────────────────────────────────────

#[tokio::test]
async fn missing_file_is_fatal() {
    let config = config_with(Arc::new(FixedClient("<p>unused</p>")));
    let err = pdf2xml::convert("/definitely/not/a/real/file.pdf", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, Pdf2XmlError::FileNotFound { .. }), "{err}");
}

#[tokio::test]
async fn non_pdf_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letter.pdf");
    std::fs::write(&path, "Dear reader,\nthis is not a PDF.\n").unwrap();

    let config = config_with(Arc::new(FixedClient("<p>unused</p>")));
    let err = pdf2xml::convert(&path, &config).await.unwrap_err();
    assert!(matches!(err, Pdf2XmlError::NotAPdf { .. }), "{err}");
}

#[tokio::test]
async fn corrupt_pdf_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    // Valid magic, garbage body.
    std::fs::write(&path, b"%PDF-1.5\nnot actually a pdf body").unwrap();

    let config = config_with(Arc::new(FixedClient("<p>unused</p>")));
    let err = pdf2xml::convert(&path, &config).await.unwrap_err();
    assert!(matches!(err, Pdf2XmlError::CorruptPdf { .. }), "{err}");
}

// ── Sync wrapper ─────────────────────────────────────────────────────────

#[test]
fn convert_sync_runs_without_a_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = build_pdf(dir.path(), "sync.pdf", &["Synchronous caller"]);

    let config = config_with(Arc::new(FixedClient("<p>Synchronous caller</p>")));
    let output = pdf2xml::convert_sync(&pdf, &config).expect("conversion");

    assert!(output.xml.contains("<p>Synchronous caller</p>"));
}
