//! Per-page text extraction from the source PDF.
//!
//! ## Why spawn_blocking?
//!
//! Parsing a PDF and decoding its content streams is CPU-bound work with no
//! await points. `tokio::task::spawn_blocking` moves it onto the blocking
//! thread pool so the async worker threads are not stalled while a large
//! document is parsed.
//!
//! The `%PDF` magic bytes are validated before parsing so callers get a
//! meaningful error for a mis-named text file rather than a parser failure
//! deep inside the document loader.

use crate::error::Pdf2XmlError;
use lopdf::Document;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One page's extracted plain text.
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-based page number in the source document.
    pub number: u32,
    /// Extracted text, possibly empty.
    pub text: String,
}

/// Extract the text of every page, in source order.
///
/// Pages whose content streams cannot be decoded yield empty text rather
/// than failing the document; the pipeline later skips them like any other
/// empty page.
pub async fn extract_pages(pdf_path: &Path) -> Result<Vec<PageText>, Pdf2XmlError> {
    validate_pdf_file(pdf_path)?;

    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || extract_pages_blocking(&path))
        .await
        .map_err(|e| Pdf2XmlError::Internal(format!("Extraction task panicked: {e}")))?
}

/// Blocking implementation of page-text extraction.
fn extract_pages_blocking(pdf_path: &Path) -> Result<Vec<PageText>, Pdf2XmlError> {
    let doc = Document::load(pdf_path).map_err(|e| Pdf2XmlError::CorruptPdf {
        path: pdf_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();
    info!("PDF loaded: {} pages", page_numbers.len());

    let pages = page_numbers
        .into_iter()
        .map(|number| {
            let text = doc.extract_text(&[number]).unwrap_or_else(|e| {
                warn!("Page {}: text extraction failed: {}", number, e);
                String::new()
            });
            debug!("Page {}: extracted {} bytes", number, text.len());
            PageText { number, text }
        })
        .collect();

    Ok(pages)
}

/// Validate existence, readability, and the `%PDF` magic bytes.
fn validate_pdf_file(path: &Path) -> Result<(), Pdf2XmlError> {
    let path_buf: PathBuf = path.to_path_buf();

    if !path.exists() {
        return Err(Pdf2XmlError::FileNotFound { path: path_buf });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2XmlError::NotAPdf {
                    path: path_buf,
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2XmlError::PermissionDenied { path: path_buf });
        }
        Err(_) => {
            return Err(Pdf2XmlError::FileNotFound { path: path_buf });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(())
}
