//! Conversion entry points: the document-level pipeline.
//!
//! `convert` drives the whole run — extract page text, structure each
//! non-empty page through the generation orchestrator, assemble the XML
//! document — and returns an in-memory [`ConversionOutput`].
//! `convert_to_file` additionally derives the destination path (extension
//! swapped to `.xml`) and writes the document atomically.
//!
//! Pages are processed strictly in source order, one at a time, and chunks
//! within a page are submitted sequentially; the completion endpoint is the
//! bottleneck, and ordering is what keeps the output deterministic in shape.

use crate::client::{CompletionClient, OpenAiCompatClient};
use crate::config::ConversionConfig;
use crate::error::Pdf2XmlError;
use crate::output::{ConversionOutput, ConversionStats, PageResult};
use crate::pipeline::extract::{self, PageText};
use crate::pipeline::generate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file to a structured XML document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `pdf_path` — Local path to a PDF file
/// * `config` — Conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some pages fell back to
/// verbatim wrapping (check `output.stats.fallback_pages`).
///
/// # Errors
/// Returns `Err(Pdf2XmlError)` only for fatal errors:
/// - File not found / permission denied / not a valid PDF
/// - Corrupt PDF
/// - No completion credential configured
pub async fn convert(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2XmlError> {
    let total_start = Instant::now();
    let pdf_path = pdf_path.as_ref();
    info!("Starting conversion: {}", pdf_path.display());

    // ── Step 1: Extract page text ────────────────────────────────────────
    let extract_start = Instant::now();
    let pages = extract::extract_pages(pdf_path).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    let total_pages = pages.len();
    info!("Extracted {} pages in {}ms", total_pages, extract_duration_ms);

    // ── Step 2: Resolve the completion client ────────────────────────────
    let client = resolve_client(config)?;

    // ── Step 3: Structure pages in source order ──────────────────────────
    let llm_start = Instant::now();
    let page_results = process_pages(&client, &pages, config).await;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 4: Assemble the document ────────────────────────────────────
    let xml = assemble_document(&page_results);

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let structured = page_results.iter().filter(|p| !p.fallback).count();
    let fallback = page_results.len() - structured;
    let skipped = total_pages - page_results.len();

    let stats = ConversionStats {
        total_pages,
        structured_pages: structured,
        fallback_pages: fallback,
        skipped_pages: skipped,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
        llm_duration_ms,
    };

    info!(
        "Conversion complete: {} structured, {} fallback, {} skipped, {}ms total",
        structured, fallback, skipped, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        xml,
        pages: page_results,
        stats,
    })
}

/// Convert a PDF and write the XML document next to it.
///
/// The destination is the input path with its extension replaced by `.xml`.
/// The write is atomic (temp file + rename) so a fatal error never leaves a
/// partial document behind.
///
/// Returns the destination path.
pub async fn convert_to_file(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<PathBuf, Pdf2XmlError> {
    let pdf_path = pdf_path.as_ref();
    let output = convert(pdf_path, config).await?;
    let dest = derive_output_path(pdf_path);

    write_atomic(&dest, &output.xml).await?;

    info!("XML document saved to {}", dest.display());
    Ok(dest)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2XmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2XmlError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(pdf_path, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the completion client, most-specific first.
///
/// 1. **Pre-built client** (`config.client`) — the caller constructed and
///    configured the client entirely; used as-is. This is how tests inject
///    stubs and how embedders share a connection pool.
/// 2. **Environment** — an [`OpenAiCompatClient`] built from
///    `PDF2XML_API_KEY` / `OPENAI_API_KEY` / `GROQ_API_KEY` and
///    `PDF2XML_API_BASE`.
fn resolve_client(config: &ConversionConfig) -> Result<Arc<dyn CompletionClient>, Pdf2XmlError> {
    if let Some(ref client) = config.client {
        return Ok(Arc::clone(client));
    }

    let client = OpenAiCompatClient::from_env(
        config.model.clone(),
        config.temperature,
        config.max_tokens,
        config.api_timeout_secs,
    )?;
    Ok(Arc::new(client))
}

/// Structure every non-empty page, in source order.
///
/// Whitespace-only pages are skipped entirely — they contribute no element
/// to the document. A page never fails: the orchestrator falls back to
/// verbatim wrapping on exhaustion.
async fn process_pages(
    client: &Arc<dyn CompletionClient>,
    pages: &[PageText],
    config: &ConversionConfig,
) -> Vec<PageResult> {
    let mut results = Vec::with_capacity(pages.len());

    for page in pages {
        let text = page.text.trim();
        if text.is_empty() {
            debug!("Page {}: empty after trimming, skipped", page.number);
            continue;
        }

        let start = Instant::now();
        let generated = generate::generate_page_xml(client, text, config).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Page {}: {} in {} attempt(s), {}ms",
            page.number,
            if generated.fallback { "fallback" } else { "structured" },
            generated.attempts,
            duration_ms
        );

        results.push(PageResult {
            page_num: page.number as usize,
            xml: generated.xml,
            fallback: generated.fallback,
            attempts: generated.attempts,
            duration_ms,
        });
    }

    results
}

/// Assemble the final XML document from page results.
///
/// Shape:
/// ```text
/// <document>
/// <page number='N'>
/// ...fragment...
/// </page>
/// </document>
/// ```
fn assemble_document(pages: &[PageResult]) -> String {
    let mut doc = String::from("<document>\n");
    for page in pages {
        doc.push_str(&format!(
            "<page number='{}'>\n{}\n</page>\n",
            page.page_num, page.xml
        ));
    }
    doc.push_str("</document>\n");
    doc
}

/// Derive the destination path: input with its extension replaced by `.xml`.
fn derive_output_path(pdf_path: &Path) -> PathBuf {
    pdf_path.with_extension("xml")
}

/// Atomic write: write to a temp sibling, then rename into place.
async fn write_atomic(dest: &Path, content: &str) -> Result<(), Pdf2XmlError> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Pdf2XmlError::OutputWriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = dest.with_extension("xml.tmp");
    tokio::fs::write(&tmp_path, content)
        .await
        .map_err(|e| Pdf2XmlError::OutputWriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, dest)
        .await
        .map_err(|e| Pdf2XmlError::OutputWriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })
}
