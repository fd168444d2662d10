//! Output types: per-page results and whole-run statistics.
//!
//! Everything here is serde-serializable so the CLI's `--json` mode and any
//! embedding application can persist a full conversion record without extra
//! mapping code.

use serde::{Deserialize, Serialize};

/// Result of converting a single non-empty page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number, matching the source PDF index.
    pub page_num: usize,

    /// The page's XML fragment (LLM-structured, or the CDATA fallback form).
    pub xml: String,

    /// True when the fragment is the verbatim fallback wrapping.
    ///
    /// Fallback pages are well-formed but unstructured; downstream consumers
    /// can audit them by this flag or by the `<fallback>` element name.
    pub fallback: bool,

    /// Generation attempts consumed (1 = accepted on the first try).
    pub attempts: u32,

    /// Wall-clock time spent generating this page, in milliseconds.
    pub duration_ms: u64,
}

/// Aggregate statistics for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages accepted with LLM-structured XML.
    pub structured_pages: usize,
    /// Pages that exhausted their retry budget and were wrapped verbatim.
    pub fallback_pages: usize,
    /// Pages whose extracted text was empty and were omitted entirely.
    pub skipped_pages: usize,
    /// Total wall-clock duration, milliseconds.
    pub total_duration_ms: u64,
    /// Time spent extracting text from the PDF, milliseconds.
    pub extract_duration_ms: u64,
    /// Time spent in generation (completion calls, validation, retries),
    /// milliseconds.
    pub llm_duration_ms: u64,
}

/// Full result of a conversion: the assembled document plus per-page detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The complete XML document.
    pub xml: String,
    /// Per-page results, in source page order.
    pub pages: Vec<PageResult>,
    /// Run statistics.
    pub stats: ConversionStats,
}
