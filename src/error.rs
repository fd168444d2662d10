//! Error types for the pdf2xml library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2XmlError`] — **Fatal**: the conversion cannot proceed at all
//!   (bad input file, no API credential, destination not writable). Returned
//!   as `Err(Pdf2XmlError)` from the top-level `convert*` functions.
//!
//! * [`CompletionError`] — **Retryable**: a single chunk-completion call
//!   failed (transport error, non-2xx status, malformed response body).
//!   Consumed entirely inside the generation orchestrator's retry loop;
//!   after the attempt budget is spent the page is wrapped verbatim instead.
//!   A `CompletionError` never reaches the caller.
//!
//! The separation keeps the caller-facing contract simple: a run either
//! yields a usable XML document (possibly with fallback-wrapped pages) or a
//! single descriptive fatal error.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2xml library.
///
/// Per-chunk completion failures use [`CompletionError`] and are absorbed by
/// the retry loop rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2XmlError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    // ── Completion service errors ─────────────────────────────────────────
    /// No API credential could be found in the environment.
    #[error("Completion service is not configured.\n{hint}")]
    ClientNotConfigured { hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output XML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A retryable failure from one chunk-completion call.
///
/// Every variant is treated identically by the orchestrator: the current
/// generation attempt is abandoned and one unit of the retry budget is
/// consumed. The distinction exists for logging.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The HTTP request itself failed (connection refused, TLS, DNS).
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body did not contain a usable completion.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    /// The call exceeded the configured per-call timeout.
    #[error("completion call timed out after {secs}s")]
    Timeout { secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = Pdf2XmlError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/missing.pdf"), "got: {msg}");
        assert!(msg.contains("not found"));
    }

    #[test]
    fn not_a_pdf_display_includes_magic() {
        let e = Pdf2XmlError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn client_not_configured_display() {
        let e = Pdf2XmlError::ClientNotConfigured {
            hint: "Set PDF2XML_API_KEY or OPENAI_API_KEY.".into(),
        };
        assert!(e.to_string().contains("PDF2XML_API_KEY"));
    }

    #[test]
    fn completion_api_display() {
        let e = CompletionError::Api {
            status: 429,
            body: "rate limited".into(),
        };
        assert!(e.to_string().contains("429"));
        assert!(e.to_string().contains("rate limited"));
    }

    #[test]
    fn completion_timeout_display() {
        let e = CompletionError::Timeout { secs: 60 };
        assert!(e.to_string().contains("60s"));
    }
}
