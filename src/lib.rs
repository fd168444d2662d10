//! # pdf2xml
//!
//! Convert PDF documents to structured XML using LLM text structuring.
//!
//! ## Why this crate?
//!
//! Extracted PDF text is flat: headings, paragraphs, and tables all arrive
//! as undifferentiated lines. This crate keeps the cheap, deterministic text
//! extraction and delegates only the *structuring* to an LLM completion
//! endpoint — then refuses to trust it. Every generated page must parse as
//! XML and must retain (by byte ratio) essentially all of the source text,
//! or it is regenerated; a page that exhausts its retry budget is embedded
//! verbatim in a CDATA fallback element so no content is ever lost to a
//! misbehaving model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract   per-page plain text via lopdf (CPU-bound, spawn_blocking)
//!  ├─ 2. Chunk     byte-bounded, line-aligned splitting (default 4 KiB)
//!  ├─ 3. Complete  one chat-completion call per chunk, in order
//!  ├─ 4. Clean     strip ```xml fence artefacts from each completion
//!  ├─ 5. Gate      well-formedness + content-coverage checks, bounded retry
//!  └─ 6. Output    <document> with one <page number='N'> per non-empty page
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2xml::{convert_to_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from PDF2XML_API_KEY / OPENAI_API_KEY / GROQ_API_KEY
//!     let config = ConversionConfig::default();
//!     let dest = convert_to_file("document.pdf", &config).await?;
//!     println!("XML saved to {}", dest.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2xml` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2xml = { version = "0.3", default-features = false }
//! ```
//!
//! ## Trusting the output
//!
//! Structured and fallback pages are distinguishable: fallback pages carry a
//! single `<fallback>` element with a CDATA section, and
//! [`PageResult::fallback`] is set. A consumer that needs full structure can
//! audit `stats.fallback_pages` and re-run just those pages later.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{CompletionClient, OpenAiCompatClient};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync, convert_to_file};
pub use error::{CompletionError, Pdf2XmlError};
pub use output::{ConversionOutput, ConversionStats, PageResult};
