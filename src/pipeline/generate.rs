//! Per-page generation orchestrator: chunk, complete, assemble, gate, retry.
//!
//! This is the only stage with network I/O. It never fails outward: a page
//! either yields accepted structured XML or, after the retry budget is
//! spent, the verbatim fallback wrapping. Transient service errors,
//! malformed candidates, and coverage rejections are all the same event —
//! one consumed attempt.
//!
//! ## Retry Strategy
//!
//! Rate-limit and overload errors from completion APIs usually clear within
//! seconds, and a rejected candidate is non-deterministic — the same chunks
//! often validate on the next pass. A fixed short pause between attempts is
//! enough; there is no exponential backoff because the whole page is
//! regenerated each time and the attempt budget is small.

use crate::client::CompletionClient;
use crate::config::ConversionConfig;
use crate::error::CompletionError;
use crate::pipeline::chunk::split_chunks;
use crate::pipeline::clean::clean_completion;
use crate::pipeline::fallback::wrap_verbatim;
use crate::pipeline::validate::{content_missing, is_well_formed};
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use std::fmt;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// The orchestrator's verdict for one page.
#[derive(Debug, Clone)]
pub struct PageXml {
    /// The fragment to embed in the page element.
    pub xml: String,
    /// True when the fragment is the verbatim fallback wrapping.
    pub fallback: bool,
    /// Attempts consumed (1 = accepted on the first pass).
    pub attempts: u32,
}

/// Outcome of one full pass over a page's chunks.
///
/// An explicit result tag, inspected by the retry loop, rather than an
/// exception channel: the loop reads *what* happened, logging reads *why*.
enum AttemptOutcome {
    Accepted(String),
    Retry(RejectReason),
}

enum RejectReason {
    ChunkFailed(CompletionError),
    Malformed,
    ContentMissing,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ChunkFailed(e) => write!(f, "chunk completion failed: {e}"),
            RejectReason::Malformed => write!(f, "candidate is not well-formed XML"),
            RejectReason::ContentMissing => write!(f, "candidate fails the coverage gate"),
        }
    }
}

/// Produce the XML fragment for one page. Never fails.
///
/// Chunks are submitted strictly in order, one at a time; the candidate is
/// judged as a whole against the full original page text. On exhaustion the
/// page text is wrapped verbatim instead.
pub async fn generate_page_xml(
    client: &Arc<dyn CompletionClient>,
    page_text: &str,
    config: &ConversionConfig,
) -> PageXml {
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    for attempt in 1..=config.max_attempts {
        match run_attempt(client, page_text, system_prompt, config).await {
            AttemptOutcome::Accepted(xml) => {
                debug!("page accepted on attempt {}/{}", attempt, config.max_attempts);
                return PageXml {
                    xml,
                    fallback: false,
                    attempts: attempt,
                };
            }
            AttemptOutcome::Retry(reason) => {
                warn!(
                    "attempt {}/{} rejected: {}",
                    attempt, config.max_attempts, reason
                );
                if attempt < config.max_attempts {
                    sleep(Duration::from_secs(config.retry_delay_secs)).await;
                }
            }
        }
    }

    warn!(
        "retry budget exhausted after {} attempts, wrapping page verbatim",
        config.max_attempts
    );
    PageXml {
        xml: wrap_verbatim(page_text),
        fallback: true,
        attempts: config.max_attempts,
    }
}

/// One full pass: submit every chunk, clean, assemble, gate.
async fn run_attempt(
    client: &Arc<dyn CompletionClient>,
    page_text: &str,
    system_prompt: &str,
    config: &ConversionConfig,
) -> AttemptOutcome {
    let chunks = split_chunks(page_text, config.chunk_bytes);
    let mut parts = Vec::with_capacity(chunks.len());

    for chunk in &chunks {
        match client.complete(system_prompt, chunk).await {
            Ok(raw) => parts.push(clean_completion(&raw)),
            Err(e) => return AttemptOutcome::Retry(RejectReason::ChunkFailed(e)),
        }
    }

    let candidate = parts.join("\n");

    if !is_well_formed(&candidate) {
        return AttemptOutcome::Retry(RejectReason::Malformed);
    }
    if content_missing(page_text, &candidate, config.coverage_threshold) {
        return AttemptOutcome::Retry(RejectReason::ContentMissing);
    }

    AttemptOutcome::Accepted(candidate)
}
