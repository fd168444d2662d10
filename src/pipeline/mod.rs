//! Pipeline stages for PDF-to-XML conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ chunk ──▶ complete ──▶ clean ──▶ assemble ──▶ gate ──▶ accept
//! (lopdf)    (bytes)    (LLM API)   (fences)  (join "\n")  (validate
//!                                                           + coverage)
//!                                                              │ reject
//!                                                              ▼
//!                                                       retry ▸ fallback
//! ```
//!
//! 1. [`extract`]  — per-page plain text from the PDF; runs in
//!    `spawn_blocking` because parsing is CPU-bound
//! 2. [`chunk`]    — byte-bounded, line-aligned splitting of page text
//! 3. [`clean`]    — strip fence artefacts from each model completion
//! 4. [`validate`] — well-formedness and content-coverage gates for the
//!    assembled candidate
//! 5. [`fallback`] — verbatim CDATA wrapping when generation cannot be
//!    trusted
//! 6. [`generate`] — the per-page orchestrator driving 2–5 with a bounded
//!    retry budget; the only stage with network I/O

pub mod chunk;
pub mod clean;
pub mod extract;
pub mod fallback;
pub mod generate;
pub mod validate;
