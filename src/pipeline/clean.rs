//! Cleanup of raw model completions before assembly.
//!
//! ## Why is cleaning necessary?
//!
//! Even well-prompted models occasionally wrap their output in
//! ` ```xml ... ``` ` fences despite the prompt saying not to. The fences are
//! not content; left in place they guarantee a well-formedness rejection and
//! burn a retry attempt on a completion that was otherwise fine.
//!
//! This is a best-effort string normalisation, not a parser: it removes the
//! literal fence markers and surrounding whitespace and returns the inner
//! content untouched. Structural problems are the validator's job.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:xml)?\s*\n(.*?)\n?```\s*$").unwrap());

/// Strip fenced-code markers from a raw completion.
///
/// A completion wrapped entirely in one ` ```xml ` fence pair is unwrapped;
/// otherwise any stray literal markers are removed in place. The result is
/// trimmed of surrounding whitespace either way.
pub fn clean_completion(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(caps) = RE_OUTER_FENCES.captures(trimmed) {
        return caps[1].trim().to_string();
    }
    trimmed.replace("```xml", "").replace("```", "").trim().to_string()
}
