//! System prompt for LLM-based text structuring.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the default behaviour (e.g.
//!    tightening the no-commentary rule or adjusting table handling) requires
//!    editing exactly one place.
//!
//! 2. **Testability** — unit tests can import and inspect the prompt directly
//!    without calling a real model, making prompt regressions easy to catch.
//!
//! Callers can override the default via
//! [`crate::config::ConversionConfig::system_prompt`]; the constant here is
//! used only when no override is provided.

/// Default system instruction sent with every chunk of page text.
///
/// This prompt is used when `ConversionConfig::system_prompt` is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert document structurer. Your task is to convert a chunk of plain text extracted from a PDF page into structured XML.

Follow these rules precisely:

1. TEXT PRESERVATION
   - Preserve ALL text, symbols, emojis, and special formatting completely
   - Do not omit any content or modify text formatting
   - Keep the original reading order

2. STRUCTURE
   - Express the hierarchy with elements for headers, paragraphs, and tables
   - Nest elements to match the document structure
   - Keep table rows and cells aligned with the source

3. OUTPUT FORMAT
   - Output ONLY an XML fragment (no XML declaration, no document root)
   - Do NOT wrap the output in ```xml fences
   - Do NOT add commentary or explanations"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_demands_preservation_and_bans_fences() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("Preserve ALL text"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("```xml"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("tables"));
    }
}
