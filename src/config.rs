//! Configuration types for PDF-to-XML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::client::CompletionClient;
use crate::error::Pdf2XmlError;
use std::fmt;
use std::sync::Arc;

/// Configuration for a PDF-to-XML conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2xml::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .chunk_bytes(2048)
///     .max_attempts(3)
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Maximum UTF-8 byte budget per chunk of page text. Default: 4096.
    ///
    /// Chunks are cut at line boundaries only, so a single line longer than
    /// the budget becomes its own oversized chunk. 4096 bytes keeps each
    /// completion request comfortably inside typical context windows while
    /// giving the model enough surrounding lines to infer structure.
    pub chunk_bytes: usize,

    /// Full generation attempts per page before falling back. Default: 5.
    ///
    /// One attempt is a complete pass over all chunks of the page. Any chunk
    /// call failure, a malformed assembled fragment, or a coverage rejection
    /// each consume one attempt. After the budget is spent the page text is
    /// embedded verbatim in a CDATA fallback element instead.
    pub max_attempts: u32,

    /// Pause between generation attempts, in seconds. Default: 3.
    ///
    /// Rate-limit and overload errors from completion APIs usually clear
    /// within a few seconds; a fixed short pause is enough because the whole
    /// page is re-generated anyway.
    pub retry_delay_secs: u64,

    /// Minimum candidate-to-source byte ratio to accept a page. Default: 0.98.
    ///
    /// A crude proxy for "no content was dropped": XML markup inflates the
    /// candidate, so in practice this gate is lenient, but a model that
    /// summarised or truncated the page falls well below it.
    pub coverage_threshold: f64,

    /// Completion model identifier, e.g. "gpt-4o-mini". Default: "gpt-4o-mini".
    ///
    /// Configuration, not contract: any model reachable through the
    /// configured OpenAI-compatible endpoint works.
    pub model: String,

    /// Sampling temperature for the completion. Default: 0.1.
    ///
    /// Low temperature makes the model deterministic and faithful to the
    /// source text, which is exactly what structuring wants.
    pub temperature: f32,

    /// Maximum tokens the model may generate per chunk. Default: 4096.
    pub max_tokens: usize,

    /// Per-completion-call timeout in seconds. Default: 60.
    ///
    /// A hung connection would otherwise stall the whole sequential pipeline;
    /// a timed-out call just costs one retry attempt.
    pub api_timeout_secs: u64,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Pre-constructed completion client. If None, a client is built from
    /// environment variables at conversion time.
    ///
    /// Injecting a client here is how tests substitute a stub for the real
    /// service, and how embedders share one HTTP pool across conversions.
    pub client: Option<Arc<dyn CompletionClient>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 4096,
            max_attempts: 5,
            retry_delay_secs: 3,
            coverage_threshold: 0.98,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 4096,
            api_timeout_secs: 60,
            system_prompt: None,
            client: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("chunk_bytes", &self.chunk_bytes)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("coverage_threshold", &self.coverage_threshold)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("client", &self.client.as_ref().map(|_| "<dyn CompletionClient>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn chunk_bytes(mut self, bytes: usize) -> Self {
        self.config.chunk_bytes = bytes.max(1);
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n.max(1);
        self
    }

    pub fn retry_delay_secs(mut self, secs: u64) -> Self {
        self.config.retry_delay_secs = secs;
        self
    }

    pub fn coverage_threshold(mut self, ratio: f64) -> Self {
        self.config.coverage_threshold = ratio;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2XmlError> {
        let c = &self.config;
        if c.chunk_bytes == 0 {
            return Err(Pdf2XmlError::InvalidConfig(
                "chunk_bytes must be ≥ 1".into(),
            ));
        }
        if c.max_attempts == 0 {
            return Err(Pdf2XmlError::InvalidConfig(
                "max_attempts must be ≥ 1".into(),
            ));
        }
        if !(c.coverage_threshold > 0.0 && c.coverage_threshold <= 1.0) {
            return Err(Pdf2XmlError::InvalidConfig(format!(
                "coverage_threshold must be in (0, 1], got {}",
                c.coverage_threshold
            )));
        }
        Ok(self.config)
    }
}
