//! Completion service client: the single seam between the pipeline and the
//! outside world.
//!
//! The pipeline never talks HTTP directly — it holds an
//! `Arc<dyn CompletionClient>` constructed once and passed down, so tests can
//! substitute a stub and embedders can share one connection pool across
//! conversions. [`OpenAiCompatClient`] is the production implementation,
//! speaking the `POST {base}/chat/completions` wire format that OpenAI, Groq,
//! Ollama, vLLM, and friends all accept.
//!
//! Credentials are sourced from the environment only. There is deliberately
//! no way to pass a key as a plain config field.

use crate::error::{CompletionError, Pdf2XmlError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Environment variables consulted for the API credential, in order.
const API_KEY_VARS: &[&str] = &["PDF2XML_API_KEY", "OPENAI_API_KEY", "GROQ_API_KEY"];

/// Default endpoint when `PDF2XML_API_BASE` is not set.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// A chat-style completion backend.
///
/// One call maps one chunk of page text to one model completion. The trait is
/// object-safe so the pipeline can hold it as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit one system instruction + one user turn, return the raw
    /// completion text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// ── Production client ────────────────────────────────────────────────────

/// Completion client for OpenAI-compatible chat endpoints.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiCompatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The credential never appears in logs.
        f.debug_struct("OpenAiCompatClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatClient {
    /// Build a client from the environment.
    ///
    /// The credential is read from `PDF2XML_API_KEY`, `OPENAI_API_KEY`, or
    /// `GROQ_API_KEY` (first non-empty wins); the endpoint from
    /// `PDF2XML_API_BASE` (default: the OpenAI API). Model, temperature, and
    /// token limit come from the caller because they are conversion
    /// configuration, not environment identity.
    pub fn from_env(
        model: impl Into<String>,
        temperature: f32,
        max_tokens: usize,
        timeout_secs: u64,
    ) -> Result<Self, Pdf2XmlError> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .ok_or_else(|| Pdf2XmlError::ClientNotConfigured {
                hint: format!(
                    "No API credential found in the environment.\n\
                     Set one of: {}.",
                    API_KEY_VARS.join(", ")
                ),
            })?;

        let base_url = std::env::var("PDF2XML_API_BASE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Pdf2XmlError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            model: model.into(),
            temperature,
            max_tokens,
            timeout_secs,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    CompletionError::Transport(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("no choices in response".to_string())
            })?;

        debug!("completion: {} chars", content.len());
        Ok(content)
    }
}
