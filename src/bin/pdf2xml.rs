//! CLI binary for pdf2xml.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2xml::{convert, convert_to_file, ConversionConfig};
use std::path::PathBuf;
use std::io;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes document.xml next to the input)
  pdf2xml document.pdf

  # Convert to an explicit output path
  pdf2xml document.pdf -o out/report.xml

  # Use a specific model
  pdf2xml --model gpt-4o document.pdf

  # Groq endpoint (OpenAI-compatible)
  PDF2XML_API_BASE=https://api.groq.com/openai/v1 \
  PDF2XML_API_KEY=$GROQ_API_KEY \
  pdf2xml --model qwen-2.5-32b document.pdf

  # Structured JSON record (document + per-page detail + stats)
  pdf2xml --json document.pdf > run.json

  # Smaller chunks and a tighter retry budget
  pdf2xml --chunk-bytes 2048 --max-attempts 3 document.pdf

ENVIRONMENT VARIABLES:
  PDF2XML_API_KEY    API credential (first choice)
  OPENAI_API_KEY     API credential (fallback)
  GROQ_API_KEY       API credential (fallback)
  PDF2XML_API_BASE   OpenAI-compatible endpoint base URL
                     (default: https://api.openai.com/v1)

OUTPUT:
  <document>
  <page number='N'>
  ...structured fragment, or <fallback><![CDATA[...]]></fallback>...
  </page>
  </document>

  Pages whose extracted text is empty are omitted. Pages that exhaust the
  retry budget are embedded verbatim under <fallback> — grep for it to audit
  which pages the model could not structure.
"#;

/// Convert PDF files to structured XML using LLM text structuring.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2xml",
    version,
    about = "Convert PDF files to structured XML using LLM text structuring",
    long_about = "Convert PDF documents to structured XML. Page text is extracted locally, \
structured by an OpenAI-compatible chat-completion endpoint, validated for well-formedness \
and content coverage, and retried on failure; pages the model cannot structure are embedded \
verbatim so no content is ever lost.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write XML to this file instead of replacing the input's extension.
    #[arg(short, long, env = "PDF2XML_OUTPUT")]
    output: Option<PathBuf>,

    /// Completion model ID (e.g. gpt-4o-mini, qwen-2.5-32b).
    #[arg(long, env = "PDF2XML_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Chunk budget in UTF-8 bytes of page text.
    #[arg(long, env = "PDF2XML_CHUNK_BYTES", default_value_t = 4096)]
    chunk_bytes: usize,

    /// Full generation attempts per page before falling back.
    #[arg(long, env = "PDF2XML_MAX_ATTEMPTS", default_value_t = 5)]
    max_attempts: u32,

    /// Pause between attempts, in seconds.
    #[arg(long, env = "PDF2XML_RETRY_DELAY", default_value_t = 3)]
    retry_delay: u64,

    /// Minimum candidate-to-source byte ratio to accept a page.
    #[arg(long, env = "PDF2XML_COVERAGE_THRESHOLD", default_value_t = 0.98)]
    coverage_threshold: f64,

    /// Per-completion-call timeout in seconds.
    #[arg(long, env = "PDF2XML_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Max tokens the model may generate per chunk.
    #[arg(long, env = "PDF2XML_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2XML_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "PDF2XML_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Output a structured JSON record instead of writing the XML file.
    #[arg(long, env = "PDF2XML_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2XML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2XML_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli).await?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.json {
        let output = convert(&cli.input, &config)
            .await
            .context("PDF processing failed")?;
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    let dest = if let Some(ref output_path) = cli.output {
        let output = convert(&cli.input, &config)
            .await
            .context("PDF processing failed")?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create output directory {}", parent.display())
                })?;
            }
        }
        tokio::fs::write(output_path, &output.xml)
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        print_summary(&cli, &output.stats);
        output_path.clone()
    } else {
        convert_to_file(&cli.input, &config)
            .await
            .context("PDF processing failed")?
    };

    println!("{}", dest.display());
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .chunk_bytes(cli.chunk_bytes)
        .max_attempts(cli.max_attempts)
        .retry_delay_secs(cli.retry_delay)
        .coverage_threshold(cli.coverage_threshold)
        .model(cli.model.clone())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {}", path.display()))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

/// One-line run summary on stderr.
fn print_summary(cli: &Cli, stats: &pdf2xml::ConversionStats) {
    if cli.quiet {
        return;
    }
    eprintln!(
        "{} structured, {} fallback, {} skipped of {} pages — {}ms",
        stats.structured_pages,
        stats.fallback_pages,
        stats.skipped_pages,
        stats.total_pages,
        stats.total_duration_ms,
    );
}
