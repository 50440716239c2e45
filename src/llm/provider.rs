//! Core `LlmProvider` trait and the provider error types.
//!
//! A provider turns one prompt into one block of raw text.  It holds only its
//! endpoint and credentials, so a single instance is shared by every
//! concurrent attempt.

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Why a single provider call failed.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The provider answered with a non-success status code.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// The URL is dropped from the message; query strings can carry credentials.
impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.without_url().to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// A failed call, tagged with the provider that made it.
#[derive(Debug, Error)]
#[error("{provider}: {cause}")]
pub struct ProviderError {
    pub provider: String,
    #[source]
    pub cause: LlmError,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, cause: LlmError) -> Self {
        Self {
            provider: provider.into(),
            cause,
        }
    }
}

// ---------------------------------------------------------------------------
// GenerateOptions
// ---------------------------------------------------------------------------

/// Per-call knobs passed to [`LlmProvider::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Ask for JSON-object output where the provider supports it.
    pub json_output: bool,
}

impl GenerateOptions {
    /// JSON-object output with the given token budget.
    pub fn json(max_output_tokens: u32) -> Self {
        Self {
            max_output_tokens,
            json_output: true,
        }
    }

    /// Free-form text output with the given token budget.
    pub fn text(max_output_tokens: u32) -> Self {
        Self {
            max_output_tokens,
            json_output: false,
        }
    }
}

// ---------------------------------------------------------------------------
// LlmProvider trait
// ---------------------------------------------------------------------------

/// Async trait for language-model text generation.
///
/// Implementors must be `Send + Sync` so they can be shared across
/// concurrent attempts behind an `Arc<dyn LlmProvider>`.  One call is one
/// attempt; implementations never retry internally.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name used in logs and error messages.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, options: GenerateOptions)
        -> Result<String, ProviderError>;
}
