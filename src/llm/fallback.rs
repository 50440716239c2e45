//! Failover invoker — primary provider first, fallback only on failure.
//!
//! [`FailoverInvoker`] makes exactly one call to the primary provider.  When
//! that call fails for any reason (transport, timeout, status, empty body)
//! it makes exactly one call to the fallback.  When both fail the caller gets
//! a [`DualProviderError`] carrying both causes.  There is no blending and
//! no retry within a provider.

use std::sync::Arc;

use thiserror::Error;

use crate::llm::provider::{GenerateOptions, LlmProvider, ProviderError};

// ---------------------------------------------------------------------------
// DualProviderError
// ---------------------------------------------------------------------------

/// Both providers failed for one attempt.
#[derive(Debug, Error)]
#[error("both providers failed. primary ({primary}); fallback ({fallback})")]
pub struct DualProviderError {
    pub primary: ProviderError,
    pub fallback: ProviderError,
}

// ---------------------------------------------------------------------------
// FailoverInvoker
// ---------------------------------------------------------------------------

/// Primary/fallback pair shared by every attempt.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use postcraft::config::AppConfig;
/// use postcraft::llm::{ChatCompletionProvider, FailoverInvoker, GeminiProvider, GenerateOptions};
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let invoker = FailoverInvoker::new(
///     Arc::new(ChatCompletionProvider::from_config(&config.primary)),
///     Arc::new(GeminiProvider::from_config(&config.fallback)),
/// );
/// let raw = invoker.invoke("Say hi", GenerateOptions::text(64), "demo").await;
/// # }
/// ```
#[derive(Clone)]
pub struct FailoverInvoker {
    primary: Arc<dyn LlmProvider>,
    fallback: Arc<dyn LlmProvider>,
}

impl FailoverInvoker {
    pub fn new(primary: Arc<dyn LlmProvider>, fallback: Arc<dyn LlmProvider>) -> Self {
        Self { primary, fallback }
    }

    /// The primary provider, for callers that must not fail over.
    pub fn primary(&self) -> &Arc<dyn LlmProvider> {
        &self.primary
    }

    /// Run `prompt` against the primary, falling back once on failure.
    ///
    /// `label` prefixes log lines so concurrent attempts can be told apart.
    pub async fn invoke(
        &self,
        prompt: &str,
        options: GenerateOptions,
        label: &str,
    ) -> Result<String, DualProviderError> {
        log::info!("{label}: attempting primary ({})", self.primary.name());
        let primary = match self.primary.generate(prompt, options).await {
            Ok(text) => {
                log::info!("{label}: primary ({}) succeeded", self.primary.name());
                return Ok(text);
            }
            Err(e) => e,
        };

        log::warn!("{label}: primary failed, falling back. reason: {primary}");
        match self.fallback.generate(prompt, options).await {
            Ok(text) => {
                log::info!("{label}: fallback ({}) succeeded", self.fallback.name());
                Ok(text)
            }
            Err(fallback) => {
                log::warn!("{label}: fallback failed too. reason: {fallback}");
                Err(DualProviderError { primary, fallback })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
