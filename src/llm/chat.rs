//! Primary provider: OpenAI-compatible `/chat/completions`.
//!
//! Works with OpenRouter (the default), OpenAI, Groq, Together.ai, or any other
//! service that speaks the chat-completions wire format.  All connection
//! details come from [`PrimaryConfig`]; nothing is hardcoded.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::PrimaryConfig;
use crate::llm::provider::{GenerateOptions, LlmError, LlmProvider, ProviderError};

const PROVIDER: &str = "openrouter";

/// Calls a chat-completions endpoint with the prompt as a single user
/// message.
pub struct ChatCompletionProvider {
    client: reqwest::Client,
    config: PrimaryConfig,
}

impl ChatCompletionProvider {
    /// Build a provider from config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a timeout surfaces as [`LlmError::Timeout`].
    pub fn from_config(config: &PrimaryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, prompt: &str, options: GenerateOptions) -> Value {
        let mut body = serde_json::json!({
            "model":      self.config.model,
            "messages":   [{ "role": "user", "content": prompt }],
            "max_tokens": options.max_output_tokens
        });
        if options.json_output {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        body
    }

    async fn send(&self, prompt: &str, options: GenerateOptions) -> Result<String, LlmError> {
        let mut req = self
            .client
            .post(self.endpoint())
            .json(&self.request_body(prompt, options));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.without_url().to_string()))?;

        message_text(&json)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
fn message_text(json: &Value) -> Result<String, LlmError> {
    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?;

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[async_trait]
impl LlmProvider for ChatCompletionProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, ProviderError> {
        log::debug!(
            "{PROVIDER}: sending {} prompt chars (max_tokens={}, json={})",
            prompt.len(),
            options.max_output_tokens,
            options.json_output
        );
        self.send(prompt, options)
            .await
            .map_err(|cause| ProviderError::new(PROVIDER, cause))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
