//! Fallback provider: Google Gemini `models/{model}:generateContent`.
//!
//! The API key goes in the `x-goog-api-key` header.  Only the text parts of
//! the first candidate are used.  The fallback does not request JSON mode:
//! older Gemini models reject `responseMimeType`, and the prompt already pins
//! the output shape.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FallbackConfig;
use crate::llm::provider::{GenerateOptions, LlmError, LlmProvider, ProviderError};

const PROVIDER: &str = "gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiProvider {
    client: reqwest::Client,
    config: FallbackConfig,
}

impl GeminiProvider {
    pub fn from_config(config: &FallbackConfig) -> Self {
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
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(prompt: &str, options: GenerateOptions) -> Value {
        serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "maxOutputTokens": options.max_output_tokens }
        })
    }

    /// The key travels in a header so it never appears in a URL.
    fn request(&self, prompt: &str, options: GenerateOptions) -> reqwest::RequestBuilder {
        let key = self.config.api_key.as_deref().unwrap_or("");

        self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, key)
            .json(&Self::request_body(prompt, options))
    }

    async fn send(&self, prompt: &str, options: GenerateOptions) -> Result<String, LlmError> {
        let response = self.request(prompt, options).send().await?;

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

        candidate_text(&json)
    }
}

/// Concatenate the text parts of `candidates[0]`.
fn candidate_text(json: &Value) -> Result<String, LlmError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, ProviderError> {
        log::debug!("{PROVIDER}: sending {} prompt chars", prompt.len());
        self.send(prompt, options)
            .await
            .map_err(|cause| ProviderError::new(PROVIDER, cause))
    }
}
