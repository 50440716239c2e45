//! Virality scoring pass — best-effort enrichment of accepted versions.
//!
//! [`ScoringPass::score`] makes one call to the primary provider (never the
//! fallback) asking for a JSON list of
//! `{version_index, virality_score, justification}`.  Whatever goes wrong
//! (request, JSON, entry shape) is logged and swallowed; the versions then
//! keep `virality_score = None` and `justification = None`.
//!
//! Predictions are validated in full before any version is touched, so a
//! failed pass never leaves a half-scored set behind.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::content::{Platform, Version};
use crate::llm::repair::strip_fences;
use crate::llm::{GenerateOptions, LlmProvider, PromptBuilder, ProviderError};

/// Internal failure of the scoring pass.  Only ever logged.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("scoring response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("scoring response contains no list of predictions")]
    NoPredictions,

    #[error("prediction #{0} is not a JSON object")]
    MalformedEntry(usize),
}

/// Score assignment for one version.
#[derive(Debug, Clone, PartialEq)]
struct Prediction {
    index: usize,
    virality_score: Option<i32>,
    justification: Option<String>,
}

pub struct ScoringPass {
    provider: Arc<dyn LlmProvider>,
    prompts: PromptBuilder,
    max_output_tokens: u32,
}

impl ScoringPass {
    pub fn new(provider: Arc<dyn LlmProvider>, max_output_tokens: u32) -> Self {
        Self {
            provider,
            prompts: PromptBuilder::new(),
            max_output_tokens,
        }
    }

    /// Fill in virality scores in place.  Never fails.
    pub async fn score(&self, versions: &mut [Version], platform: &Platform) {
        if versions.is_empty() {
            return;
        }
        log::info!("scoring: ranking {} versions for {platform}", versions.len());

        match self.try_score(versions, platform).await {
            Ok(assigned) => log::info!(
                "scoring: assigned {assigned} of {} scores",
                versions.len()
            ),
            Err(e) => log::warn!("scoring pass failed, versions left unscored: {e}"),
        }
    }

    async fn try_score(
        &self,
        versions: &mut [Version],
        platform: &Platform,
    ) -> Result<usize, ScoringError> {
        let prompt = self.prompts.build_scoring(versions, platform);
        let raw = self
            .provider
            .generate(&prompt, GenerateOptions::json(self.max_output_tokens))
            .await?;

        let value: Value = serde_json::from_str(strip_fences(&raw))
            .map_err(|e| ScoringError::InvalidJson(e.to_string()))?;
        let entries = prediction_list(&value).ok_or(ScoringError::NoPredictions)?;
        let predictions = parse_predictions(entries, versions.len())?;

        Ok(apply_predictions(versions, predictions))
    }
}

/// A top-level array, or an array field of the wrapper object JSON-object
/// mode forces.  Fields are keyed alphabetically, so an array holding
/// `version_index` entries wins over any other array field.
fn prediction_list(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(fields) => {
            let arrays = || fields.values().filter_map(Value::as_array);
            arrays()
                .find(|items| items.iter().any(|item| item.get("version_index").is_some()))
                .or_else(|| arrays().next())
                .map(Vec::as_slice)
        }
        _ => None,
    }
}

/// Validate every entry; drop those whose index is missing or out of range.
fn parse_predictions(entries: &[Value], len: usize) -> Result<Vec<Prediction>, ScoringError> {
    let mut predictions = Vec::with_capacity(entries.len());
    for (n, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_object() else {
            return Err(ScoringError::MalformedEntry(n));
        };
        let index = fields
            .get("version_index")
            .and_then(Value::as_u64)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < len);
        let Some(index) = index else {
            log::debug!("scoring: ignoring prediction #{n} without a usable version_index");
            continue;
        };
        predictions.push(Prediction {
            index,
            virality_score: fields
                .get("virality_score")
                .and_then(Value::as_i64)
                .and_then(|s| i32::try_from(s).ok()),
            justification: fields
                .get("justification")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }
    Ok(predictions)
}

/// First prediction per index wins.  Returns how many versions were scored.
fn apply_predictions(versions: &mut [Version], predictions: Vec<Prediction>) -> usize {
    let mut scored = vec![false; versions.len()];
    for p in predictions {
        if scored[p.index] {
            continue;
        }
        scored[p.index] = true;
        let version = &mut versions[p.index];
        version.virality_score = p.virality_score;
        version.justification = p.justification;
    }
    scored.into_iter().filter(|&s| s).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
