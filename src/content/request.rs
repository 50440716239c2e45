//! Inbound request bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{Content, Platform, ShapeError};

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// Parameters for generating a set of post variants from an idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub idea: String,
    pub platform: Platform,
    pub tone: String,
    /// 0 – 100; bucketed into safe / balanced / inventive.
    pub creativity: f64,
    /// 0 – 100; bucketed into very casual / neutral / very formal.
    pub formality: f64,
    pub smart_emojis: bool,
    pub auto_hashtag: bool,
    pub contextual_suggestions: bool,
    #[serde(default)]
    pub target_audience: String,
}

// ---------------------------------------------------------------------------
// RefineRequest
// ---------------------------------------------------------------------------

/// A generation request plus an existing post and an edit instruction.
///
/// `original_content` arrives as raw JSON and is coerced into the variant the
/// platform expects while deserializing, so a `RefineRequest` value always
/// holds content that matches its platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRefineRequest")]
pub struct RefineRequest {
    #[serde(flatten)]
    pub request: GenerationRequest,
    pub original_content: Content,
    pub refinement_instruction: String,
}

#[derive(Deserialize)]
struct RawRefineRequest {
    #[serde(flatten)]
    request: GenerationRequest,
    original_content: Value,
    refinement_instruction: String,
}

impl TryFrom<RawRefineRequest> for RefineRequest {
    type Error = ShapeError;

    fn try_from(raw: RawRefineRequest) -> Result<Self, Self::Error> {
        let original_content = Content::from_value(raw.original_content, &raw.request.platform)?;
        Ok(Self {
            request: raw.request,
            original_content,
            refinement_instruction: raw.refinement_instruction,
        })
    }
}

// ---------------------------------------------------------------------------
// Humanize
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizeRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizeResponse {
    pub humanized_text: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
