//! Content variants, analysis scores and generated versions.
//!
//! [`Content`] is an explicit enum; which variant is valid is decided by the
//! request's [`Platform`] through [`Content::from_value`].  On the wire each
//! variant keeps its bare shape (`"text"`, `{caption, script}` or
//! `{thread: [...]}`) so clients never see a tag.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::content::Platform;

// ---------------------------------------------------------------------------
// ShapeError
// ---------------------------------------------------------------------------

/// A JSON value did not have the content shape its platform requires.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("content for {platform} must be {expected}: {detail}")]
pub struct ShapeError {
    pub platform: String,
    pub expected: &'static str,
    pub detail: String,
}

impl ShapeError {
    fn new(platform: &Platform, detail: impl Into<String>) -> Self {
        let expected = match platform {
            Platform::Instagram => "an object with `caption` and `script` strings",
            Platform::X => "an object with a `thread` array of strings",
            Platform::Other(_) => "a string",
        };
        Self {
            platform: platform.to_string(),
            expected,
            detail: detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Instagram post: caption plus a short video script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramContent {
    pub caption: String,
    pub script: String,
}

/// X (Twitter) thread, tweets in posting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XThread {
    #[serde(rename = "thread", alias = "tweets")]
    pub tweets: Vec<String>,
}

/// One generated post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Content {
    PlainText(String),
    Instagram(InstagramContent),
    XThread(XThread),
}

impl Content {
    /// Coerce a raw JSON value into the variant `platform` expects.
    pub fn from_value(value: Value, platform: &Platform) -> Result<Self, ShapeError> {
        match platform {
            Platform::Instagram => serde_json::from_value::<InstagramContent>(value)
                .map(Content::Instagram)
                .map_err(|e| ShapeError::new(platform, e.to_string())),
            Platform::X => serde_json::from_value::<XThread>(value)
                .map(Content::XThread)
                .map_err(|e| ShapeError::new(platform, e.to_string())),
            Platform::Other(_) => match value {
                Value::String(text) => Ok(Content::PlainText(text)),
                other => Err(ShapeError::new(
                    platform,
                    format!("found {}", json_kind(&other)),
                )),
            },
        }
    }

    /// Flatten to plain text for prompts that compare several versions.
    ///
    /// * plain text — as is
    /// * Instagram — `Caption: …\nScript: …`
    /// * X thread — tweets joined by newlines
    pub fn to_plain_text(&self) -> String {
        match self {
            Content::PlainText(text) => text.clone(),
            Content::Instagram(ig) => format!("Caption: {}\nScript: {}", ig.caption, ig.script),
            Content::XThread(thread) => thread.tweets.join("\n"),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// AnalysisScores / Version
// ---------------------------------------------------------------------------

/// Model-supplied quality scores.  Intended range is 0–100 but nothing
/// enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisScores {
    pub readability: i32,
    pub engagement_potential: i32,
    pub human_likeness: i32,
}

/// One accepted generation attempt.
///
/// `virality_score` and `justification` stay `None` until the scoring pass
/// fills them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Version {
    pub content: Content,
    pub analysis: AnalysisScores,
    pub virality_score: Option<i32>,
    pub justification: Option<String>,
}

impl Version {
    pub fn new(content: Content, analysis: AnalysisScores) -> Self {
        Self {
            content,
            analysis,
            virality_score: None,
            justification: None,
        }
    }
}

/// Response body of `/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct MultiVersionResponse {
    pub versions: Vec<Version>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
