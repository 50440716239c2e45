//! Response repairer — the boundary between raw model text and [`Version`].
//!
//! Model output is untrusted.  [`ResponseRepairer::repair`] runs, in order:
//!
//! 1. Trim and strip a surrounding markdown code fence.
//! 2. Parse JSON.
//! 3. Require an object with `content` and `analysis`.
//! 4. Apply each [`RepairRule`] in order.
//! 5. Coerce `content` into the platform's [`Content`] variant.
//! 6. Coerce `analysis` into [`AnalysisScores`].
//!
//! Any failure yields a [`ParseError`] that keeps the cleaned raw text, so
//! callers can always show what the model actually said.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::content::{AnalysisScores, Content, Platform, ShapeError, Version};

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// What went wrong while turning model text into a [`Version`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("top-level value is not a JSON object")]
    NotAnObject,

    #[error("missing top-level key `{0}`")]
    MissingKey(&'static str),

    #[error(transparent)]
    Content(#[from] ShapeError),

    #[error("invalid analysis scores: {0}")]
    Analysis(String),
}

/// Model output that could not be coerced into a [`Version`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("error parsing model response: {cause}\nRaw: {raw}")]
pub struct ParseError {
    /// The response text after fence stripping.
    pub raw: String,
    pub cause: ParseFailure,
}

// ---------------------------------------------------------------------------
// Repair rules
// ---------------------------------------------------------------------------

/// One narrow correction applied to a parsed `{content, analysis}` object
/// before shape coercion.
pub trait RepairRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrite `payload` in place.  Returns `true` when it changed anything.
    fn apply(&self, payload: &mut Map<String, Value>, platform: &Platform) -> bool;
}

/// Plain-text platforms only: `{"content": {"content": "text"}}` becomes
/// `{"content": "text"}`.  One level, string payloads only.
pub struct UnnestPlainContent;

impl RepairRule for UnnestPlainContent {
    fn name(&self) -> &'static str {
        "unnest-plain-content"
    }

    fn apply(&self, payload: &mut Map<String, Value>, platform: &Platform) -> bool {
        if !platform.expects_plain_text() {
            return false;
        }
        let nested = match payload.get("content") {
            Some(Value::Object(inner)) => match inner.get("content") {
                Some(Value::String(text)) => text.clone(),
                _ => return false,
            },
            _ => return false,
        };
        payload.insert("content".into(), Value::String(nested));
        true
    }
}

// ---------------------------------------------------------------------------
// ResponseRepairer
// ---------------------------------------------------------------------------

/// Parses and repairs raw provider text.
///
/// # Example
/// ```rust
/// use postcraft::content::{Content, Platform};
/// use postcraft::llm::ResponseRepairer;
///
/// let raw = "```json\n{\"content\": \"Doors open at 7!\", \
///            \"analysis\": {\"readability\": 90, \"engagement_potential\": 80, \"human_likeness\": 85}}\n```";
/// let version = ResponseRepairer::default().repair(raw, &Platform::from("Facebook")).unwrap();
/// assert_eq!(version.content, Content::PlainText("Doors open at 7!".into()));
/// ```
pub struct ResponseRepairer {
    rules: Vec<Box<dyn RepairRule>>,
}

impl Default for ResponseRepairer {
    fn default() -> Self {
        Self::with_rules(vec![Box::new(UnnestPlainContent)])
    }
}

impl ResponseRepairer {
    /// A repairer applying `rules` in the given order.
    pub fn with_rules(rules: Vec<Box<dyn RepairRule>>) -> Self {
        Self { rules }
    }

    pub fn repair(&self, raw: &str, platform: &Platform) -> Result<Version, ParseError> {
        let cleaned = strip_fences(raw);
        let fail = |cause: ParseFailure| ParseError {
            raw: cleaned.to_string(),
            cause,
        };

        let value: Value =
            serde_json::from_str(cleaned).map_err(|e| fail(ParseFailure::InvalidJson(e.to_string())))?;
        let Value::Object(mut payload) = value else {
            return Err(fail(ParseFailure::NotAnObject));
        };
        for key in ["content", "analysis"] {
            if !payload.contains_key(key) {
                return Err(fail(ParseFailure::MissingKey(key)));
            }
        }

        for rule in &self.rules {
            if rule.apply(&mut payload, platform) {
                log::debug!("repair rule `{}` applied", rule.name());
            }
        }

        let content = payload.remove("content").unwrap_or(Value::Null);
        let analysis = payload.remove("analysis").unwrap_or(Value::Null);

        let content = Content::from_value(content, platform).map_err(|e| fail(e.into()))?;
        let analysis: AnalysisScores = serde_json::from_value(analysis)
            .map_err(|e| fail(ParseFailure::Analysis(e.to_string())))?;

        Ok(Version::new(content, analysis))
    }
}

/// Trim and remove a surrounding ```` ``` ```` / ```` ```json ```` fence.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
