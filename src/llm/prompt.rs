//! Prompt builder for post generation, refinement, scoring and humanizing.
//!
//! [`PromptBuilder`] is pure: every method maps request data to prompt text
//! with no I/O and no failure mode.  The prompts are provider-agnostic; the
//! same string goes to the primary and the fallback provider.
//!
//! The generation prompt pins the response to a single JSON object with
//! `content` and `analysis` keys.  Models still wrap it in markdown fences
//! now and then, which is why [`ResponseRepairer`](crate::llm::ResponseRepairer)
//! exists.

use crate::content::{GenerationRequest, Platform, RefineRequest, Version};

// ---------------------------------------------------------------------------
// Fixed instructions
// ---------------------------------------------------------------------------

const PERSONA: &str =
    "You are an expert social media content creator. Generate content and analysis based on these specs:";

/// Calibrates the self-reported scores; without the anchor models tend to
/// hand out 40s and 50s for perfectly usable posts.
const ANALYSIS_INSTRUCTION: &str = "\
The \"analysis\" key must contain a JSON object with three integer scores. CRITICAL: Generate scores \
on a human-like scale where 75 is average, 85 is good, and 95 is excellent. Do not give unusually low \
scores unless the content is extremely flawed. The keys must be exactly: \"readability\", \
\"engagement_potential\", and \"human_likeness\".";

const HUMANIZE_INSTRUCTION: &str = "\
You are an expert editor. Your task is to rewrite the following AI-generated text to make it sound \
authentically human and evade AI detection.
Focus on increasing \"perplexity\" and \"burstiness\".
1. Increase Perplexity: Rewrite sentences to be less predictable. Use a richer vocabulary and \
occasionally choose a less common but still correct synonym. Introduce idioms or metaphors.
2. Increase Burstiness: Vary the sentence structure dramatically. Mix very short, punchy sentences \
with much longer, more complex sentences to create a dynamic reading rhythm.
3. Add a Human Touch: Incorporate subtle colloquialisms, rhetorical questions, or asides to break \
the flow. Frame the text as a personal thought or observation.
Preserve the core meaning. Only return the rewritten text. Do not include any introductory phrases \
like \"Here is the rewritten text:\", titles, or markdown.";

const X_CONSTRAINT: &str = "- Critical: Ensure each tweet in the thread is under 280 characters.";

// ---------------------------------------------------------------------------
// Level buckets
// ---------------------------------------------------------------------------

/// Bucket a 0–100 creativity value.  Boundaries belong to the lower bucket.
///
/// ```rust
/// use postcraft::llm::prompt::creativity_level;
///
/// assert_eq!(creativity_level(33.0), "safe");
/// assert_eq!(creativity_level(66.0), "balanced");
/// assert_eq!(creativity_level(66.5), "inventive");
/// ```
pub fn creativity_level(value: f64) -> &'static str {
    if value <= 33.0 {
        "safe"
    } else if value <= 66.0 {
        "balanced"
    } else {
        "inventive"
    }
}

/// Bucket a 0–100 formality value.  Boundaries belong to the lower bucket.
pub fn formality_level(value: f64) -> &'static str {
    if value <= 33.0 {
        "very casual"
    } else if value <= 66.0 {
        "neutral"
    } else {
        "very formal"
    }
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds every prompt the service sends to a provider.
///
/// # Example
/// ```rust
/// use postcraft::content::GenerationRequest;
/// use postcraft::llm::PromptBuilder;
///
/// let request: GenerationRequest = serde_json::from_value(serde_json::json!({
///     "idea": "new coffee shop launch", "platform": "X", "tone": "warm",
///     "creativity": 80, "formality": 10, "smart_emojis": false,
///     "auto_hashtag": true, "contextual_suggestions": false
/// })).unwrap();
///
/// let prompt = PromptBuilder::new().build(&request);
/// assert!(prompt.contains("Creativity: inventive"));
/// assert!(prompt.contains("under 280 characters"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the generation prompt.
    ///
    /// Structure (in order):
    /// 1. Persona + idea / platform
    /// 2. Target audience and platform constraint, when present
    /// 3. Tone, formality, creativity
    /// 4. Optional emoji / hashtag / suggestion directives
    /// 5. JSON contract for `content` and `analysis`
    pub fn build(&self, request: &GenerationRequest) -> String {
        let mut prompt = String::with_capacity(2048);
        prompt.push_str(PERSONA);
        prompt.push_str(&format!("\n- Idea: \"{}\"", request.idea));
        prompt.push_str(&format!("\n- Platform: {}", request.platform));

        if !request.target_audience.is_empty() {
            prompt.push_str(&format!("\n- Target Audience: {}", request.target_audience));
        }
        if request.platform == Platform::X {
            prompt.push('\n');
            prompt.push_str(X_CONSTRAINT);
        }

        prompt.push_str(&format!("\n- Tone: \"{}\"", request.tone));
        prompt.push_str(&format!("\n- Formality: {}", formality_level(request.formality)));
        prompt.push_str(&format!("\n- Creativity: {}", creativity_level(request.creativity)));

        if request.smart_emojis {
            prompt.push_str("\n- Add smart emojis.");
        }
        if request.auto_hashtag {
            prompt.push_str("\n- Add relevant hashtags.");
        }
        if request.contextual_suggestions {
            prompt.push_str("\n- Add a suggestion.");
        }

        prompt.push_str(
            "\n\nYour entire response must be a single, valid JSON object with \"content\" and \"analysis\" keys.",
        );
        prompt.push_str(&format!(
            "\nThe \"content\" key's value must follow this structure: {{{}}}.",
            content_structure(&request.platform)
        ));
        prompt.push_str("\n\n");
        prompt.push_str(ANALYSIS_INSTRUCTION);
        prompt.push_str("\n\nDo not include any other text or markdown.\n");
        prompt
    }

    /// Build the refinement prompt: the generation prompt for the same
    /// parameters, followed by the original post and the user's instruction.
    pub fn build_refinement(&self, request: &RefineRequest) -> String {
        let original = serde_json::to_string(&request.original_content)
            .unwrap_or_else(|_| request.original_content.to_plain_text());

        let mut prompt = self.build(&request.request);
        prompt.push_str("\nYou are now REFINING the following content based on a user's instruction.");
        prompt.push_str("\n---\nORIGINAL CONTENT:\n");
        prompt.push_str(&original);
        prompt.push_str(&format!(
            "\n---\nUSER'S REFINEMENT INSTRUCTION: \"{}\"\n---\n",
            request.refinement_instruction
        ));
        prompt.push_str(
            "Apply the instruction to the original content and provide the new, refined content \
             and its new analysis in the required JSON format.\n",
        );
        prompt
    }

    /// Build the comparative virality prompt over already-accepted versions.
    ///
    /// Versions are numbered from 1 in the text, while the requested
    /// `version_index` is 0-based (see the inline example).
    pub fn build_scoring(&self, versions: &[Version], platform: &Platform) -> String {
        let mut listing = String::with_capacity(versions.len() * 512);
        for (i, version) in versions.iter().enumerate() {
            listing.push_str(&format!(
                "--- VERSION {} ---\n{}\n\n",
                i + 1,
                version.content.to_plain_text()
            ));
        }

        format!(
            "You are a viral social media strategist. Analyze the following {count} content options \
             for a {platform} post. For each, provide a \"virality_score\" (0-100) and a brief \
             \"justification\". Your response must be ONLY a valid JSON list of objects. Example: \
             [{{\"version_index\": 0, \"virality_score\": 88, \"justification\": \"Strong hook.\"}}] \
             \n\nContent to analyze:\n{listing}",
            count = versions.len(),
        )
    }

    /// Build the humanize prompt for free text.
    pub fn build_humanize(&self, text: &str) -> String {
        format!("{HUMANIZE_INSTRUCTION}\nTEXT TO REWRITE:\n---\n{text}\n---\n")
    }
}

/// JSON skeleton the model must follow for `content`.
fn content_structure(platform: &Platform) -> &'static str {
    match platform {
        Platform::Instagram => {
            r#""content": {"caption": "Your generated caption.", "script": "A short video script."}"#
        }
        Platform::X => r#""content": {"thread": ["Tweet 1.", "Tweet 2."]}"#,
        Platform::Other(_) => r#""content": "Your full generated text post.""#,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
