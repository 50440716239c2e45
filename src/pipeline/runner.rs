//! Generation orchestrator — prompt → fan-out → failover → repair → scoring.
//!
//! # Flow
//!
//! ```text
//! generate(request)
//!   └─▶ PromptBuilder::build                        (once)
//!         └─▶ 3 × attempt, polled concurrently
//!               ├─ FailoverInvoker::invoke          primary → fallback
//!               └─ ResponseRepairer::repair         raw text → Version
//!         └─▶ join: successes in completion order, failures collected
//!               ├─ 0 successes → GenerateError::AllAttemptsFailed
//!               └─ ≥1 success  → ScoringPass::score (best effort) → Ok
//!
//! refine(request)    single attempt, no scoring
//! humanize(text)     failover only, text returned trimmed
//! ```
//!
//! The attempts are futures on one task (`FuturesUnordered`), so nothing is
//! shared mutably between them and no locking is needed.  Each provider call
//! ends at its own timeout; a slow attempt never cancels its siblings.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;

use crate::config::{AppConfig, GenerationConfig};
use crate::content::{GenerationRequest, Platform, RefineRequest, Version};
use crate::llm::{
    ChatCompletionProvider, DualProviderError, FailoverInvoker, GeminiProvider, GenerateOptions,
    LlmProvider, ParseError, PromptBuilder, ResponseRepairer,
};

use super::scoring::ScoringPass;

/// Number of concurrent generation attempts per `generate` call.
pub const FAN_OUT: usize = 3;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why one attempt produced no [`Version`].
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Both providers failed.
    #[error(transparent)]
    Provider(#[from] DualProviderError),

    /// A provider answered but the output could not be repaired.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Failure of a whole `generate` call.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Every attempt failed; one cause per attempt, in completion order.
    #[error("all {} generation attempts failed: {}", .causes.len(), list_causes(.causes))]
    AllAttemptsFailed { causes: Vec<AttemptError> },
}

fn list_causes(causes: &[AttemptError]) -> String {
    causes
        .iter()
        .enumerate()
        .map(|(i, cause)| format!("[{}] {cause}", i + 1))
        .collect::<Vec<_>>()
        .join(" | ")
}

// ---------------------------------------------------------------------------
// GenerationOrchestrator
// ---------------------------------------------------------------------------

/// Entry point for `generate`, `refine` and `humanize`.
///
/// Construct once at startup and share behind an `Arc`; every method takes
/// `&self`.
///
/// ```rust,no_run
/// use postcraft::config::AppConfig;
/// use postcraft::content::GenerationRequest;
/// use postcraft::pipeline::GenerationOrchestrator;
///
/// # async fn example(request: GenerationRequest) {
/// let orchestrator = GenerationOrchestrator::from_config(&AppConfig::default());
/// match orchestrator.generate(&request).await {
///     Ok(versions) => println!("{} versions", versions.len()),
///     Err(e) => eprintln!("{e}"),
/// }
/// # }
/// ```
pub struct GenerationOrchestrator {
    invoker: FailoverInvoker,
    repairer: ResponseRepairer,
    prompts: PromptBuilder,
    scoring: Option<ScoringPass>,
    max_output_tokens: u32,
}

impl GenerationOrchestrator {
    /// Wire an orchestrator around two providers.
    ///
    /// The scoring pass, when enabled, uses `primary` only.
    pub fn new(
        primary: Arc<dyn LlmProvider>,
        fallback: Arc<dyn LlmProvider>,
        config: &GenerationConfig,
    ) -> Self {
        let invoker = FailoverInvoker::new(primary, fallback);
        let scoring = config
            .scoring_enabled
            .then(|| ScoringPass::new(Arc::clone(invoker.primary()), config.scoring_max_tokens));

        Self {
            invoker,
            repairer: ResponseRepairer::default(),
            prompts: PromptBuilder::new(),
            scoring,
            max_output_tokens: config.max_output_tokens,
        }
    }

    /// Build the production providers from config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(ChatCompletionProvider::from_config(&config.primary)),
            Arc::new(GeminiProvider::from_config(&config.fallback)),
            &config.generation,
        )
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Generate up to [`FAN_OUT`] versions.
    ///
    /// Partial success is silent: fewer versions, no error.  Only when every
    /// attempt fails does the caller see [`GenerateError::AllAttemptsFailed`].
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Version>, GenerateError> {
        log::info!("generate: start for {}", request.platform);
        let prompt = self.prompts.build(request);

        let mut attempts: FuturesUnordered<_> = (1..=FAN_OUT)
            .map(|n| self.attempt(&prompt, &request.platform, n))
            .collect();

        let mut versions = Vec::with_capacity(FAN_OUT);
        let mut causes = Vec::new();
        while let Some(outcome) = attempts.next().await {
            match outcome {
                Ok(version) => versions.push(version),
                Err(cause) => causes.push(cause),
            }
        }

        if versions.is_empty() {
            log::warn!("generate: all {FAN_OUT} attempts failed");
            return Err(GenerateError::AllAttemptsFailed { causes });
        }
        log::info!(
            "generate: {} of {FAN_OUT} attempts succeeded",
            versions.len()
        );

        if let Some(scoring) = &self.scoring {
            scoring.score(&mut versions, &request.platform).await;
        }
        Ok(versions)
    }

    /// Refine an existing post: one attempt, no scoring.
    ///
    /// The error carries both provider causes, or the unparsed raw text.
    pub async fn refine(&self, request: &RefineRequest) -> Result<Version, AttemptError> {
        log::info!("refine: start for {}", request.request.platform);
        let prompt = self.prompts.build_refinement(request);
        self.run_attempt(&prompt, &request.request.platform, "refine")
            .await
    }

    /// Rewrite `text` to read less machine-generated.  No structural parsing;
    /// the provider's text is returned trimmed.
    pub async fn humanize(&self, text: &str) -> Result<String, DualProviderError> {
        log::info!("humanize: start ({} chars)", text.len());
        let prompt = self.prompts.build_humanize(text);
        let rewritten = self
            .invoker
            .invoke(&prompt, GenerateOptions::text(self.max_output_tokens), "humanize")
            .await?;
        Ok(rewritten.trim().to_string())
    }

    // -----------------------------------------------------------------------
    // Attempts
    // -----------------------------------------------------------------------

    async fn attempt(
        &self,
        prompt: &str,
        platform: &Platform,
        n: usize,
    ) -> Result<Version, AttemptError> {
        let label = format!("ver {n}");
        let outcome = self.run_attempt(prompt, platform, &label).await;
        if let Err(e) = &outcome {
            log::warn!("{label}: discarded: {e}");
        }
        outcome
    }

    async fn run_attempt(
        &self,
        prompt: &str,
        platform: &Platform,
        label: &str,
    ) -> Result<Version, AttemptError> {
        let raw = self
            .invoker
            .invoke(prompt, GenerateOptions::json(self.max_output_tokens), label)
            .await?;
        Ok(self.repairer.repair(&raw, platform)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::content::{Content, XThread};
    use crate::llm::mock::ScriptedProvider;
    use crate::llm::LlmError;

    const SCORES: &str =
        r#"{"readability": 80, "engagement_potential": 78, "human_likeness": 82}"#;

    fn plain(text: &str) -> String {
        format!(r#"{{"content": "{text}", "analysis": {SCORES}}}"#)
    }

    fn four_tweet_thread() -> String {
        format!(
            r#"{{"content": {{"thread": ["Big news.", "We open Monday.", "First cup free.", "See you there!"]}}, "analysis": {SCORES}}}"#
        )
    }

    fn request(platform: &str) -> GenerationRequest {
        GenerationRequest {
            idea: "new coffee shop launch".into(),
            platform: Platform::from(platform),
            tone: "friendly".into(),
            creativity: 50.0,
            formality: 30.0,
            smart_emojis: true,
            auto_hashtag: true,
            contextual_suggestions: false,
            target_audience: String::new(),
        }
    }

    fn no_scoring() -> GenerationConfig {
        GenerationConfig {
            scoring_enabled: false,
            ..GenerationConfig::default()
        }
    }

    fn orchestrator(
        primary: &Arc<ScriptedProvider>,
        fallback: &Arc<ScriptedProvider>,
        config: &GenerationConfig,
    ) -> GenerationOrchestrator {
        GenerationOrchestrator::new(primary.clone(), fallback.clone(), config)
    }

    fn texts(versions: &[Version]) -> Vec<String> {
        versions.iter().map(|v| v.content.to_plain_text()).collect()
    }

    // -----------------------------------------------------------------------
    // generate
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn coffee_shop_thread_is_generated_and_scored() {
        let primary = Arc::new(
            ScriptedProvider::new("primary")
                .then_ok(four_tweet_thread())
                .then_ok(four_tweet_thread())
                .then_ok(format!("```json\n{}\n```", four_tweet_thread()))
                .then_ok(
                    r#"[{"version_index": 0, "virality_score": 81, "justification": "Clear hook."},
                        {"version_index": 1, "virality_score": 74, "justification": "Friendly."},
                        {"version_index": 2, "virality_score": 88, "justification": "Free cup sells."}]"#,
                ),
        );
        let fallback = Arc::new(ScriptedProvider::new("fallback"));
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        let versions = orc.generate(&request("X")).await.unwrap();

        assert_eq!(versions.len(), 3);
        for v in &versions {
            match &v.content {
                Content::XThread(XThread { tweets }) => assert_eq!(tweets.len(), 4),
                other => panic!("expected a thread, got {other:?}"),
            }
            assert_eq!(v.analysis.engagement_potential, 78);
            let score = v.virality_score.expect("scored");
            assert!((0..=100).contains(&score));
            assert!(v.justification.as_deref().is_some_and(|j| !j.is_empty()));
        }
        assert_eq!(primary.calls(), 4, "3 attempts + 1 scoring call");
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn partial_success_returns_only_successes() {
        for k in 1..=FAN_OUT {
            let mut primary = ScriptedProvider::new("primary");
            for i in 0..FAN_OUT {
                primary = if i < k {
                    primary.then_ok(plain("ok"))
                } else {
                    primary.then_fail(|| LlmError::Timeout)
                };
            }
            let primary = Arc::new(primary);
            let fallback = Arc::new(ScriptedProvider::new("fallback"));
            let orc = orchestrator(&primary, &fallback, &no_scoring());

            let versions = orc.generate(&request("Blog")).await.unwrap();

            assert_eq!(versions.len(), k, "k = {k}");
            assert_eq!(fallback.calls(), FAN_OUT - k);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn versions_follow_completion_order() {
        let primary = Arc::new(
            ScriptedProvider::new("primary")
                .then_ok_after(Duration::from_millis(300), plain("slow"))
                .then_ok_after(Duration::from_millis(100), plain("fast"))
                .then_ok_after(Duration::from_millis(200), plain("medium")),
        );
        let fallback = Arc::new(ScriptedProvider::new("fallback"));
        let orc = orchestrator(&primary, &fallback, &no_scoring());

        let versions = orc.generate(&request("Blog")).await.unwrap();

        assert_eq!(texts(&versions), vec!["fast", "medium", "slow"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempts_are_awaited_not_raced() {
        let primary = Arc::new(
            ScriptedProvider::new("primary")
                .then_ok_after(Duration::from_millis(10), plain("quick"))
                .then_fail_after(Duration::from_secs(60), || LlmError::Timeout)
                .then_ok_after(Duration::from_secs(30), plain("late")),
        );
        let fallback = Arc::new(ScriptedProvider::always("fallback", plain("rescued")));
        let orc = orchestrator(&primary, &fallback, &no_scoring());

        let versions = orc.generate(&request("Blog")).await.unwrap();

        assert_eq!(texts(&versions), vec!["quick", "late", "rescued"]);
    }

    #[tokio::test]
    async fn all_attempts_failing_lists_every_cause() {
        let primary = Arc::new(
            ScriptedProvider::new("primary")
                .then_ok("I cannot write that post.")
                .then_fail(|| LlmError::Timeout)
                .then_fail(|| LlmError::Timeout),
        );
        let fallback = Arc::new(ScriptedProvider::new("fallback"));
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        let err = orc.generate(&request("X")).await.unwrap_err();
        let GenerateError::AllAttemptsFailed { causes } = &err;

        assert_eq!(causes.len(), 3);
        let parse = causes
            .iter()
            .filter(|c| matches!(c, AttemptError::Parse(_)))
            .count();
        assert_eq!(parse, 1);
        assert!(err.to_string().contains("I cannot write that post."));
        assert!(err.to_string().contains("script exhausted"));
        // No scoring call after a total failure.
        assert_eq!(primary.calls(), 3);
    }

    #[tokio::test]
    async fn primary_always_timing_out_falls_back_per_attempt() {
        let primary = Arc::new(
            ScriptedProvider::new("primary")
                .then_fail(|| LlmError::Timeout)
                .then_fail(|| LlmError::Timeout)
                .then_fail(|| LlmError::Timeout),
        );
        let fallback = Arc::new(ScriptedProvider::always("fallback", four_tweet_thread()));
        let orc = orchestrator(&primary, &fallback, &no_scoring());

        let versions = orc.generate(&request("X")).await.unwrap();

        assert_eq!(versions.len(), 3);
        assert_eq!(primary.calls(), 3, "primary tried exactly once per attempt");
        assert_eq!(fallback.calls(), 3);
    }

    #[tokio::test]
    async fn scoring_failure_does_not_fail_generate() {
        let primary = Arc::new(
            ScriptedProvider::new("primary")
                .then_ok(plain("a"))
                .then_ok(plain("b"))
                .then_ok(plain("c"))
                .then_fail(|| LlmError::Status {
                    status: 500,
                    body: "upstream".into(),
                }),
        );
        let fallback = Arc::new(ScriptedProvider::always("fallback", "[]"));
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        let versions = orc.generate(&request("Blog")).await.unwrap();

        assert_eq!(versions.len(), 3);
        assert!(versions.iter().all(|v| v.virality_score.is_none()));
        assert_eq!(fallback.calls(), 0, "scoring never fails over");
    }

    #[tokio::test]
    async fn every_attempt_gets_the_same_prompt() {
        let primary = Arc::new(ScriptedProvider::always("primary", plain("x")));
        let fallback = Arc::new(ScriptedProvider::new("fallback"));
        let orc = orchestrator(&primary, &fallback, &no_scoring());

        orc.generate(&request("Blog")).await.unwrap();

        let prompts = primary.prompts();
        assert_eq!(prompts.len(), FAN_OUT);
        assert!(prompts.iter().all(|p| p == &prompts[0]));
        assert!(prompts[0].contains("new coffee shop launch"));
    }

    // -----------------------------------------------------------------------
    // refine
    // -----------------------------------------------------------------------

    fn refine_request() -> RefineRequest {
        RefineRequest {
            request: request("X"),
            original_content: Content::XThread(XThread {
                tweets: vec!["We open Monday.".into()],
            }),
            refinement_instruction: "add urgency".into(),
        }
    }

    #[tokio::test]
    async fn refine_is_a_single_unscored_attempt() {
        let primary = Arc::new(ScriptedProvider::always("primary", four_tweet_thread()));
        let fallback = Arc::new(ScriptedProvider::new("fallback"));
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        let version = orc.refine(&refine_request()).await.unwrap();

        assert!(matches!(version.content, Content::XThread(_)));
        assert!(version.virality_score.is_none());
        assert_eq!(primary.calls(), 1);
        assert!(primary.prompts()[0].contains("add urgency"));
    }

    #[tokio::test]
    async fn refine_reports_both_provider_causes() {
        let primary = Arc::new(ScriptedProvider::new("primary").then_fail(|| LlmError::Timeout));
        let fallback = Arc::new(
            ScriptedProvider::new("fallback").then_fail(|| LlmError::Request("dns failure".into())),
        );
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        let err = orc.refine(&refine_request()).await.unwrap_err();

        assert!(matches!(err, AttemptError::Provider(_)));
        let detail = err.to_string();
        assert!(detail.contains("LLM request timed out"), "{detail}");
        assert!(detail.contains("dns failure"), "{detail}");
    }

    #[tokio::test]
    async fn refine_parse_failure_keeps_raw_text() {
        let primary = Arc::new(ScriptedProvider::always("primary", "Here you go: more urgent!"));
        let fallback = Arc::new(ScriptedProvider::new("fallback"));
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        let err = orc.refine(&refine_request()).await.unwrap_err();

        match err {
            AttemptError::Parse(p) => assert_eq!(p.raw, "Here you go: more urgent!"),
            other => panic!("expected a parse error, got {other}"),
        }
        assert_eq!(fallback.calls(), 0, "parse failures do not fail over");
    }

    // -----------------------------------------------------------------------
    // humanize
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn humanize_returns_trimmed_text() {
        let primary = Arc::new(ScriptedProvider::new("primary").then_fail(|| LlmError::EmptyResponse));
        let fallback = Arc::new(ScriptedProvider::always("fallback", "\n  Honestly? It works.  \n"));
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        let text = orc.humanize("The solution is effective.").await.unwrap();

        assert_eq!(text, "Honestly? It works.");
        assert!(fallback.prompts()[0].contains("The solution is effective."));
    }

    #[tokio::test]
    async fn humanize_fails_when_both_providers_fail() {
        let primary = Arc::new(ScriptedProvider::new("primary"));
        let fallback = Arc::new(ScriptedProvider::new("fallback"));
        let orc = orchestrator(&primary, &fallback, &GenerationConfig::default());

        assert!(orc.humanize("text").await.is_err());
    }
}
