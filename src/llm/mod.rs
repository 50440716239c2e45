//! Language-model layer for postcraft.
//!
//! This module provides:
//! * [`LlmProvider`] — async trait implemented by every provider backend.
//! * [`ChatCompletionProvider`] — OpenAI-compatible chat completions (primary).
//! * [`GeminiProvider`] — Gemini `generateContent` (fallback).
//! * [`FailoverInvoker`] — primary first, fallback only on failure.
//! * [`PromptBuilder`] — generation / refinement / scoring / humanize prompts.
//! * [`ResponseRepairer`] — raw model text → typed [`Version`](crate::content::Version).
//! * [`ProviderError`], [`DualProviderError`], [`ParseError`] — failure types.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postcraft::config::AppConfig;
//! use postcraft::content::Platform;
//! use postcraft::llm::{
//!     ChatCompletionProvider, FailoverInvoker, GeminiProvider, GenerateOptions, ResponseRepairer,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let invoker = FailoverInvoker::new(
//!         Arc::new(ChatCompletionProvider::from_config(&config.primary)),
//!         Arc::new(GeminiProvider::from_config(&config.fallback)),
//!     );
//!
//!     let raw = invoker
//!         .invoke("…generation prompt…", GenerateOptions::json(2048), "demo")
//!         .await
//!         .unwrap();
//!     let version = ResponseRepairer::default()
//!         .repair(&raw, &Platform::X)
//!         .unwrap();
//!     println!("{:?}", version.content);
//! }
//! ```

pub mod chat;
pub mod fallback;
pub mod gemini;
pub mod prompt;
pub mod provider;
pub mod repair;

#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat::ChatCompletionProvider;
pub use fallback::{DualProviderError, FailoverInvoker};
pub use gemini::GeminiProvider;
pub use prompt::PromptBuilder;
pub use provider::{GenerateOptions, LlmError, LlmProvider, ProviderError};
pub use repair::{ParseError, ParseFailure, RepairRule, ResponseRepairer, UnnestPlainContent};
