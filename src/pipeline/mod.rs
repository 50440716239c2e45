//! Generation pipeline for postcraft.
//!
//! This module turns one request into finished post versions: a single
//! prompt fanned out to concurrent attempts, each routed through the
//! primary/fallback providers and repaired into a typed [`Version`], then
//! optionally ranked by the virality scoring pass.
//!
//! # Architecture
//!
//! ```text
//! GenerationRequest
//!        │
//!        ▼
//! GenerationOrchestrator::generate()
//!        │
//!        ├─ attempt "ver 1" ─┐
//!        ├─ attempt "ver 2" ─┼─ FailoverInvoker → ResponseRepairer
//!        └─ attempt "ver 3" ─┘
//!              │
//!              ▼
//!        Vec<Version> (completion order)
//!              │
//!              └─ ScoringPass::score   primary only, best effort
//! ```
//!
//! [`Version`]: crate::content::Version

pub mod runner;
pub mod scoring;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{AttemptError, GenerateError, GenerationOrchestrator, FAN_OUT};
pub use scoring::{ScoringError, ScoringPass};
